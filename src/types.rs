use serde::{Deserialize, Serialize};

/// Operating regime of the air conditioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcMode {
    Auto,
    #[serde(alias = "cold")]
    Cool,
    #[serde(alias = "warm")]
    Heat,
    Dry,
    Fan,
}

impl AcMode {
    /// Value of the bridge's `mode=` query parameter.
    pub fn as_bridge_str(&self) -> &'static str {
        match self {
            AcMode::Auto => "auto",
            AcMode::Cool => "cold",
            AcMode::Heat => "warm",
            AcMode::Dry => "dry",
            AcMode::Fan => "fan",
        }
    }

    pub fn from_bridge_str(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(AcMode::Auto),
            "cold" => Some(AcMode::Cool),
            "warm" => Some(AcMode::Heat),
            "dry" => Some(AcMode::Dry),
            "fan" => Some(AcMode::Fan),
            _ => None,
        }
    }
}

/// Inclusive temperature bounds for a mode, in Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRange {
    default: f64,
    min: f64,
    max: f64,
}

impl TemperatureRange {
    /// Returns `None` unless `min <= default <= max`.
    pub fn new(default: f64, min: f64, max: f64) -> Option<Self> {
        if min <= default && default <= max {
            Some(Self { default, min, max })
        } else {
            None
        }
    }

    /// Caller guarantees `min <= default <= max`.
    pub(crate) const fn new_unchecked(default: f64, min: f64, max: f64) -> Self {
        Self { default, min, max }
    }

    pub fn default(&self) -> f64 {
        self.default
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, celsius: f64) -> bool {
        self.min <= celsius && celsius <= self.max
    }
}

/// How a mode treats the target temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeTemperature {
    Range(TemperatureRange),
    /// Sentinel value sent for modes without a user-set temperature.
    Fixed(f64),
}

impl ModeTemperature {
    pub fn default(&self) -> f64 {
        match self {
            ModeTemperature::Range(range) => range.default(),
            ModeTemperature::Fixed(value) => *value,
        }
    }
}

/// Unit the control surface shows temperatures in. Storage and the bridge
/// always use Celsius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl DisplayUnit {
    /// Fahrenheit uses the flat `c + 32` offset the bridge integration has
    /// always shown, not `c * 9/5 + 32`.
    pub fn to_display(&self, celsius: f64) -> f64 {
        match self {
            DisplayUnit::Celsius => celsius,
            DisplayUnit::Fahrenheit => celsius + 32.0,
        }
    }

    pub fn to_celsius(&self, value: f64) -> f64 {
        match self {
            DisplayUnit::Celsius => value,
            DisplayUnit::Fahrenheit => value - 32.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperatingState {
    #[default]
    Off,
    Cooling,
    Heating,
    Auto,
    Dehumidifying,
    FanOnly,
}

/// Last commanded state of the unit. Replaced whole on every commit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcState {
    pub power: bool,
    pub mode: AcMode,
    /// Celsius.
    pub target_temperature: f64,
    pub swing: bool,
    pub boost: bool,
}

impl AcState {
    /// Startup state: power off, swing on, boost off.
    pub fn initial(mode: AcMode, target_temperature: f64) -> Self {
        Self {
            power: false,
            mode,
            target_temperature,
            swing: true,
            boost: false,
        }
    }

    pub fn operating_state(&self) -> OperatingState {
        if !self.power {
            return OperatingState::Off;
        }
        match self.mode {
            AcMode::Auto => OperatingState::Auto,
            AcMode::Cool => OperatingState::Cooling,
            AcMode::Heat => OperatingState::Heating,
            AcMode::Dry => OperatingState::Dehumidifying,
            AcMode::Fan => OperatingState::FanOnly,
        }
    }
}
