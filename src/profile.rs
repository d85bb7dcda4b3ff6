//! Enumerated vocabularies of the accessory host and how each profile maps
//! them onto [`AcMode`].

use serde::Deserialize;

use crate::capabilities::ModeCapabilities;
use crate::types::{AcMode, AcState, DisplayUnit};
use crate::{Error, Result};

macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn code(&self) -> u8 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn from_code(code: u8) -> Option<Self> {
                match code {
                    $($code => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Like `from_code`, for values arriving from the host.
            pub fn parse(code: u8) -> Result<Self> {
                Self::from_code(code).ok_or_else(|| {
                    Error::InvalidRequestedMode(format!(
                        concat!("unknown ", stringify!($name), " {}"),
                        code
                    ))
                })
            }
        }
    };
}

vocabulary!(Active { Inactive = 0, Active = 1 });
vocabulary!(SwingMode { Disabled = 0, Enabled = 1 });
vocabulary!(TemperatureDisplayUnits { Celsius = 0, Fahrenheit = 1 });
vocabulary!(TargetHeatingCoolingState { Off = 0, Heat = 1, Cool = 2, Auto = 3 });
vocabulary!(CurrentHeatingCoolingState { Off = 0, Heat = 1, Cool = 2 });
vocabulary!(TargetHeaterCoolerState { Auto = 0, Heat = 1, Cool = 2 });
vocabulary!(CurrentHeaterCoolerState { Inactive = 0, Idle = 1, Heating = 2, Cooling = 3 });
vocabulary!(TargetHumidifierDehumidifierState {
    HumidifierOrDehumidifier = 0,
    Humidifier = 1,
    Dehumidifier = 2,
});
vocabulary!(CurrentHumidifierDehumidifierState {
    Inactive = 0,
    Idle = 1,
    Humidifying = 2,
    Dehumidifying = 3,
});

impl From<DisplayUnit> for TemperatureDisplayUnits {
    fn from(unit: DisplayUnit) -> Self {
        match unit {
            DisplayUnit::Celsius => TemperatureDisplayUnits::Celsius,
            DisplayUnit::Fahrenheit => TemperatureDisplayUnits::Fahrenheit,
        }
    }
}

impl From<TemperatureDisplayUnits> for DisplayUnit {
    fn from(unit: TemperatureDisplayUnits) -> Self {
        match unit {
            TemperatureDisplayUnits::Celsius => DisplayUnit::Celsius,
            TemperatureDisplayUnits::Fahrenheit => DisplayUnit::Fahrenheit,
        }
    }
}

/// The state change a host request resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModeRequest {
    PowerOff,
    /// Switch mode; `power_on` also turns the unit on in the same commit.
    Mode { mode: AcMode, power_on: bool },
    /// Enter (`true`) or leave (`false`) Dry. Decided against the state the
    /// commit starts from; when already there the current state is resent.
    Dry(bool),
}

/// Which services and vocabularies an accessory exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacteristicProfile {
    /// Thermostat service: one target-state control covering power and mode.
    #[default]
    Thermostat,
    /// Heater-cooler service with a separate Active switch.
    HeaterCooler,
    /// Heater-cooler plus a dehumidifier service driving Dry mode.
    HeaterCoolerDehumidifier,
}

impl CharacteristicProfile {
    pub fn default_capabilities(&self) -> ModeCapabilities {
        match self {
            CharacteristicProfile::Thermostat => ModeCapabilities::two_mode(),
            CharacteristicProfile::HeaterCooler => ModeCapabilities::four_mode(),
            CharacteristicProfile::HeaterCoolerDehumidifier => ModeCapabilities::five_mode(),
        }
    }

    pub fn default_mode(&self) -> AcMode {
        match self {
            CharacteristicProfile::Thermostat => AcMode::Cool,
            _ => AcMode::Auto,
        }
    }

    pub fn has_heater_cooler(&self) -> bool {
        !matches!(self, CharacteristicProfile::Thermostat)
    }

    pub fn has_dehumidifier(&self) -> bool {
        matches!(self, CharacteristicProfile::HeaterCoolerDehumidifier)
    }
}

pub fn target_heating_cooling_state(state: &AcState) -> TargetHeatingCoolingState {
    if !state.power {
        return TargetHeatingCoolingState::Off;
    }
    match state.mode {
        AcMode::Cool => TargetHeatingCoolingState::Cool,
        AcMode::Heat => TargetHeatingCoolingState::Heat,
        AcMode::Auto | AcMode::Dry | AcMode::Fan => TargetHeatingCoolingState::Auto,
    }
}

pub fn current_heating_cooling_state(state: &AcState) -> CurrentHeatingCoolingState {
    match (state.power, state.mode) {
        (true, AcMode::Cool) => CurrentHeatingCoolingState::Cool,
        (true, AcMode::Heat) => CurrentHeatingCoolingState::Heat,
        _ => CurrentHeatingCoolingState::Off,
    }
}

/// Selecting Heat or Cool on a thermostat also powers the unit on.
pub fn thermostat_request(target: TargetHeatingCoolingState) -> ModeRequest {
    match target {
        TargetHeatingCoolingState::Off => ModeRequest::PowerOff,
        TargetHeatingCoolingState::Heat => ModeRequest::Mode {
            mode: AcMode::Heat,
            power_on: true,
        },
        TargetHeatingCoolingState::Cool => ModeRequest::Mode {
            mode: AcMode::Cool,
            power_on: true,
        },
        TargetHeatingCoolingState::Auto => ModeRequest::Mode {
            mode: AcMode::Auto,
            power_on: true,
        },
    }
}

pub fn target_heater_cooler_state(state: &AcState) -> TargetHeaterCoolerState {
    if !state.power {
        return TargetHeaterCoolerState::Auto;
    }
    match state.mode {
        AcMode::Cool => TargetHeaterCoolerState::Cool,
        AcMode::Heat => TargetHeaterCoolerState::Heat,
        AcMode::Auto | AcMode::Dry | AcMode::Fan => TargetHeaterCoolerState::Auto,
    }
}

pub fn current_heater_cooler_state(state: &AcState) -> CurrentHeaterCoolerState {
    if !state.power {
        return CurrentHeaterCoolerState::Inactive;
    }
    match state.mode {
        AcMode::Auto => CurrentHeaterCoolerState::Inactive,
        AcMode::Cool => CurrentHeaterCoolerState::Cooling,
        AcMode::Heat => CurrentHeaterCoolerState::Heating,
        AcMode::Dry | AcMode::Fan => CurrentHeaterCoolerState::Idle,
    }
}

pub fn heater_cooler_request(target: TargetHeaterCoolerState) -> ModeRequest {
    let mode = match target {
        TargetHeaterCoolerState::Auto => AcMode::Auto,
        TargetHeaterCoolerState::Heat => AcMode::Heat,
        TargetHeaterCoolerState::Cool => AcMode::Cool,
    };
    ModeRequest::Mode {
        mode,
        power_on: false,
    }
}

pub fn target_dehumidifier_state(state: &AcState) -> TargetHumidifierDehumidifierState {
    if state.power && state.mode == AcMode::Dry {
        TargetHumidifierDehumidifierState::Dehumidifier
    } else {
        TargetHumidifierDehumidifierState::HumidifierOrDehumidifier
    }
}

pub fn current_dehumidifier_state(state: &AcState) -> CurrentHumidifierDehumidifierState {
    if !state.power {
        CurrentHumidifierDehumidifierState::Inactive
    } else if state.mode == AcMode::Dry {
        CurrentHumidifierDehumidifierState::Dehumidifying
    } else {
        CurrentHumidifierDehumidifierState::Idle
    }
}

/// Dry is entered and left through the dehumidifier service; leaving it goes
/// back to Auto.
pub fn dehumidifier_request(target: TargetHumidifierDehumidifierState) -> Result<ModeRequest> {
    match target {
        TargetHumidifierDehumidifierState::Dehumidifier => Ok(ModeRequest::Dry(true)),
        TargetHumidifierDehumidifierState::HumidifierOrDehumidifier => Ok(ModeRequest::Dry(false)),
        TargetHumidifierDehumidifierState::Humidifier => Err(Error::InvalidRequestedMode(
            "dehumidifier can't be set to humidifier".to_string(),
        )),
    }
}
