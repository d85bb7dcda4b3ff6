use std::collections::HashSet;

use uuid::Uuid;

use crate::controller::{AcController, Outcome};
use crate::profile::*;
use crate::types::AcMode;
use crate::{Error, Result};

pub const MANUFACTURER: &str = "homebridge-daikinir";
pub const MODEL: &str = "Daikin IR Controlled Air Conditioner";

// The unit reports nothing back; these are what the host shows as readings.
const CURRENT_TEMPERATURE_C: f64 = 25.0;
const CURRENT_RELATIVE_HUMIDITY: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    AccessoryInformation,
    Thermostat,
    HeaterCooler,
    HumidifierDehumidifier,
    BoostSwitch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Characteristic {
    Active,
    CurrentHeatingCoolingState,
    TargetHeatingCoolingState,
    CurrentHeaterCoolerState,
    TargetHeaterCoolerState,
    CurrentTemperature,
    TargetTemperature,
    CoolingThresholdTemperature,
    HeatingThresholdTemperature,
    TemperatureDisplayUnits,
    SwingMode,
    CurrentRelativeHumidity,
    CurrentHumidifierDehumidifierState,
    TargetHumidifierDehumidifierState,
    /// Boost switch.
    On,
}

impl Characteristic {
    pub fn is_writable(&self) -> bool {
        !matches!(
            self,
            Characteristic::CurrentHeatingCoolingState
                | Characteristic::CurrentHeaterCoolerState
                | Characteristic::CurrentTemperature
                | Characteristic::CurrentRelativeHumidity
                | Characteristic::CurrentHumidifierDehumidifierState
        )
    }
}

/// Value exchanged with the host. Enumerated characteristics use `Code`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacteristicValue {
    Bool(bool),
    Code(u8),
    Float(f64),
}

impl CharacteristicValue {
    fn as_code(&self) -> Result<u8> {
        match *self {
            CharacteristicValue::Code(code) => Ok(code),
            CharacteristicValue::Bool(b) => Ok(b as u8),
            CharacteristicValue::Float(f) if f.fract() == 0.0 && (0.0..=255.0).contains(&f) => {
                Ok(f as u8)
            }
            CharacteristicValue::Float(f) => {
                Err(Error::InvalidRequestedMode(format!("not an enumerated value: {f}")))
            }
        }
    }

    fn as_bool(&self) -> Result<bool> {
        match *self {
            CharacteristicValue::Bool(b) => Ok(b),
            CharacteristicValue::Code(0) => Ok(false),
            CharacteristicValue::Code(1) => Ok(true),
            other => Err(Error::InvalidRequestedMode(format!("not a boolean: {other:?}"))),
        }
    }

    fn as_float(&self) -> Result<f64> {
        match *self {
            CharacteristicValue::Float(f) => Ok(f),
            CharacteristicValue::Code(code) => Ok(code as f64),
            CharacteristicValue::Bool(_) => {
                Err(Error::InvalidRequestedMode("expected a temperature".to_string()))
            }
        }
    }
}

/// Bounds the host enforces on a numeric characteristic, in Celsius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacteristicProps {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescriptor {
    pub service: Service,
    pub name: String,
    pub characteristics: Vec<(Characteristic, Option<CharacteristicProps>)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInformation {
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub name: String,
    pub serial_number: String,
}

/// One air conditioner as the host sees it: a profile's services bound to a
/// controller.
pub struct Accessory {
    name: String,
    profile: CharacteristicProfile,
    controller: AcController,
    exposed: HashSet<Characteristic>,
}

impl Accessory {
    pub fn new(name: impl Into<String>, profile: CharacteristicProfile, controller: AcController) -> Self {
        let mut accessory = Self {
            name: name.into(),
            profile,
            controller,
            exposed: HashSet::new(),
        };
        // Services only depend on the profile and the fixed capabilities.
        accessory.exposed = accessory
            .services()
            .into_iter()
            .flat_map(|s| s.characteristics.into_iter().map(|(c, _)| c))
            .collect();
        accessory
    }

    pub fn controller(&self) -> &AcController {
        &self.controller
    }

    pub fn profile(&self) -> CharacteristicProfile {
        self.profile
    }

    /// Display label: the configured name with hyphens turned into spaces.
    pub fn label(&self) -> String {
        self.name.replace('-', " ")
    }

    pub fn information(&self) -> AccessoryInformation {
        AccessoryInformation {
            manufacturer: MANUFACTURER,
            model: MODEL,
            name: self.name.clone(),
            serial_number: Uuid::new_v5(&Uuid::NAMESPACE_OID, self.name.as_bytes()).to_string(),
        }
    }

    pub fn services(&self) -> Vec<ServiceDescriptor> {
        let caps = self.controller.capabilities();
        let label = self.label();
        let range_props = |mode: AcMode| {
            caps.range(mode).map(|r| CharacteristicProps {
                min: r.min(),
                max: r.max(),
                step: 1.0,
            })
        };

        let mut services = vec![ServiceDescriptor {
            service: Service::AccessoryInformation,
            name: self.name.clone(),
            characteristics: Vec::new(),
        }];

        if self.profile.has_heater_cooler() {
            let mut chars = vec![
                (Characteristic::Active, None),
                (Characteristic::CurrentHeaterCoolerState, None),
                (Characteristic::TargetHeaterCoolerState, None),
                (Characteristic::CurrentTemperature, None),
                (Characteristic::SwingMode, None),
            ];
            if caps.supports(AcMode::Cool) {
                chars.push((Characteristic::CoolingThresholdTemperature, range_props(AcMode::Cool)));
            }
            if caps.supports(AcMode::Heat) {
                chars.push((Characteristic::HeatingThresholdTemperature, range_props(AcMode::Heat)));
            }
            chars.push((Characteristic::TemperatureDisplayUnits, None));
            services.push(ServiceDescriptor {
                service: Service::HeaterCooler,
                name: label.clone(),
                characteristics: chars,
            });
        } else {
            let min = caps.modes().filter_map(|m| caps.range(m)).map(|r| r.min()).reduce(f64::min);
            let max = caps.modes().filter_map(|m| caps.range(m)).map(|r| r.max()).reduce(f64::max);
            let target_props = min.zip(max).map(|(min, max)| CharacteristicProps { min, max, step: 1.0 });
            services.push(ServiceDescriptor {
                service: Service::Thermostat,
                name: label.clone(),
                characteristics: vec![
                    (Characteristic::CurrentHeatingCoolingState, None),
                    (Characteristic::TargetHeatingCoolingState, None),
                    (Characteristic::CurrentTemperature, None),
                    (Characteristic::TargetTemperature, target_props),
                    (Characteristic::TemperatureDisplayUnits, None),
                ],
            });
        }

        if self.profile.has_dehumidifier() {
            services.push(ServiceDescriptor {
                service: Service::HumidifierDehumidifier,
                name: label.clone(),
                characteristics: vec![
                    (Characteristic::CurrentRelativeHumidity, None),
                    (Characteristic::CurrentHumidifierDehumidifierState, None),
                    (Characteristic::TargetHumidifierDehumidifierState, None),
                    (Characteristic::Active, None),
                    (Characteristic::SwingMode, None),
                ],
            });
        }

        if caps.boost() {
            services.push(ServiceDescriptor {
                service: Service::BoostSwitch,
                name: format!("{label} Powerful"),
                characteristics: vec![(Characteristic::On, None)],
            });
        }
        services
    }

    pub fn exposes(&self, characteristic: Characteristic) -> bool {
        self.exposed.contains(&characteristic)
    }

    pub fn get(&self, characteristic: Characteristic) -> Result<CharacteristicValue> {
        self.require_exposed(characteristic)?;
        let ctl = &self.controller;
        let state = ctl.state();
        let value = match characteristic {
            Characteristic::Active => {
                let active = if state.power { Active::Active } else { Active::Inactive };
                CharacteristicValue::Code(active.code())
            }
            Characteristic::CurrentHeatingCoolingState => {
                CharacteristicValue::Code(current_heating_cooling_state(&state).code())
            }
            Characteristic::TargetHeatingCoolingState => {
                CharacteristicValue::Code(target_heating_cooling_state(&state).code())
            }
            Characteristic::CurrentHeaterCoolerState => {
                CharacteristicValue::Code(current_heater_cooler_state(&state).code())
            }
            Characteristic::TargetHeaterCoolerState => {
                CharacteristicValue::Code(target_heater_cooler_state(&state).code())
            }
            Characteristic::CurrentTemperature => {
                CharacteristicValue::Float(ctl.display_unit().to_display(CURRENT_TEMPERATURE_C))
            }
            Characteristic::TargetTemperature
            | Characteristic::CoolingThresholdTemperature
            | Characteristic::HeatingThresholdTemperature => {
                CharacteristicValue::Float(ctl.target_temperature())
            }
            Characteristic::TemperatureDisplayUnits => {
                CharacteristicValue::Code(TemperatureDisplayUnits::from(ctl.display_unit()).code())
            }
            Characteristic::SwingMode => {
                let swing = if state.swing { SwingMode::Enabled } else { SwingMode::Disabled };
                CharacteristicValue::Code(swing.code())
            }
            Characteristic::CurrentRelativeHumidity => CharacteristicValue::Float(CURRENT_RELATIVE_HUMIDITY),
            Characteristic::CurrentHumidifierDehumidifierState => {
                CharacteristicValue::Code(current_dehumidifier_state(&state).code())
            }
            Characteristic::TargetHumidifierDehumidifierState => {
                CharacteristicValue::Code(target_dehumidifier_state(&state).code())
            }
            Characteristic::On => CharacteristicValue::Bool(state.boost),
        };
        Ok(value)
    }

    /// Changing the display unit never reaches the bridge and reports
    /// `Outcome::Suppressed`.
    pub async fn set(&self, characteristic: Characteristic, value: CharacteristicValue) -> Result<Outcome> {
        self.require_exposed(characteristic)?;
        if !characteristic.is_writable() {
            return Err(Error::Unsupported(format!("{characteristic:?} is read-only")));
        }
        let ctl = &self.controller;
        match characteristic {
            Characteristic::Active => {
                let active = Active::parse(value.as_code()?)?;
                ctl.set_power(active == Active::Active).await
            }
            Characteristic::TargetHeatingCoolingState => {
                let target = TargetHeatingCoolingState::parse(value.as_code()?)?;
                self.execute(thermostat_request(target)).await
            }
            Characteristic::TargetHeaterCoolerState => {
                let target = TargetHeaterCoolerState::parse(value.as_code()?)?;
                self.execute(heater_cooler_request(target)).await
            }
            Characteristic::TargetHumidifierDehumidifierState => {
                let target = TargetHumidifierDehumidifierState::parse(value.as_code()?)?;
                self.execute(dehumidifier_request(target)?).await
            }
            Characteristic::TargetTemperature => ctl.set_target_temperature(value.as_float()?).await,
            Characteristic::CoolingThresholdTemperature => {
                ctl.set_mode_and_temperature(AcMode::Cool, value.as_float()?).await
            }
            Characteristic::HeatingThresholdTemperature => {
                ctl.set_mode_and_temperature(AcMode::Heat, value.as_float()?).await
            }
            Characteristic::TemperatureDisplayUnits => {
                let unit = TemperatureDisplayUnits::parse(value.as_code()?)?;
                ctl.set_display_unit(unit.into());
                Ok(Outcome::Suppressed)
            }
            Characteristic::SwingMode => {
                let swing = SwingMode::parse(value.as_code()?)?;
                ctl.set_swing(swing == SwingMode::Enabled).await
            }
            Characteristic::On => ctl.set_boost(value.as_bool()?).await,
            Characteristic::CurrentHeatingCoolingState
            | Characteristic::CurrentHeaterCoolerState
            | Characteristic::CurrentTemperature
            | Characteristic::CurrentRelativeHumidity
            | Characteristic::CurrentHumidifierDehumidifierState => {
                Err(Error::Unsupported(format!("{characteristic:?} is read-only")))
            }
        }
    }

    async fn execute(&self, request: ModeRequest) -> Result<Outcome> {
        let ctl = &self.controller;
        match request {
            ModeRequest::PowerOff => ctl.set_power(false).await,
            ModeRequest::Mode {
                mode,
                power_on: true,
            } => ctl.set_mode_with_power(mode, true).await,
            ModeRequest::Mode {
                mode,
                power_on: false,
            } => ctl.set_mode(mode).await,
            ModeRequest::Dry(dry) => ctl.set_dry(dry).await,
        }
    }

    fn require_exposed(&self, characteristic: Characteristic) -> Result<()> {
        if self.exposes(characteristic) {
            Ok(())
        } else {
            Err(Error::Unsupported(format!(
                "{characteristic:?} is not exposed by the {:?} profile",
                self.profile
            )))
        }
    }
}
