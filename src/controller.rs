use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, error, info};

use crate::capabilities::ModeCapabilities;
use crate::client::BridgeClient;
use crate::events::{state_events, Event};
use crate::journal::{CommandJournal, CommandLogMode};
use crate::protocol::command_url;
use crate::types::*;
use crate::{Error, Result};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

type EventCallback = Box<dyn Fn(&Event) + Send + Sync>;

/// Result of a setter that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The bridge acknowledged and the candidate state is now current.
    Committed,
    /// Nothing to send; state and bridge were left alone.
    Suppressed,
}

/// A single-attribute change merged into a copy of the current state.
#[derive(Debug, Clone, Copy)]
enum Change {
    Power(bool),
    Mode { mode: AcMode, power: Option<bool> },
    /// `value` is in the display unit. `mode` switches modes in the same commit.
    Temperature { mode: Option<AcMode>, value: f64 },
    Swing(bool),
    Boost(bool),
    /// Enter or leave Dry, resolved against the state under the commit lock.
    Dry(bool),
    Resend,
}

pub struct AcControllerBuilder {
    api_url: String,
    capabilities: ModeCapabilities,
    default_mode: Option<AcMode>,
    display_unit: DisplayUnit,
    timeout: Duration,
    event_callbacks: Vec<EventCallback>,
    log_mode: Option<CommandLogMode>,
    log_path: Option<String>,
}

impl AcControllerBuilder {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            capabilities: ModeCapabilities::two_mode(),
            default_mode: None,
            display_unit: DisplayUnit::Celsius,
            timeout: DEFAULT_TIMEOUT,
            event_callbacks: Vec::new(),
            log_mode: None,
            log_path: None,
        }
    }

    pub fn capabilities(mut self, capabilities: ModeCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Mode the unit starts in. Defaults to the first supported mode.
    pub fn default_mode(mut self, mode: AcMode) -> Self {
        self.default_mode = Some(mode);
        self
    }

    pub fn display_unit(mut self, unit: DisplayUnit) -> Self {
        self.display_unit = unit;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn on_event(mut self, f: impl Fn(&Event) + Send + Sync + 'static) -> Self {
        self.event_callbacks.push(Box::new(f));
        self
    }

    pub fn command_log(mut self, mode: CommandLogMode, path: impl Into<String>) -> Self {
        self.log_mode = Some(mode);
        self.log_path = Some(path.into());
        self
    }

    pub fn build(self) -> Result<AcController> {
        let mode = match self.default_mode {
            Some(mode) => mode,
            None => self
                .capabilities
                .modes()
                .next()
                .ok_or_else(|| Error::Config("no modes configured".to_string()))?,
        };
        let temperature = self.capabilities.default_temperature(mode).ok_or_else(|| {
            Error::Config(format!("default mode {mode:?} is not supported by this unit"))
        })?;

        let journal = match (self.log_mode, self.log_path) {
            (Some(mode), Some(path)) => Some(Mutex::new(CommandJournal::new(mode, &path)?)),
            _ => None,
        };

        Ok(AcController {
            bridge: BridgeClient::new(self.api_url, self.timeout)?,
            capabilities: self.capabilities,
            state: RwLock::new(AcState::initial(mode, temperature)),
            display_unit: RwLock::new(self.display_unit),
            commit_lock: tokio::sync::Mutex::new(()),
            event_callbacks: self.event_callbacks,
            journal,
        })
    }
}

/// Owns the last commanded state of one unit and the commit path to its
/// bridge.
///
/// Getters never wait on the network. Setters are serialized: each holds the
/// commit lock from reading the current state until the bridge has answered,
/// so concurrent setters cannot overwrite each other's commits.
pub struct AcController {
    bridge: BridgeClient,
    capabilities: ModeCapabilities,
    state: RwLock<AcState>,
    display_unit: RwLock<DisplayUnit>,
    commit_lock: tokio::sync::Mutex<()>,
    event_callbacks: Vec<EventCallback>,
    journal: Option<Mutex<CommandJournal>>,
}

impl AcController {
    pub fn builder(api_url: impl Into<String>) -> AcControllerBuilder {
        AcControllerBuilder::new(api_url)
    }

    pub fn capabilities(&self) -> &ModeCapabilities {
        &self.capabilities
    }

    pub fn state(&self) -> AcState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn power(&self) -> bool {
        self.state().power
    }

    pub fn mode(&self) -> AcMode {
        self.state().mode
    }

    pub fn swing(&self) -> bool {
        self.state().swing
    }

    pub fn boost(&self) -> bool {
        self.state().boost
    }

    pub fn operating_state(&self) -> OperatingState {
        self.state().operating_state()
    }

    /// Target temperature in the display unit.
    pub fn target_temperature(&self) -> f64 {
        self.display_unit().to_display(self.state().target_temperature)
    }

    pub fn display_unit(&self) -> DisplayUnit {
        *self.display_unit.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Only affects how temperatures are read and written; never sent.
    pub fn set_display_unit(&self, unit: DisplayUnit) {
        *self.display_unit.write().unwrap_or_else(PoisonError::into_inner) = unit;
    }

    pub async fn set_power(&self, power: bool) -> Result<Outcome> {
        self.apply("set_power", Change::Power(power)).await
    }

    /// Selecting a mode, including the active one, resets the target to that
    /// mode's default.
    pub async fn set_mode(&self, mode: AcMode) -> Result<Outcome> {
        self.apply("set_mode", Change::Mode { mode, power: None }).await
    }

    pub async fn set_mode_with_power(&self, mode: AcMode, power: bool) -> Result<Outcome> {
        self.apply(
            "set_mode",
            Change::Mode {
                mode,
                power: Some(power),
            },
        )
        .await
    }

    /// `value` is in the display unit and must lie in the active mode's range.
    pub async fn set_target_temperature(&self, value: f64) -> Result<Outcome> {
        self.apply("set_target_temperature", Change::Temperature { mode: None, value })
            .await
    }

    pub async fn set_mode_and_temperature(&self, mode: AcMode, value: f64) -> Result<Outcome> {
        self.apply(
            "set_mode_and_temperature",
            Change::Temperature {
                mode: Some(mode),
                value,
            },
        )
        .await
    }

    pub async fn set_swing(&self, swing: bool) -> Result<Outcome> {
        self.apply("set_swing", Change::Swing(swing)).await
    }

    /// The unit toggles boost on every "powerful" command, so a request for
    /// the current value is suppressed.
    pub async fn set_boost(&self, boost: bool) -> Result<Outcome> {
        self.apply("set_boost", Change::Boost(boost)).await
    }

    /// Enters Dry, or leaves it for Auto. Resends the current state when the
    /// unit is already where it was asked to be.
    pub async fn set_dry(&self, dry: bool) -> Result<Outcome> {
        self.apply("set_dry", Change::Dry(dry)).await
    }

    /// Sends the current state again, e.g. after the unit missed an IR burst.
    pub async fn resend(&self) -> Result<Outcome> {
        self.apply("resend", Change::Resend).await
    }

    async fn apply(&self, action: &'static str, change: Change) -> Result<Outcome> {
        let _commit = self.commit_lock.lock().await;
        let current = self.state();

        let Some(candidate) = self.candidate(&current, change)? else {
            debug!(action, "redundant command suppressed");
            return Ok(Outcome::Suppressed);
        };

        let url = command_url(self.bridge.api_url(), &candidate, &self.capabilities);
        debug!(action, ?candidate, "committing state");
        if let Some(ref journal) = self.journal {
            journal
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .log_request(&url, &candidate);
        }

        let reply = match self.bridge.send(&url).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(action, url = %url, "error occurred: {e}");
                if let Some(ref journal) = self.journal {
                    journal
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .log_failure(&url, &e.to_string());
                }
                return Err(e);
            }
        };

        if let Some(message) = reply.message() {
            info!("{message}");
        }
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = candidate;

        let events = state_events(&current, &candidate, self.display_unit());
        if let Some(ref journal) = self.journal {
            journal
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .log_commit(&candidate, &events, reply.message());
        }
        for event in &events {
            for cb in &self.event_callbacks {
                cb(event);
            }
        }
        Ok(Outcome::Committed)
    }

    /// Copy of `current` with `change` applied, or `None` when there is
    /// nothing to send.
    fn candidate(&self, current: &AcState, change: Change) -> Result<Option<AcState>> {
        let mut next = *current;
        match change {
            Change::Power(power) => next.power = power,
            Change::Mode { mode, power } => {
                self.select_mode(&mut next, mode)?;
                if let Some(power) = power {
                    next.power = power;
                }
            }
            Change::Temperature { mode, value } => {
                let mode = mode.unwrap_or(current.mode);
                self.require_mode(mode)?;
                // The bridge takes whole degrees; commit what is sent.
                let celsius = self.display_unit().to_celsius(value).round();
                match self.mode_temperature(mode)? {
                    ModeTemperature::Range(range) if range.contains(celsius) => {}
                    ModeTemperature::Range(range) => {
                        return Err(Error::TemperatureOutOfRange {
                            mode,
                            celsius,
                            min: range.min(),
                            max: range.max(),
                        });
                    }
                    ModeTemperature::Fixed(_) => return Err(Error::TemperatureNotAdjustable(mode)),
                }
                next.mode = mode;
                next.target_temperature = celsius;
            }
            Change::Swing(swing) => next.swing = swing,
            Change::Boost(boost) => {
                if !self.capabilities.boost() {
                    return Err(Error::Unsupported("boost".to_string()));
                }
                if current.boost == boost {
                    return Ok(None);
                }
                next.boost = boost;
            }
            Change::Dry(true) if current.mode != AcMode::Dry => {
                self.select_mode(&mut next, AcMode::Dry)?
            }
            Change::Dry(false) if current.mode == AcMode::Dry => {
                self.select_mode(&mut next, AcMode::Auto)?
            }
            Change::Dry(_) | Change::Resend => {}
        }
        Ok(Some(next))
    }

    fn select_mode(&self, next: &mut AcState, mode: AcMode) -> Result<()> {
        next.target_temperature = self.mode_temperature(mode)?.default();
        next.mode = mode;
        Ok(())
    }

    fn require_mode(&self, mode: AcMode) -> Result<()> {
        if self.capabilities.supports(mode) {
            Ok(())
        } else {
            Err(Error::InvalidRequestedMode(format!(
                "{mode:?} is not supported by this unit"
            )))
        }
    }

    fn mode_temperature(&self, mode: AcMode) -> Result<ModeTemperature> {
        self.capabilities
            .temperature(mode)
            .ok_or_else(|| Error::InvalidRequestedMode(format!("{mode:?} is not supported by this unit")))
    }
}
