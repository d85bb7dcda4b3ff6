use serde::Serialize;

use crate::types::{AcMode, AcState, DisplayUnit};

/// Emitted after a commit, one per attribute that changed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    PowerChanged { power: bool },
    ModeChanged { mode: AcMode },
    /// `display` is in the unit the control surface currently uses.
    TargetTemperatureChanged { celsius: f64, display: f64 },
    SwingChanged { swing: bool },
    BoostChanged { boost: bool },
}

pub(crate) fn state_events(previous: &AcState, current: &AcState, unit: DisplayUnit) -> Vec<Event> {
    let mut events = Vec::new();
    if previous.power != current.power {
        events.push(Event::PowerChanged {
            power: current.power,
        });
    }
    if previous.mode != current.mode {
        events.push(Event::ModeChanged { mode: current.mode });
    }
    if previous.target_temperature != current.target_temperature {
        events.push(Event::TargetTemperatureChanged {
            celsius: current.target_temperature,
            display: unit.to_display(current.target_temperature),
        });
    }
    if previous.swing != current.swing {
        events.push(Event::SwingChanged {
            swing: current.swing,
        });
    }
    if previous.boost != current.boost {
        events.push(Event::BoostChanged {
            boost: current.boost,
        });
    }
    events
}
