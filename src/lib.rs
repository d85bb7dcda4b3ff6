mod accessory;
mod capabilities;
mod client;
mod config;
mod controller;
mod error;
mod events;
mod journal;
pub mod profile;
mod protocol;
mod types;

pub use accessory::{
    Accessory, AccessoryInformation, Characteristic, CharacteristicProps, CharacteristicValue,
    Service, ServiceDescriptor, MANUFACTURER, MODEL,
};
pub use capabilities::{ModeCapabilities, ModeSpec};
pub use config::AccessoryConfig;
pub use controller::{AcController, AcControllerBuilder, Outcome};
pub use error::{Error, Result};
pub use events::Event;
pub use journal::CommandLogMode;
pub use profile::CharacteristicProfile;
pub use protocol::{command_query, command_url, parse_reply, BridgeReply};
pub use types::*;
