use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::accessory::Accessory;
use crate::capabilities::ModeCapabilities;
use crate::controller::{AcController, AcControllerBuilder};
use crate::profile::CharacteristicProfile;
use crate::types::{AcMode, DisplayUnit};
use crate::{Error, Result};

/// Accessory block as written in the host's config file. Unknown keys (the
/// host adds its own, such as `accessory`) are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccessoryConfig {
    pub name: String,
    pub api_url: String,
    #[serde(default)]
    pub profile: CharacteristicProfile,
    #[serde(default)]
    pub default_mode: Option<AcMode>,
    #[serde(default)]
    pub display_unit: Option<DisplayUnit>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Overrides whether `powerful=` is sent.
    #[serde(default)]
    pub boost: Option<bool>,
}

impl AccessoryConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("name must not be empty".to_string()));
        }
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "api_url must be an http(s) URL, got {:?}",
                self.api_url
            )));
        }
        if self.timeout_ms == Some(0) {
            return Err(Error::Config("timeout_ms must be positive".to_string()));
        }
        let mode = self.default_mode();
        if !self.capabilities().supports(mode) {
            return Err(Error::Config(format!(
                "default_mode {mode:?} is not available in the {:?} profile",
                self.profile
            )));
        }
        Ok(())
    }

    pub fn capabilities(&self) -> ModeCapabilities {
        let mut caps = self.profile.default_capabilities();
        if let Some(boost) = self.boost {
            caps = caps.with_boost(boost);
        }
        caps
    }

    pub fn default_mode(&self) -> AcMode {
        self.default_mode.unwrap_or_else(|| self.profile.default_mode())
    }

    /// Controller builder preloaded from this config, for callers that want
    /// to attach event callbacks or a command log before building.
    pub fn controller_builder(&self) -> AcControllerBuilder {
        let mut builder = AcController::builder(self.api_url.clone())
            .capabilities(self.capabilities())
            .default_mode(self.default_mode())
            .display_unit(self.display_unit.unwrap_or_default());
        if let Some(ms) = self.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        builder
    }

    pub fn accessory(&self, builder: AcControllerBuilder) -> Result<Accessory> {
        self.validate()?;
        Ok(Accessory::new(self.name.clone(), self.profile, builder.build()?))
    }

    pub fn build(&self) -> Result<Accessory> {
        self.accessory(self.controller_builder())
    }
}
