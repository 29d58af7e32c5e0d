//! JSON configuration: theme constants, accounts, device profile.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::bottom_nav::NavTheme;
use crate::error::Result;
use crate::settings::DeviceProfile;
use crate::theme::{PhoneAccount, PhoneAccounts, ThemeCalculator, ThemeConstants};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeConstants,
    pub accounts: Vec<PhoneAccount>,
    pub device: DeviceProfile,
    /// Name reported for the current ringtone; absent means silent.
    pub ringtone: Option<String>,
    pub nav: NavTheme,
}

impl Config {
    /// Load `path`, or defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn phone_accounts(&self) -> PhoneAccounts {
        PhoneAccounts::new(self.accounts.iter().cloned())
    }

    pub fn calculator(&self) -> ThemeCalculator<PhoneAccounts> {
        ThemeCalculator::new(self.theme.clone(), self.phone_accounts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Argb;
    use crate::error::Error;
    use crate::theme::AccountHandle;

    #[test]
    fn empty_object_is_all_defaults() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_config_overrides_fields() {
        let config = Config::from_json(
            r##"{
                "theme": { "theme_override": true, "accent": "#FF102030" },
                "accounts": [ { "id": "sim1", "label": "One", "highlight_color": "#4285F4" } ],
                "device": { "has_vibrator": false }
            }"##,
        )
        .unwrap();
        assert!(config.theme.theme_override);
        assert_eq!(config.theme.accent, Argb(0xFF10_2030));
        assert_eq!(config.theme.gradient_top, ThemeConstants::default().gradient_top);
        assert!(!config.device.has_vibrator);
        assert_eq!(config.device.sdk_version, DeviceProfile::default().sdk_version);
        let accounts = config.phone_accounts();
        let sim1 = accounts.get(&AccountHandle::new("sim1")).unwrap();
        assert_eq!(sim1.highlight_color, Some(Argb(0xFF42_85F4)));
    }

    #[test]
    fn bad_color_is_an_error() {
        let err = Config::from_json(r##"{ "theme": { "accent": "#XYZ" } }"##).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }
}
