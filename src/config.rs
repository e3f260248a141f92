use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tokio::fs;

use crate::core::{ColumnLayout, ConfigError};
use crate::hal::{ChannelKind, PressureProfile};

/// Which channels a session records, and how to read them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(alias = "gyroAccelEnabled")]
    pub gyro_accel_enabled: bool,
    #[serde(alias = "tempPressureEnabled")]
    pub temp_pressure_enabled: bool,
    #[serde(alias = "ambientLightEnabled")]
    pub ambient_light_enabled: bool,
    #[serde(alias = "pressureProfile")]
    pub pressure_profile: PressureProfile,

    /// Read the sample-interval control back after writing it
    #[serde(alias = "verifyControlWrite")]
    pub verify_control_write: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gyro_accel_enabled: false,
            temp_pressure_enabled: false,
            ambient_light_enabled: false,
            pressure_profile: PressureProfile::Unsigned,
            verify_control_write: true,
        }
    }
}

impl SessionConfig {
    pub fn with_channels(channels: impl IntoIterator<Item = ChannelKind>) -> Self {
        let mut config = Self::default();
        for kind in channels {
            config.set_enabled(kind, true);
        }
        config
    }

    pub fn from_json(config: Value) -> Result<Self, ConfigError> {
        let config: SessionConfig =
            serde_json::from_value(config).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON session file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read session config {:?}", path))?;

        let config: SessionConfig =
            serde_json::from_str(&content).context("Failed to parse session config JSON")?;

        config.validate()?;
        Ok(config)
    }

    pub fn is_enabled(&self, kind: ChannelKind) -> bool {
        match kind {
            ChannelKind::GyroAccel => self.gyro_accel_enabled,
            ChannelKind::TempPressure => self.temp_pressure_enabled,
            ChannelKind::AmbientLight => self.ambient_light_enabled,
        }
    }

    pub fn set_enabled(&mut self, kind: ChannelKind, enabled: bool) {
        match kind {
            ChannelKind::GyroAccel => self.gyro_accel_enabled = enabled,
            ChannelKind::TempPressure => self.temp_pressure_enabled = enabled,
            ChannelKind::AmbientLight => self.ambient_light_enabled = enabled,
        }
    }

    pub fn enabled_channels(&self) -> Vec<ChannelKind> {
        ChannelKind::ALL
            .into_iter()
            .filter(|&kind| self.is_enabled(kind))
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled_channels().is_empty() {
            return Err(ConfigError::NoChannelEnabled);
        }
        Ok(())
    }

    /// Active-channel layout for a session using this config
    pub fn layout(&self) -> Result<ColumnLayout, ConfigError> {
        self.validate()?;
        Ok(ColumnLayout::new(self.enabled_channels()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_all_disabled_rejected() {
        let config = SessionConfig::default();
        assert_eq!(config.validate(), Err(ConfigError::NoChannelEnabled));
        assert_eq!(config.layout(), Err(ConfigError::NoChannelEnabled));
    }

    #[test]
    fn test_from_json_defaults() {
        let config = SessionConfig::from_json(json!({
            "ambient_light_enabled": true,
            "pressure_profile": "signed"
        }))
        .unwrap();

        assert_eq!(config.enabled_channels(), vec![ChannelKind::AmbientLight]);
        assert_eq!(config.pressure_profile, PressureProfile::Signed);
        assert!(config.verify_control_write);
    }

    #[test]
    fn test_from_json_rejects_bad_profile() {
        let err = SessionConfig::from_json(json!({ "pressure_profile": "kelvin" })).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_json_camel_case_keys() {
        let config = SessionConfig::from_json(json!({
            "gyroAccelEnabled": true,
            "ambientLightEnabled": true
        }))
        .unwrap();

        assert_eq!(
            config.enabled_channels(),
            vec![ChannelKind::GyroAccel, ChannelKind::AmbientLight]
        );
    }

    #[test]
    fn test_from_json_rejects_unknown_key() {
        let err = SessionConfig::from_json(json!({
            "ambient_light_enabled": true,
            "ambientLightEnabeld": true
        }))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_json_validates() {
        let err = SessionConfig::from_json(json!({ "gyroAccelEnabled": false })).unwrap_err();
        assert_eq!(err, ConfigError::NoChannelEnabled);
    }

    #[test]
    fn test_layout_follows_fixed_order() {
        let config =
            SessionConfig::with_channels([ChannelKind::AmbientLight, ChannelKind::GyroAccel]);
        let layout = config.layout().unwrap();
        assert_eq!(
            layout.channels(),
            &[ChannelKind::GyroAccel, ChannelKind::AmbientLight]
        );
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{ "temp_pressure_enabled": true }"#).unwrap();

        let config = SessionConfig::load(&path).await.unwrap();
        assert_eq!(config.enabled_channels(), vec![ChannelKind::TempPressure]);

        std::fs::write(&path, "{}").unwrap();
        assert!(SessionConfig::load(&path).await.is_err());
    }
}
