// Settings structures
//
// Everything a deployment can tune, with defaults that make a bare
// installation work: discovery on with the standard bound, a named local
// session that may configure devices, no fixed location.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::platform::GeoPosition;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub discovery: DiscoverySettings,
    #[serde(default)]
    pub session: SessionSettings,
    /// Optional fixed position exposed as the gps capability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoPosition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySettings {
    /// Deployment switch. False means this installation ships without a
    /// discovery service at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Bound for one browse, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Anonymous sessions may not discover or configure devices.
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default = "default_allow_configure")]
    pub allow_configure: bool,
}

fn default_enabled() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_allow_configure() -> bool {
    true
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            anonymous: false,
            allow_configure: default_allow_configure(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.discovery.timeout_secs == 0 {
            bail!("discovery.timeout_secs must be greater than 0");
        }
        if let Some(location) = &self.location {
            if !(-90.0..=90.0).contains(&location.latitude) {
                bail!("location.latitude must be between -90 and 90");
            }
            if !(-180.0..=180.0).contains(&location.longitude) {
                bail!("location.longitude must be between -180 and 180");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = Settings::default();
        assert!(settings.discovery.enabled);
        assert_eq!(settings.discovery.timeout_secs, 20);
        assert!(!settings.session.anonymous);
        assert!(settings.session.allow_configure);
        assert!(settings.location.is_none());
        settings.validate().unwrap();
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut settings = Settings::default();
        settings.discovery.timeout_secs = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let mut settings = Settings::default();
        settings.location = Some(GeoPosition {
            latitude: 95.0,
            longitude: 0.0,
            display: None,
        });
        assert!(settings.validate().is_err());

        settings.location = Some(GeoPosition {
            latitude: 0.0,
            longitude: -200.0,
            display: None,
        });
        assert!(settings.validate().is_err());
    }
}
