// Platform capabilities
//
// Optional, platform-dependent services looked up by name through a
// gateway. The closed PlatformCapability enum keeps lookups typed; an
// absent capability is an ordinary None, never an error.

pub mod location;

pub use location::{
    try_current_location, GeoPosition, LocationCapability, LocationFix, StaticLocator,
    GPS_CAPABILITY,
};

use std::sync::Arc;

/// A named capability resolved by the gateway.
pub enum PlatformCapability {
    Location(Arc<dyn LocationCapability>),
}

/// What the running platform can do.
pub trait Platform: Send + Sync {
    /// Look up a capability by name. None means the platform does not
    /// provide it.
    fn capability(&self, name: &str) -> Option<PlatformCapability>;
}

/// The host machine. Capabilities come from configuration: a configured
/// fixed position becomes the location capability.
pub struct HostPlatform {
    location: Option<Arc<dyn LocationCapability>>,
}

impl HostPlatform {
    pub fn new(position: Option<GeoPosition>) -> Self {
        Self {
            location: position.map(|position| {
                Arc::new(StaticLocator::new(position)) as Arc<dyn LocationCapability>
            }),
        }
    }
}

impl Platform for HostPlatform {
    fn capability(&self, name: &str) -> Option<PlatformCapability> {
        match name {
            GPS_CAPABILITY => self
                .location
                .as_ref()
                .map(|locator| PlatformCapability::Location(Arc::clone(locator))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_platform_without_position_has_no_gps() {
        let platform = HostPlatform::new(None);
        assert!(platform.capability(GPS_CAPABILITY).is_none());
    }

    #[test]
    fn test_host_platform_with_position_exposes_gps() {
        let platform = HostPlatform::new(Some(GeoPosition {
            latitude: 37.4,
            longitude: -122.1,
            display: None,
        }));
        assert!(platform.capability(GPS_CAPABILITY).is_some());
    }

    #[test]
    fn test_unknown_capability_names_resolve_to_none() {
        let platform = HostPlatform::new(None);
        assert!(platform.capability("bluetooth").is_none());
        assert!(platform.capability("").is_none());
    }
}
