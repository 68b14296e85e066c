// Location lookup
//
// Best-effort current position through the platform gateway. The
// three-way LocationFix keeps "platform can't do this" distinct from
// "provider has no fix right now"; callers that only care about having a
// position collapse it with LocationFix::position().

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Platform, PlatformCapability};

/// Name under which platforms expose their locator.
pub const GPS_CAPABILITY: &str = "gps";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPosition {
    pub latitude: f64,
    pub longitude: f64,
    /// Optional display label supplied by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// Outcome of a location lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationFix {
    /// This platform has no location capability.
    Unsupported,
    /// The capability exists but could not produce a fix.
    Unavailable,
    /// A usable position.
    Position(GeoPosition),
}

impl LocationFix {
    pub fn position(self) -> Option<GeoPosition> {
        match self {
            LocationFix::Position(position) => Some(position),
            LocationFix::Unsupported | LocationFix::Unavailable => None,
        }
    }
}

/// A platform location provider. Any timeout is the provider's own.
#[async_trait]
pub trait LocationCapability: Send + Sync {
    /// Current position, or None when no fix is available right now.
    async fn current_location(&self) -> Result<Option<GeoPosition>>;
}

/// Look up the current position through `platform`. Absence of the
/// capability and absence of a fix are both ordinary outcomes; only a
/// provider that breaks while answering is an error.
pub async fn try_current_location(platform: &dyn Platform) -> Result<LocationFix> {
    let Some(capability) = platform.capability(GPS_CAPABILITY) else {
        return Ok(LocationFix::Unsupported);
    };
    let PlatformCapability::Location(locator) = capability;
    match locator.current_location().await? {
        Some(position) => Ok(LocationFix::Position(position)),
        None => {
            debug!("gps capability has no current fix");
            Ok(LocationFix::Unavailable)
        }
    }
}

/// Locator that always reports one configured position. Stands in for
/// real GPS hardware on desktop machines.
pub struct StaticLocator {
    position: GeoPosition,
}

impl StaticLocator {
    pub fn new(position: GeoPosition) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationCapability for StaticLocator {
    async fn current_location(&self) -> Result<Option<GeoPosition>> {
        Ok(Some(self.position.clone()))
    }
}
