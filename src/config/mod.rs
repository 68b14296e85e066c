// Configuration module
// Public interface for configuration loading

mod loader;
mod settings;

pub use loader::{config_path, load_settings, load_settings_from};
pub use settings::{DiscoverySettings, SessionSettings, Settings};
