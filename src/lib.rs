// Wren - conversational device onboarding for the local network
// Library exports

pub mod channel;
pub mod config;
pub mod configure;
pub mod dialog;
pub mod discovery;
pub mod platform;
pub mod session;
pub mod stats;
