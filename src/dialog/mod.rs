// Dialogue layer
//
// The negotiation core: drives one discovery attempt over an interaction
// channel, from request to a configured device or a clean stop.

pub mod delegate;
pub mod discovery;
mod error;

pub use delegate::ChannelDelegate;
pub use discovery::DiscoveryNegotiator;
pub use error::{DialogError, DialogResult};
