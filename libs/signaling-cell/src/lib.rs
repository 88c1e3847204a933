pub mod error;
pub mod models;
pub mod services;

pub use error::SignalingError;
pub use models::*;
pub use services::channel::ChannelEventReceiver;
pub use services::SignalingChannel;
