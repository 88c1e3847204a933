pub mod channel;

pub use channel::SignalingChannel;
