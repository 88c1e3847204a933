use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignalingError {
    #[error("Signaling channel is not open")]
    ChannelClosed,

    #[error("Network error: {0}")]
    Network(String),
}
