// libs/signaling-cell/src/models.rs
use std::fmt;

use serde::{Deserialize, Serialize};

/// Session-negotiation message exchanged between two peers.
///
/// The payload is opaque to the channel: session descriptions and candidate
/// data are transported verbatim in the wire field `sdp` and never
/// interpreted here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignalMessage {
    pub to: String,
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    #[serde(rename = "sdp")]
    pub payload: String,
}

impl SignalMessage {
    pub fn offer(to: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::new(to, SignalType::Offer, payload)
    }

    pub fn answer(to: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::new(to, SignalType::Answer, payload)
    }

    pub fn candidate(to: impl Into<String>, payload: impl Into<String>) -> Self {
        Self::new(to, SignalType::Candidate, payload)
    }

    fn new(to: impl Into<String>, signal_type: SignalType, payload: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            signal_type,
            payload: payload.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Offer,
    Answer,
    Candidate,
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalType::Offer => write!(f, "offer"),
            SignalType::Answer => write!(f, "answer"),
            SignalType::Candidate => write!(f, "candidate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Idle,
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloseReason {
    Local,
    Remote,
    TransportError(String),
}

/// Channel notifications: inbound messages and connection loss are distinct
/// events, never conflated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Message(SignalMessage),
    Closed(CloseReason),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_uses_type_and_sdp_fields() {
        let frame = serde_json::to_string(&SignalMessage::offer("33", "v=0")).unwrap();
        assert_eq!(frame, r#"{"to":"33","type":"offer","sdp":"v=0"}"#);
    }

    #[test]
    fn inbound_frames_round_trip() {
        let message: SignalMessage =
            serde_json::from_str(r#"{"to":"42","type":"answer","sdp":"v=0"}"#).unwrap();
        assert_eq!(message, SignalMessage::answer("42", "v=0"));
    }
}
