use thiserror::Error;
use trellis_core::PeerId;
use webrtc::error::Error as RtcError;

/// A capture request was denied or the device is unavailable. The toggle
/// that initiated the request is reverted; existing connections are
/// untouched.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media capture failed: {0}")]
    Capture(String),
}

/// A signal that cannot be applied as delivered. The signal is dropped;
/// the connection stays up and a later valid signal can recover it.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("malformed signal payload: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("description rejected in current negotiation state: {0}")]
    Description(#[source] RtcError),

    #[error("ice candidate rejected: {0}")]
    Candidate(#[source] RtcError),
}

/// A native-connection failure, isolated to the one peer it occurred on.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("no connection registered for peer {peer}")]
    NotRegistered { peer: PeerId },

    #[error("failed to build peer connection: {0}")]
    Setup(#[source] RtcError),

    #[error("failed to attach local stream: {0}")]
    Attach(#[source] RtcError),

    #[error("negotiation failed: {0}")]
    Negotiation(#[source] RtcError),
}
