pub mod connection;
pub mod error;
pub mod media;
pub mod session;
pub mod signaling;

pub use connection::{
    ConnectionRegistry, EngineEvent, PeerConnectionManager, PeerLink, RemoteTile, RtcConfig,
};
pub use error::{ConnectionError, MediaError, SignalError};
pub use media::{
    CapturedSource, LocalMediaController, LocalStream, MediaCapture, MediaChange, MediaToggles,
    StreamId, StreamSource,
};
pub use session::{CallCommand, CallHandle, CallManager, CallSession};
pub use signaling::SignalingBridge;
