mod call;
mod peer;
mod signaling;

pub use call::CallId;
pub use peer::PeerId;
pub use signaling::{IceCandidateMsg, IceServerConfig, SdpKind, SdpMessage, SignalPayload};
