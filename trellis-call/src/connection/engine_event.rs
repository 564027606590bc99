use crate::media::StreamId;
use std::sync::Arc;
use trellis_core::PeerId;
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::track::track_remote::TrackRemote;

/// Events emitted by native-connection callbacks and capture watchers,
/// consumed by the call session's event loop.
pub enum EngineEvent {
    /// A local ICE candidate surfaced and must be forwarded to the peer.
    CandidateGenerated(PeerId, RTCIceCandidateInit),
    /// A remote track arrived (initial media or a renegotiated stream).
    TrackReceived(PeerId, Arc<TrackRemote>),
    /// The native connection went Failed/Disconnected/Closed.
    ConnectionLost(PeerId),
    /// A local capture source stopped producing media on its own.
    SourceEnded(StreamId),
}
