use std::sync::Arc;
use trellis_core::PeerId;
use webrtc::track::track_remote::TrackRemote;

/// Remote media currently received from one participant, as rendered by
/// the UI. Track slots are replaced in place when the peer renegotiates a
/// new stream.
#[derive(Clone)]
pub struct RemoteTile {
    pub peer_id: PeerId,
    pub video: Option<Arc<TrackRemote>>,
    pub audio: Option<Arc<TrackRemote>>,
}

impl RemoteTile {
    pub fn new(peer_id: PeerId) -> Self {
        Self {
            peer_id,
            video: None,
            audio: None,
        }
    }
}
