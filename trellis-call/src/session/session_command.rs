use trellis_core::{PeerId, SignalPayload};

/// Commands entering the call session from the UI and from the signaling
/// transport.
#[derive(Debug)]
pub enum CallCommand {
    /// A participant joined: connect and send them an offer.
    JoinPeer { peer_id: PeerId },

    /// A participant left: tear down their connection only.
    LeavePeer { peer_id: PeerId },

    ToggleVideo,
    ToggleAudio,
    ToggleScreenShare,

    /// A relayed payload from another participant.
    Signal { from: PeerId, payload: SignalPayload },

    /// End the call: close every connection and stop local media.
    HangUp,
}
