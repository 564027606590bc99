mod mock_signaling;

pub use mock_capture::{CaptureRequest, MockCapture};
pub use mock_signaling::MockSignalingBridge;
pub use remote_peer::RemotePeer;

use std::sync::Arc;
use tokio::sync::mpsc;
use trellis_call::{EngineEvent, LocalStream, PeerConnectionManager, RtcConfig, SignalingBridge};
use trellis_core::PeerId;

/// Manager wired to a mock bridge, without a session loop: connection
/// tests drive it directly and inspect the registry.
pub struct ManagerRig {
    pub manager: PeerConnectionManager,
    pub bridge: Arc<MockSignalingBridge>,
    pub stream: LocalStream,
    /// Kept alive so callback events always have somewhere to go.
    pub event_rx: mpsc::Receiver<EngineEvent>,
}

pub fn manager_rig(local_id: &str) -> ManagerRig {
    let bridge = Arc::new(MockSignalingBridge::new());
    let (event_tx, event_rx) = mpsc::channel(64);
    let manager = PeerConnectionManager::new(
        PeerId::from(local_id),
        RtcConfig::no_ice_servers(),
        Arc::clone(&bridge) as Arc<dyn SignalingBridge>,
        event_tx,
    );

    ManagerRig {
        manager,
        bridge,
        stream: LocalStream::placeholder(),
        event_rx,
    }
}
