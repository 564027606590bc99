use async_trait::async_trait;
use trellis_core::{PeerId, SignalPayload};

/// Outbound half of the signaling transport. Implemented by the external
/// socket layer that relays payloads between call participants.
#[async_trait]
pub trait SignalingBridge: Send + Sync {
    /// Relay one payload to a peer. Delivery failures are the transport's
    /// concern; the engine never retries.
    async fn send(&self, to: PeerId, payload: SignalPayload);
}
