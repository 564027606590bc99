use crate::connection::PeerConnectionManager;
use futures::future::join_all;
use tracing::{debug, warn};

/// Re-offer to every peer present in the registry right now (a key-set
/// snapshot; peers joining afterwards negotiate from scratch anyway).
/// Replacing tracks on an established connection does not inform the
/// remote side by itself — the offer/answer round trip is mandatory after
/// every media change. Each peer's round trip is independent: a failure is
/// logged and neither blocks nor retries the others.
pub async fn renegotiate_all(manager: &PeerConnectionManager) {
    let peers = manager.registry().peer_ids();
    if peers.is_empty() {
        return;
    }
    debug!("Renegotiating with {} peer(s)", peers.len());

    join_all(peers.into_iter().map(|peer_id| async move {
        if let Err(e) = manager.create_offer(&peer_id).await {
            warn!("Renegotiation with {} failed: {e}", peer_id);
        }
    }))
    .await;
}
