use crate::init_tracing;
use crate::utils::{RemotePeer, manager_rig};
use trellis_core::{PeerId, SignalPayload};

/// Timeout for ICE gathering on the loopback remote (ms).
const ICE_GATHERING_TIMEOUT_MS: u64 = 3000;

#[tokio::test]
async fn early_candidate_is_queued_then_flushed() {
    init_tracing();
    let rig = manager_rig("a");
    let y = PeerId::from("y");

    let remote = RemotePeer::new().await.expect("remote peer");
    let offer = remote.offer().await.expect("remote offer");
    let candidates = remote
        .gathered_candidates(ICE_GATHERING_TIMEOUT_MS)
        .await
        .expect("gather candidates");
    assert!(!candidates.is_empty(), "loopback host candidates expected");

    // The candidate outruns the SDP it belongs to. No error, no drop: it
    // waits on the link's pending queue.
    rig.manager
        .handle_signal(&y, SignalPayload::Ice(candidates[0].clone()), &rig.stream)
        .await;

    let link = rig.manager.registry().get(&y).expect("link auto-created");
    assert_eq!(link.pending_candidate_count().await, 1);

    // The offer lands afterwards; the queue is flushed into the native
    // connection right after the remote description is applied.
    rig.manager
        .handle_signal(&y, SignalPayload::Sdp(offer), &rig.stream)
        .await;

    let link = rig.manager.registry().get(&y).expect("link kept");
    assert_eq!(link.pending_candidate_count().await, 0);
    assert_eq!(
        rig.bridge.answers_for(&y).await.len(),
        1,
        "the offer was answered normally"
    );

    remote.close().await.expect("close remote");
}
