use crate::utils::CaptureRequest;
use crate::{init_tracing, start_test_call};
use trellis_core::PeerId;

const SIGNAL_TIMEOUT_MS: u64 = 5000;

#[tokio::test]
async fn denied_capture_reverts_toggle_and_sends_nothing() {
    init_tracing();
    let call = start_test_call("alice");
    let bob = PeerId::from("bob");
    let carol = PeerId::from("carol");

    call.handle.join_peer(bob.clone()).await;
    call.bridge
        .wait_for_offers(&bob, 1, SIGNAL_TIMEOUT_MS)
        .await
        .expect("initial offer");

    call.capture.fail_next("permission denied");
    call.handle.toggle_video().await;

    // Joining carol afterwards acts as a barrier: the session processes
    // commands in order, so once her offer is out the toggle is settled.
    call.handle.join_peer(carol.clone()).await;
    call.bridge
        .wait_for_offers(&carol, 1, SIGNAL_TIMEOUT_MS)
        .await
        .expect("barrier offer");

    assert!(
        !call.handle.toggles().video_enabled,
        "failed toggle is left off and retryable"
    );
    assert_eq!(
        call.bridge.offers_for(&bob).await.len(),
        1,
        "no renegotiation went out for the failed acquisition"
    );
    assert_eq!(
        call.capture.calls(),
        vec![CaptureRequest::CameraMic {
            video: true,
            audio: false,
        }]
    );
}
