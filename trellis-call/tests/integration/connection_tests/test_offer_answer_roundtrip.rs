use crate::init_tracing;
use crate::utils::{RemotePeer, manager_rig};
use trellis_core::{PeerId, SdpKind, SdpMessage, SignalPayload};
use webrtc::peer_connection::signaling_state::RTCSignalingState;

#[tokio::test]
async fn remote_answer_returns_negotiation_to_stable() {
    init_tracing();
    let rig = manager_rig("a");
    let bob = PeerId::from("b");

    rig.manager
        .create_connection(bob.clone(), &rig.stream)
        .await
        .expect("create connection");
    rig.manager.create_offer(&bob).await.expect("create offer");

    let offers = rig.bridge.offers_for(&bob).await;
    assert_eq!(offers.len(), 1, "one offer goes out");

    let remote = RemotePeer::new().await.expect("remote peer");
    let answer_sdp = remote.answer(&offers[0].sdp).await.expect("remote answers");

    rig.manager
        .handle_signal(
            &bob,
            SignalPayload::Sdp(SdpMessage {
                kind: SdpKind::Answer,
                sdp: answer_sdp,
            }),
            &rig.stream,
        )
        .await;

    let link = rig.manager.registry().get(&bob).expect("link survives");
    assert_eq!(link.signaling_state(), RTCSignalingState::Stable);

    remote.close().await.expect("close remote");
}

#[tokio::test]
async fn incoming_offer_from_unknown_peer_is_answered() {
    init_tracing();
    let rig = manager_rig("a");
    let carol = PeerId::from("carol");

    let remote = RemotePeer::new().await.expect("remote peer");
    let offer = remote.offer().await.expect("remote offer");

    rig.manager
        .handle_signal(&carol, SignalPayload::Sdp(offer), &rig.stream)
        .await;

    assert!(
        rig.manager.registry().contains(&carol),
        "connection auto-created for the unknown sender"
    );

    let answers = rig
        .bridge
        .wait_for_answers(&carol, 1, 5000)
        .await
        .expect("answer sent back over the bridge");
    assert_eq!(answers[0].kind, SdpKind::Answer);

    let link = rig.manager.registry().get(&carol).expect("link registered");
    assert_eq!(link.signaling_state(), RTCSignalingState::Stable);

    remote.close().await.expect("close remote");
}

#[tokio::test]
async fn bogus_answer_is_dropped_without_teardown() {
    init_tracing();
    let rig = manager_rig("a");
    let bob = PeerId::from("b");

    rig.manager
        .create_connection(bob.clone(), &rig.stream)
        .await
        .expect("create connection");

    // An answer with no offer outstanding is rejected by the native stack;
    // the signal is dropped and the connection survives.
    rig.manager
        .handle_signal(
            &bob,
            SignalPayload::Sdp(SdpMessage {
                kind: SdpKind::Answer,
                sdp: "not an sdp".to_owned(),
            }),
            &rig.stream,
        )
        .await;

    assert!(rig.manager.registry().contains(&bob));
    assert_eq!(
        rig.manager
            .registry()
            .get(&bob)
            .expect("link kept")
            .signaling_state(),
        RTCSignalingState::Stable
    );
}
