use crate::utils::CaptureRequest;
use crate::{init_tracing, start_test_call, wait_for_toggles};

#[tokio::test]
async fn screen_share_end_reacquires_camera_from_current_flags() {
    init_tracing();
    let call = start_test_call("alice");

    // Camera on first, then screen share displaces it.
    call.handle.toggle_video().await;
    wait_for_toggles(&call.handle, |t| t.video_enabled).await;

    call.handle.toggle_screen_share().await;
    let toggles = wait_for_toggles(&call.handle, |t| t.screen_sharing).await;
    assert!(toggles.video_enabled, "camera flag stays logically on");

    // The user stops sharing through the native control.
    call.capture.end_current_source();

    let toggles = wait_for_toggles(&call.handle, |t| !t.screen_sharing).await;
    assert!(
        toggles.video_enabled,
        "session reverts to the camera instead of going dark"
    );

    // Display capture in the middle, camera/mic re-acquired with the same
    // flags afterwards.
    assert_eq!(
        call.capture.calls(),
        vec![
            CaptureRequest::CameraMic {
                video: true,
                audio: false,
            },
            CaptureRequest::Display,
            CaptureRequest::CameraMic {
                video: true,
                audio: false,
            },
        ]
    );
}

#[tokio::test]
async fn screen_share_toggle_off_reverts_to_camera() {
    init_tracing();
    let call = start_test_call("alice");

    call.handle.toggle_screen_share().await;
    wait_for_toggles(&call.handle, |t| t.screen_sharing).await;

    call.handle.toggle_screen_share().await;
    let toggles = wait_for_toggles(&call.handle, |t| !t.screen_sharing).await;

    // Camera and mic were never wanted, so the placeholder takes over and
    // no camera request is made.
    assert!(!toggles.video_enabled && !toggles.audio_enabled);
    assert_eq!(call.capture.calls(), vec![CaptureRequest::Display]);
}
