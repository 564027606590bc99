use crate::error::MediaError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::oneshot;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Tracks handed back by a capture backend, plus the source's lifecycle
/// signals. A missing track means the source does not produce that kind
/// (e.g. audio-only capture); the engine fills the gap with a placeholder.
pub struct CapturedSource {
    pub video: Option<Arc<TrackLocalStaticSample>>,
    pub audio: Option<Arc<TrackLocalStaticSample>>,
    /// Fires when the device stops producing media on its own — unplugged,
    /// or the user stopped sharing through the native control.
    pub ended_rx: oneshot::Receiver<()>,
    /// Signaled (or dropped) when the engine is done with the source and
    /// the backend should release the device.
    pub stop_tx: oneshot::Sender<()>,
}

impl CapturedSource {
    /// Wire up a new source. The backend keeps the returned `ended` sender
    /// to report device loss and the `stop` receiver to learn when to
    /// release the device.
    pub fn new(
        video: Option<Arc<TrackLocalStaticSample>>,
        audio: Option<Arc<TrackLocalStaticSample>>,
    ) -> (Self, oneshot::Sender<()>, oneshot::Receiver<()>) {
        let (ended_tx, ended_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = oneshot::channel();

        let source = Self {
            video,
            audio,
            ended_rx,
            stop_tx,
        };
        (source, ended_tx, stop_rx)
    }
}

/// Capture-device collaborator. Implementations own the device I/O and
/// feed samples into the tracks they hand back; the engine only manages
/// the tracks' lifecycle.
#[async_trait]
pub trait MediaCapture: Send + Sync {
    /// One combined camera+microphone request. At least one flag is set;
    /// the two kinds are never requested through separate concurrent
    /// calls, because two captures racing on the same device replace
    /// tracks in nondeterministic order.
    async fn camera_mic(
        &self,
        want_video: bool,
        want_audio: bool,
    ) -> Result<CapturedSource, MediaError>;

    /// Display capture for screen sharing.
    async fn display(&self) -> Result<CapturedSource, MediaError>;
}
