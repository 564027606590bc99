use crate::connection::EngineEvent;
use crate::error::MediaError;
use crate::media::capture::MediaCapture;
use crate::media::local_stream::{LocalStream, StreamId, StreamSource};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// The three user-facing media switches. Logically independent, but only
/// one real source backs the stream at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaToggles {
    pub video_enabled: bool,
    pub audio_enabled: bool,
    pub screen_sharing: bool,
}

/// Outcome of a media operation: whether the active stream was replaced
/// (and every connection therefore needs the new stream pushed, followed
/// by a renegotiation round) or only the flags moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaChange {
    StreamReplaced,
    FlagsOnly,
}

/// Owns the toggle state and the single active local stream. Methods take
/// `&mut self`, so acquisitions are single-flight by construction; the
/// call session additionally serializes them behind its command queue, so
/// a toggle arriving mid-acquisition waits instead of racing.
pub struct LocalMediaController {
    toggles: MediaToggles,
    current: LocalStream,
    capture: Arc<dyn MediaCapture>,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl LocalMediaController {
    pub fn new(capture: Arc<dyn MediaCapture>, event_tx: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            toggles: MediaToggles::default(),
            current: LocalStream::placeholder(),
            capture,
            event_tx,
        }
    }

    pub fn toggles(&self) -> MediaToggles {
        self.toggles
    }

    pub fn current_stream(&self) -> &LocalStream {
        &self.current
    }

    pub async fn toggle_video(&mut self) -> Result<MediaChange, MediaError> {
        self.toggles.video_enabled = !self.toggles.video_enabled;
        if self.toggles.screen_sharing {
            // Screen capture stays current; the flag takes effect when the
            // share ends.
            debug!("Camera toggle while screen sharing, deferred");
            return Ok(MediaChange::FlagsOnly);
        }

        match self.acquire_camera_mic().await {
            Ok(change) => Ok(change),
            Err(e) => {
                self.toggles.video_enabled = !self.toggles.video_enabled;
                Err(e)
            }
        }
    }

    pub async fn toggle_audio(&mut self) -> Result<MediaChange, MediaError> {
        self.toggles.audio_enabled = !self.toggles.audio_enabled;
        if self.toggles.screen_sharing {
            debug!("Microphone toggle while screen sharing, deferred");
            return Ok(MediaChange::FlagsOnly);
        }

        match self.acquire_camera_mic().await {
            Ok(change) => Ok(change),
            Err(e) => {
                self.toggles.audio_enabled = !self.toggles.audio_enabled;
                Err(e)
            }
        }
    }

    pub async fn toggle_screen_share(&mut self) -> Result<MediaChange, MediaError> {
        if self.toggles.screen_sharing {
            self.toggles.screen_sharing = false;
            return Ok(self.revert_to_camera_mic().await);
        }

        self.toggles.screen_sharing = true;
        match self.acquire_screen().await {
            Ok(change) => Ok(change),
            Err(e) => {
                self.toggles.screen_sharing = false;
                Err(e)
            }
        }
    }

    /// React to a capture source dying on its own. Returns what changed,
    /// or `None` for a stale signal from an already-replaced stream.
    pub async fn handle_source_ended(&mut self, id: StreamId) -> Option<MediaChange> {
        if self.current.id() != id {
            debug!("Stale ended signal for a replaced stream, ignoring");
            return None;
        }

        match self.current.source() {
            StreamSource::Placeholder => None,
            StreamSource::CameraMic => {
                info!("Camera/mic source ended, falling back to placeholder");
                self.toggles.video_enabled = false;
                self.toggles.audio_enabled = false;
                self.replace_current(LocalStream::placeholder());
                Some(MediaChange::StreamReplaced)
            }
            StreamSource::Screen => {
                info!("Screen share ended by the user");
                self.toggles.screen_sharing = false;
                Some(self.revert_to_camera_mic().await)
            }
        }
    }

    /// Stop whatever is captured; used at call teardown.
    pub fn shutdown(&mut self) {
        self.current.stop();
    }

    /// (Re)build the camera/mic stream from the current flags. With both
    /// flags off the placeholder takes over; otherwise one combined
    /// capture request covers both kinds.
    async fn acquire_camera_mic(&mut self) -> Result<MediaChange, MediaError> {
        let MediaToggles {
            video_enabled,
            audio_enabled,
            ..
        } = self.toggles;

        if !video_enabled && !audio_enabled {
            self.replace_current(LocalStream::placeholder());
            return Ok(MediaChange::StreamReplaced);
        }

        let captured = self.capture.camera_mic(video_enabled, audio_enabled).await?;
        let (stream, ended_rx) = LocalStream::from_capture(StreamSource::CameraMic, captured);
        self.watch_source_end(stream.id(), ended_rx);
        self.replace_current(stream);
        Ok(MediaChange::StreamReplaced)
    }

    async fn acquire_screen(&mut self) -> Result<MediaChange, MediaError> {
        let captured = self.capture.display().await?;
        let (stream, ended_rx) = LocalStream::from_capture(StreamSource::Screen, captured);
        self.watch_source_end(stream.id(), ended_rx);
        self.replace_current(stream);
        Ok(MediaChange::StreamReplaced)
    }

    /// After screen share ends, re-acquire camera/mic from the current
    /// flags. On failure both flags are forced off and the placeholder
    /// takes over, so every connection keeps a valid stream.
    async fn revert_to_camera_mic(&mut self) -> MediaChange {
        match self.acquire_camera_mic().await {
            Ok(change) => change,
            Err(e) => {
                warn!("Camera/mic re-acquisition after screen share failed: {e}");
                self.toggles.video_enabled = false;
                self.toggles.audio_enabled = false;
                self.replace_current(LocalStream::placeholder());
                MediaChange::StreamReplaced
            }
        }
    }

    fn replace_current(&mut self, stream: LocalStream) {
        let mut old = std::mem::replace(&mut self.current, stream);
        old.stop();
        info!("Local stream is now {:?}", self.current.source());
    }

    /// Forward the backend's "ended" signal into the session loop, tagged
    /// with the stream generation so a stale signal is discarded there.
    fn watch_source_end(&self, id: StreamId, ended_rx: oneshot::Receiver<()>) {
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            if ended_rx.await.is_ok() {
                let _ = event_tx.send(EngineEvent::SourceEnded(id)).await;
            }
        });
    }
}
