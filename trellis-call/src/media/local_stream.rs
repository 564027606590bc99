use crate::media::capture::CapturedSource;
use std::sync::Arc;
use tokio::sync::oneshot;
use uuid::Uuid;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

/// Generation id of one local stream. An "ended" notification carries the
/// generation it belongs to, so a signal from an already-replaced stream
/// can be discarded instead of clobbering newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(Uuid);

impl StreamId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// What the current local stream is backed by. Only one real source is
/// current at a time; screen capture displaces the camera/mic composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource {
    Placeholder,
    CameraMic,
    Screen,
}

/// The single active local stream. It always carries exactly one audio and
/// one video track; a slot with no real source holds a synthesized
/// placeholder track that stays silent/black, so a connection's media slot
/// is never empty.
pub struct LocalStream {
    id: StreamId,
    source: StreamSource,
    video: Arc<TrackLocalStaticSample>,
    audio: Arc<TrackLocalStaticSample>,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl LocalStream {
    /// Synthesized stand-in used whenever no real source is active.
    pub fn placeholder() -> Self {
        let id = StreamId::new();
        Self {
            id,
            source: StreamSource::Placeholder,
            video: synth_video_track(id),
            audio: synth_audio_track(id),
            stop_tx: None,
        }
    }

    /// Wrap a captured source, filling missing kinds with placeholder
    /// tracks. Returns the stream and the source's "ended" signal for the
    /// caller to watch.
    pub(crate) fn from_capture(
        source: StreamSource,
        captured: CapturedSource,
    ) -> (Self, oneshot::Receiver<()>) {
        let id = StreamId::new();
        let CapturedSource {
            video,
            audio,
            ended_rx,
            stop_tx,
        } = captured;

        let stream = Self {
            id,
            source,
            video: video.unwrap_or_else(|| synth_video_track(id)),
            audio: audio.unwrap_or_else(|| synth_audio_track(id)),
            stop_tx: Some(stop_tx),
        };
        (stream, ended_rx)
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn source(&self) -> StreamSource {
        self.source
    }

    pub fn video_track(&self) -> &Arc<TrackLocalStaticSample> {
        &self.video
    }

    pub fn audio_track(&self) -> &Arc<TrackLocalStaticSample> {
        &self.audio
    }

    /// Tell the backend to stop capturing and release the device. Safe to
    /// call more than once; the placeholder has nothing to stop.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
    }
}

impl Drop for LocalStream {
    fn drop(&mut self) {
        self.stop();
    }
}

fn synth_video_track(id: StreamId) -> Arc<TrackLocalStaticSample> {
    Arc::new(TrackLocalStaticSample::new(
        RTCRtpCodecCapability {
            mime_type: MIME_TYPE_VP8.to_owned(),
            ..Default::default()
        },
        format!("video-{}", id.0),
        format!("stream-{}", id.0),
    ))
}

fn synth_audio_track(id: StreamId) -> Arc<TrackLocalStaticSample> {
    Arc::new(TrackLocalStaticSample::new(
        RTCRtpCodecCapability {
            mime_type: MIME_TYPE_OPUS.to_owned(),
            ..Default::default()
        },
        format!("audio-{}", id.0),
        format!("stream-{}", id.0),
    ))
}
