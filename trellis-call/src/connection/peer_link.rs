use crate::connection::engine_event::EngineEvent;
use crate::connection::rtc_config::RtcConfig;
use crate::error::{ConnectionError, SignalError};
use crate::media::LocalStream;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};
use trellis_core::{PeerId, SdpKind, SdpMessage};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::peer_connection::signaling_state::RTCSignalingState;
use webrtc::rtp_transceiver::rtp_sender::RTCRtpSender;
use webrtc::track::track_local::TrackLocal;

/// RTP senders carrying the local stream on this connection. Replacing the
/// stream swaps the tracks on these senders, it never re-adds them.
struct OutboundMedia {
    video: Arc<RTCRtpSender>,
    audio: Arc<RTCRtpSender>,
}

/// One direct connection to a remote participant: the native peer
/// connection, the queue of candidates that arrived before the remote
/// description, and the senders for the local stream.
pub struct PeerLink {
    pub peer_id: PeerId,
    pc: Arc<RTCPeerConnection>,
    pending_candidates: Mutex<Vec<RTCIceCandidateInit>>,
    outbound: Mutex<Option<OutboundMedia>>,
}

impl PeerLink {
    /// Build the native connection and wire its callbacks into the session
    /// event channel. Callbacks run on the media stack's own tasks and only
    /// post events; they never touch session state directly.
    pub async fn new(
        peer_id: PeerId,
        config: &RtcConfig,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Result<Self, ConnectionError> {
        let mut media_engine = MediaEngine::default();
        media_engine
            .register_default_codecs()
            .map_err(ConnectionError::Setup)?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)
            .map_err(ConnectionError::Setup)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let pc = Arc::new(
            api.new_peer_connection(config.to_rtc_configuration())
                .await
                .map_err(ConnectionError::Setup)?,
        );

        // Trickle ICE: every local candidate is forwarded the moment it
        // surfaces, no batching.
        let ice_tx = event_tx.clone();
        let ice_peer = peer_id.clone();
        pc.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            let peer = ice_peer.clone();
            Box::pin(async move {
                let Some(candidate) = c else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let _ = tx.send(EngineEvent::CandidateGenerated(peer, init)).await;
            })
        }));

        let track_tx = event_tx.clone();
        let track_peer = peer_id.clone();
        pc.on_track(Box::new(move |track, _receiver, _transceiver| {
            let tx = track_tx.clone();
            let peer = track_peer.clone();
            Box::pin(async move {
                debug!("Remote {:?} track arrived from {}", track.kind(), peer);
                let _ = tx.send(EngineEvent::TrackReceived(peer, track)).await;
            })
        }));

        let state_tx = event_tx;
        let state_peer = peer_id.clone();
        pc.on_peer_connection_state_change(Box::new(move |s: RTCPeerConnectionState| {
            let tx = state_tx.clone();
            let peer = state_peer.clone();
            Box::pin(async move {
                info!("Peer connection state for {}: {:?}", peer, s);
                match s {
                    RTCPeerConnectionState::Failed
                    | RTCPeerConnectionState::Disconnected
                    | RTCPeerConnectionState::Closed => {
                        let _ = tx.send(EngineEvent::ConnectionLost(peer)).await;
                    }
                    _ => {}
                }
            })
        }));

        Ok(Self {
            peer_id,
            pc,
            pending_candidates: Mutex::new(Vec::new()),
            outbound: Mutex::new(None),
        })
    }

    /// Attach the local stream, or swap it on the already-attached senders.
    /// Every link carries both tracks from the moment it is created.
    pub async fn attach_stream(&self, stream: &LocalStream) -> Result<(), ConnectionError> {
        let mut outbound = self.outbound.lock().await;

        match outbound.as_ref() {
            None => {
                let video = self
                    .pc
                    .add_track(Arc::clone(stream.video_track()) as Arc<dyn TrackLocal + Send + Sync>)
                    .await
                    .map_err(ConnectionError::Attach)?;
                let audio = self
                    .pc
                    .add_track(Arc::clone(stream.audio_track()) as Arc<dyn TrackLocal + Send + Sync>)
                    .await
                    .map_err(ConnectionError::Attach)?;
                *outbound = Some(OutboundMedia { video, audio });
            }
            Some(senders) => {
                senders
                    .video
                    .replace_track(Some(
                        Arc::clone(stream.video_track()) as Arc<dyn TrackLocal + Send + Sync>
                    ))
                    .await
                    .map_err(ConnectionError::Attach)?;
                senders
                    .audio
                    .replace_track(Some(
                        Arc::clone(stream.audio_track()) as Arc<dyn TrackLocal + Send + Sync>
                    ))
                    .await
                    .map_err(ConnectionError::Attach)?;
            }
        }

        Ok(())
    }

    /// Create an offer and install it as the local description. Used for
    /// the initial exchange and for every renegotiation.
    pub async fn create_offer(&self) -> Result<SdpMessage, ConnectionError> {
        let offer = self
            .pc
            .create_offer(None)
            .await
            .map_err(ConnectionError::Negotiation)?;
        self.pc
            .set_local_description(offer.clone())
            .await
            .map_err(ConnectionError::Negotiation)?;

        Ok(SdpMessage {
            kind: SdpKind::Offer,
            sdp: offer.sdp,
        })
    }

    /// Apply a remote description, flush any queued candidates, and for an
    /// offer produce the answer to send back.
    pub async fn apply_remote_description(
        &self,
        msg: SdpMessage,
    ) -> Result<Option<SdpMessage>, SignalError> {
        let kind = msg.kind;
        let desc = match kind {
            SdpKind::Offer => RTCSessionDescription::offer(msg.sdp),
            SdpKind::Answer => RTCSessionDescription::answer(msg.sdp),
        }
        .map_err(SignalError::Description)?;

        self.pc
            .set_remote_description(desc)
            .await
            .map_err(SignalError::Description)?;
        self.flush_pending_candidates().await;

        if kind != SdpKind::Offer {
            return Ok(None);
        }

        let answer = self
            .pc
            .create_answer(None)
            .await
            .map_err(SignalError::Description)?;
        self.pc
            .set_local_description(answer.clone())
            .await
            .map_err(SignalError::Description)?;

        Ok(Some(SdpMessage {
            kind: SdpKind::Answer,
            sdp: answer.sdp,
        }))
    }

    /// Apply a remote candidate, or queue it until a remote description
    /// exists. Mesh signaling routinely delivers candidates ahead of the
    /// SDP they belong to; they are never dropped.
    pub async fn add_remote_candidate(&self, init: RTCIceCandidateInit) -> Result<(), SignalError> {
        if self.pc.remote_description().await.is_none() {
            debug!("Queueing early ICE candidate for {}", self.peer_id);
            self.pending_candidates.lock().await.push(init);
            return Ok(());
        }

        self.pc
            .add_ice_candidate(init)
            .await
            .map_err(SignalError::Candidate)
    }

    async fn flush_pending_candidates(&self) {
        let pending: Vec<_> = self.pending_candidates.lock().await.drain(..).collect();
        if pending.is_empty() {
            return;
        }

        debug!(
            "Applying {} queued ICE candidates for {}",
            pending.len(),
            self.peer_id
        );
        for init in pending {
            if let Err(e) = self.pc.add_ice_candidate(init).await {
                warn!("Queued ICE candidate rejected for {}: {e}", self.peer_id);
            }
        }
    }

    pub fn signaling_state(&self) -> RTCSignalingState {
        self.pc.signaling_state()
    }

    pub async fn pending_candidate_count(&self) -> usize {
        self.pending_candidates.lock().await.len()
    }

    pub async fn has_outbound_media(&self) -> bool {
        self.outbound.lock().await.is_some()
    }

    pub async fn close(&self) {
        if let Err(e) = self.pc.close().await {
            warn!("Error closing connection to {}: {e}", self.peer_id);
        }
    }
}
