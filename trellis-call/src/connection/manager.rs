use crate::connection::engine_event::EngineEvent;
use crate::connection::peer_link::PeerLink;
use crate::connection::registry::ConnectionRegistry;
use crate::connection::remote_tile::RemoteTile;
use crate::connection::rtc_config::RtcConfig;
use crate::error::ConnectionError;
use crate::media::LocalStream;
use crate::signaling::SignalingBridge;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use trellis_core::{IceCandidateMsg, PeerId, SignalPayload};
use webrtc::ice_transport::ice_candidate::RTCIceCandidateInit;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::track::track_remote::TrackRemote;

/// Creates and destroys peer connections, routes signals to them, and
/// keeps the per-peer tiles the UI renders. Every failure is contained to
/// the one peer it occurred on; there is no call-wide abort path.
pub struct PeerConnectionManager {
    local_id: PeerId,
    config: RtcConfig,
    registry: ConnectionRegistry,
    tiles: Arc<DashMap<PeerId, RemoteTile>>,
    signaling: Arc<dyn SignalingBridge>,
    event_tx: mpsc::Sender<EngineEvent>,
}

impl PeerConnectionManager {
    pub fn new(
        local_id: PeerId,
        config: RtcConfig,
        signaling: Arc<dyn SignalingBridge>,
        event_tx: mpsc::Sender<EngineEvent>,
    ) -> Self {
        Self {
            local_id,
            config,
            registry: ConnectionRegistry::new(),
            tiles: Arc::new(DashMap::new()),
            signaling,
            event_tx,
        }
    }

    pub fn local_id(&self) -> &PeerId {
        &self.local_id
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    pub fn tiles(&self) -> Arc<DashMap<PeerId, RemoteTile>> {
        Arc::clone(&self.tiles)
    }

    /// Create the connection for a newly joined peer and attach the current
    /// local stream before returning, so the link never exists without
    /// media. A duplicate request is a logged no-op.
    pub async fn create_connection(
        &self,
        peer_id: PeerId,
        local_stream: &LocalStream,
    ) -> Result<(), ConnectionError> {
        if peer_id == self.local_id {
            warn!("Refusing to create a connection to ourselves");
            return Ok(());
        }
        if self.registry.contains(&peer_id) {
            warn!("Connection for {} already exists, ignoring duplicate create", peer_id);
            return Ok(());
        }

        let link = Arc::new(PeerLink::new(peer_id.clone(), &self.config, self.event_tx.clone()).await?);
        link.attach_stream(local_stream).await?;
        self.registry.insert(link);

        info!("Created connection for {}", peer_id);
        Ok(())
    }

    /// Route one inbound signal. Echoes of our own messages are dropped; a
    /// signal from a peer we have not connected yet creates the connection
    /// first (offers can land before the join is known locally). Signals
    /// that cannot be applied are dropped and logged, never fatal.
    pub async fn handle_signal(
        &self,
        from: &PeerId,
        payload: SignalPayload,
        local_stream: &LocalStream,
    ) {
        if *from == self.local_id {
            debug!("Ignoring signaling echo from ourselves");
            return;
        }

        if !self.registry.contains(from) {
            if let Err(e) = self.create_connection(from.clone(), local_stream).await {
                error!("Failed to create connection for {}: {e}", from);
                return;
            }
        }
        let Some(link) = self.registry.get(from) else {
            return;
        };

        match payload {
            SignalPayload::Sdp(desc) => match link.apply_remote_description(desc).await {
                Ok(Some(answer)) => {
                    self.signaling.send(from.clone(), SignalPayload::Sdp(answer)).await;
                }
                Ok(None) => {}
                Err(e) => warn!("Dropping SDP from {}: {e}", from),
            },
            SignalPayload::Ice(msg) => {
                let init = RTCIceCandidateInit {
                    candidate: msg.candidate,
                    sdp_mid: msg.sdp_mid,
                    sdp_mline_index: msg.sdp_m_line_index,
                    username_fragment: msg.username_fragment,
                };
                if let Err(e) = link.add_remote_candidate(init).await {
                    warn!("Dropping ICE candidate from {}: {e}", from);
                }
            }
        }
    }

    /// Offer (or re-offer) to one peer.
    pub async fn create_offer(&self, peer_id: &PeerId) -> Result<(), ConnectionError> {
        let Some(link) = self.registry.get(peer_id) else {
            return Err(ConnectionError::NotRegistered {
                peer: peer_id.clone(),
            });
        };

        let offer = link.create_offer().await?;
        self.signaling.send(peer_id.clone(), SignalPayload::Sdp(offer)).await;
        Ok(())
    }

    /// Close one peer's connection and drop its registry entry and tile.
    pub async fn destroy_connection(&self, peer_id: &PeerId) {
        self.tiles.remove(peer_id);

        let Some(link) = self.registry.remove(peer_id) else {
            return;
        };
        link.close().await;
        info!("Destroyed connection for {}", peer_id);
    }

    /// Push the current local stream into every registered connection.
    /// Key-set snapshot first; a peer leaving mid-push is skipped.
    pub async fn apply_local_stream(&self, stream: &LocalStream) {
        for peer_id in self.registry.peer_ids() {
            let Some(link) = self.registry.get(&peer_id) else {
                continue;
            };
            if let Err(e) = link.attach_stream(stream).await {
                warn!("Failed to swap local stream for {}: {e}", peer_id);
            }
        }
    }

    /// Record an arrived remote track on the peer's tile, replacing the
    /// same-kind slot when the peer renegotiated a new stream.
    pub fn track_received(&self, peer_id: PeerId, track: Arc<TrackRemote>) {
        if !self.registry.contains(&peer_id) {
            debug!("Track from unregistered peer {}, ignoring", peer_id);
            return;
        }

        let mut tile = self
            .tiles
            .entry(peer_id.clone())
            .or_insert_with(|| RemoteTile::new(peer_id));
        match track.kind() {
            RTPCodecType::Video => tile.video = Some(track),
            _ => tile.audio = Some(track),
        }
    }

    /// Forward one locally gathered candidate to its peer.
    pub async fn candidate_generated(&self, peer_id: PeerId, init: RTCIceCandidateInit) {
        let msg = IceCandidateMsg {
            candidate: init.candidate,
            sdp_mid: init.sdp_mid,
            sdp_m_line_index: init.sdp_mline_index,
            username_fragment: init.username_fragment,
        };
        self.signaling.send(peer_id, SignalPayload::Ice(msg)).await;
    }

    /// Tear down every connection; used when the call ends.
    pub async fn destroy_all(&self) {
        for peer_id in self.registry.peer_ids() {
            self.destroy_connection(&peer_id).await;
        }
    }
}
