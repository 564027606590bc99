use crate::connection::RemoteTile;
use crate::error::SignalError;
use crate::media::MediaToggles;
use crate::session::session_command::CallCommand;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::warn;
use trellis_core::{PeerId, SignalPayload};

/// UI-facing handle to a running call session: imperative operations plus
/// read-only views of the toggle state and the remote tiles. Cheap to
/// clone; the session ends when it is told to hang up, not when handles
/// drop (the transport usually keeps one).
#[derive(Clone)]
pub struct CallHandle {
    command_tx: mpsc::Sender<CallCommand>,
    tiles: Arc<DashMap<PeerId, RemoteTile>>,
    toggles_rx: watch::Receiver<MediaToggles>,
}

impl CallHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<CallCommand>,
        tiles: Arc<DashMap<PeerId, RemoteTile>>,
        toggles_rx: watch::Receiver<MediaToggles>,
    ) -> Self {
        Self {
            command_tx,
            tiles,
            toggles_rx,
        }
    }

    pub async fn join_peer(&self, peer_id: PeerId) {
        self.send(CallCommand::JoinPeer { peer_id }).await;
    }

    pub async fn leave_peer(&self, peer_id: PeerId) {
        self.send(CallCommand::LeavePeer { peer_id }).await;
    }

    pub async fn toggle_video(&self) {
        self.send(CallCommand::ToggleVideo).await;
    }

    pub async fn toggle_audio(&self) {
        self.send(CallCommand::ToggleAudio).await;
    }

    pub async fn toggle_screen_share(&self) {
        self.send(CallCommand::ToggleScreenShare).await;
    }

    pub async fn hang_up(&self) {
        self.send(CallCommand::HangUp).await;
    }

    /// Feed one raw payload from the signaling transport. Malformed JSON
    /// is rejected here and never reaches the session.
    pub async fn deliver_signal(&self, from: PeerId, raw: &str) -> Result<(), SignalError> {
        let payload: SignalPayload = serde_json::from_str(raw)?;
        self.send(CallCommand::Signal { from, payload }).await;
        Ok(())
    }

    /// Typed variant for transports that already decoded the payload.
    pub async fn signal(&self, from: PeerId, payload: SignalPayload) {
        self.send(CallCommand::Signal { from, payload }).await;
    }

    /// Current media toggle state.
    pub fn toggles(&self) -> MediaToggles {
        *self.toggles_rx.borrow()
    }

    /// Watch toggle-state changes (one receiver per subscriber).
    pub fn toggles_watch(&self) -> watch::Receiver<MediaToggles> {
        self.toggles_rx.clone()
    }

    /// Remote tiles currently known, one per participant with media.
    pub fn tiles(&self) -> Vec<RemoteTile> {
        self.tiles.iter().map(|entry| entry.value().clone()).collect()
    }

    pub fn tile(&self, peer_id: &PeerId) -> Option<RemoteTile> {
        self.tiles.get(peer_id).map(|entry| entry.value().clone())
    }

    async fn send(&self, cmd: CallCommand) {
        if self.command_tx.send(cmd).await.is_err() {
            warn!("Call session is gone, dropping command");
        }
    }
}
