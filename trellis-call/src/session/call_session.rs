use crate::connection::{EngineEvent, PeerConnectionManager, RtcConfig};
use crate::error::MediaError;
use crate::media::{LocalMediaController, MediaCapture, MediaChange, MediaToggles};
use crate::session::renegotiation::renegotiate_all;
use crate::session::session_command::CallCommand;
use crate::session::session_handle::CallHandle;
use crate::signaling::SignalingBridge;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};
use trellis_core::PeerId;

/// One call session: the manager and the media controller, driven by a
/// single event loop. Everything call-scoped lives here and is dropped
/// when the session ends; nothing is process-global.
pub struct CallSession {
    manager: PeerConnectionManager,
    media: LocalMediaController,
    command_rx: mpsc::Receiver<CallCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    toggles_tx: watch::Sender<MediaToggles>,
}

impl CallSession {
    /// Build a session and the handle the UI and signaling transport drive
    /// it with.
    pub fn new(
        local_id: PeerId,
        capture: Arc<dyn MediaCapture>,
        signaling: Arc<dyn SignalingBridge>,
        config: RtcConfig,
    ) -> (Self, CallHandle) {
        let (command_tx, command_rx) = mpsc::channel(64);
        let (event_tx, event_rx) = mpsc::channel(256);
        let (toggles_tx, toggles_rx) = watch::channel(MediaToggles::default());

        let manager = PeerConnectionManager::new(local_id, config, signaling, event_tx.clone());
        let media = LocalMediaController::new(capture, event_tx);
        let handle = CallHandle::new(command_tx, manager.tiles(), toggles_rx);

        let session = Self {
            manager,
            media,
            command_rx,
            event_rx,
            toggles_tx,
        };
        (session, handle)
    }

    /// Run the session to completion. One command or event is processed to
    /// the end before the next, so a suspended acquisition or negotiation
    /// cannot interleave with the next toggle or signal.
    pub async fn run(mut self) {
        info!("Call session started as {}", self.manager.local_id());

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if self.handle_command(cmd).await {
                                break;
                            }
                        }
                        None => {
                            info!("Command channel closed, shutting down call");
                            break;
                        }
                    }
                }

                evt = self.event_rx.recv() => {
                    match evt {
                        Some(evt) => self.handle_engine_event(evt).await,
                        None => {
                            warn!("Engine event channel closed unexpectedly");
                            break;
                        }
                    }
                }
            }
        }

        self.teardown().await;
        info!("Call session finished");
    }

    /// Returns true when the session should stop.
    async fn handle_command(&mut self, cmd: CallCommand) -> bool {
        match cmd {
            CallCommand::JoinPeer { peer_id } => {
                if let Err(e) = self
                    .manager
                    .create_connection(peer_id.clone(), self.media.current_stream())
                    .await
                {
                    error!("Failed to connect to {}: {e}", peer_id);
                    return false;
                }
                if let Err(e) = self.manager.create_offer(&peer_id).await {
                    warn!("Initial offer to {} failed: {e}", peer_id);
                }
            }

            CallCommand::LeavePeer { peer_id } => {
                self.manager.destroy_connection(&peer_id).await;
            }

            CallCommand::ToggleVideo => {
                let result = self.media.toggle_video().await;
                self.after_media_change(result).await;
            }

            CallCommand::ToggleAudio => {
                let result = self.media.toggle_audio().await;
                self.after_media_change(result).await;
            }

            CallCommand::ToggleScreenShare => {
                let result = self.media.toggle_screen_share().await;
                self.after_media_change(result).await;
            }

            CallCommand::Signal { from, payload } => {
                self.manager
                    .handle_signal(&from, payload, self.media.current_stream())
                    .await;
            }

            CallCommand::HangUp => return true,
        }

        false
    }

    async fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::CandidateGenerated(peer_id, init) => {
                self.manager.candidate_generated(peer_id, init).await;
            }

            EngineEvent::TrackReceived(peer_id, track) => {
                self.manager.track_received(peer_id, track);
            }

            EngineEvent::ConnectionLost(peer_id) => {
                // Isolated to this peer; everyone else keeps talking. The
                // tile disappearing is the UI's "left call" signal.
                warn!("Connection lost for {}", peer_id);
                self.manager.destroy_connection(&peer_id).await;
            }

            EngineEvent::SourceEnded(stream_id) => {
                if let Some(change) = self.media.handle_source_ended(stream_id).await {
                    self.after_media_change(Ok::<_, MediaError>(change)).await;
                }
            }
        }
    }

    /// Push the (possibly new) stream into every connection and re-offer
    /// to every peer present right now.
    async fn after_media_change(&mut self, result: Result<MediaChange, MediaError>) {
        match result {
            Ok(MediaChange::StreamReplaced) => {
                self.publish_toggles();
                self.manager
                    .apply_local_stream(self.media.current_stream())
                    .await;
                renegotiate_all(&self.manager).await;
            }
            Ok(MediaChange::FlagsOnly) => self.publish_toggles(),
            Err(e) => {
                // The controller already reverted the toggle; nothing was
                // pushed to any connection.
                warn!("Media acquisition failed: {e}");
                self.publish_toggles();
            }
        }
    }

    fn publish_toggles(&self) {
        let _ = self.toggles_tx.send(self.media.toggles());
    }

    async fn teardown(&mut self) {
        self.manager.destroy_all().await;
        self.media.shutdown();
    }
}
