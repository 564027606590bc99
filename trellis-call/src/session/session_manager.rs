use crate::connection::RtcConfig;
use crate::media::MediaCapture;
use crate::session::call_session::CallSession;
use crate::session::session_handle::CallHandle;
use crate::signaling::SignalingBridge;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;
use trellis_core::{CallId, PeerId};

/// Tracks every live call session in the process and spawns new ones.
/// Each session owns its registry and media state, so concurrent calls
/// never share anything but this table.
#[derive(Clone)]
pub struct CallManager {
    calls: Arc<DashMap<CallId, CallHandle>>,
    capture_factory: Arc<dyn Fn() -> Arc<dyn MediaCapture> + Send + Sync>,
    config: RtcConfig,
}

impl CallManager {
    pub fn new<F>(capture_factory: F, config: RtcConfig) -> Self
    where
        F: Fn() -> Arc<dyn MediaCapture> + Send + Sync + 'static,
    {
        Self {
            calls: Arc::new(DashMap::new()),
            capture_factory: Arc::new(capture_factory),
            config,
        }
    }

    /// Spawn the session for a call and return its handle. Joining a call
    /// that is already running returns the existing handle.
    pub fn join_call(
        &self,
        call_id: CallId,
        local_id: PeerId,
        signaling: Arc<dyn SignalingBridge>,
    ) -> CallHandle {
        if let Some(handle) = self.calls.get(&call_id) {
            return handle.clone();
        }

        info!("Starting call session {}", call_id);
        let capture = (self.capture_factory)();
        let (session, handle) = CallSession::new(local_id, capture, signaling, self.config.clone());
        tokio::spawn(session.run());

        self.calls.insert(call_id, handle.clone());
        handle
    }

    /// End a call and forget it.
    pub async fn leave_call(&self, call_id: &CallId) {
        let Some((_, handle)) = self.calls.remove(call_id) else {
            return;
        };
        handle.hang_up().await;
    }

    pub fn get(&self, call_id: &CallId) -> Option<CallHandle> {
        self.calls.get(call_id).map(|entry| entry.value().clone())
    }
}
