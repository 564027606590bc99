use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use trellis_call::SignalingBridge;
use trellis_core::{IceCandidateMsg, PeerId, SdpKind, SdpMessage, SignalPayload};

/// Mock SignalingBridge that records every outbound payload for
/// verification.
#[derive(Clone, Default)]
pub struct MockSignalingBridge {
    sent: Arc<Mutex<Vec<(PeerId, SignalPayload)>>>,
}

impl MockSignalingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything sent so far, in order.
    pub async fn sent(&self) -> Vec<(PeerId, SignalPayload)> {
        self.sent.lock().await.clone()
    }

    pub async fn offers_for(&self, peer: &PeerId) -> Vec<SdpMessage> {
        self.sdp_for(peer, SdpKind::Offer).await
    }

    pub async fn answers_for(&self, peer: &PeerId) -> Vec<SdpMessage> {
        self.sdp_for(peer, SdpKind::Answer).await
    }

    pub async fn candidates_for(&self, peer: &PeerId) -> Vec<IceCandidateMsg> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|(to, payload)| match payload {
                SignalPayload::Ice(msg) if to == peer => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    /// Poll until at least `count` offers for `peer` have been sent.
    pub async fn wait_for_offers(
        &self,
        peer: &PeerId,
        count: usize,
        timeout_ms: u64,
    ) -> Result<Vec<SdpMessage>> {
        self.wait_for_sdp(peer, SdpKind::Offer, count, timeout_ms).await
    }

    /// Poll until at least `count` answers for `peer` have been sent.
    pub async fn wait_for_answers(
        &self,
        peer: &PeerId,
        count: usize,
        timeout_ms: u64,
    ) -> Result<Vec<SdpMessage>> {
        self.wait_for_sdp(peer, SdpKind::Answer, count, timeout_ms).await
    }

    async fn sdp_for(&self, peer: &PeerId, kind: SdpKind) -> Vec<SdpMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter_map(|(to, payload)| match payload {
                SignalPayload::Sdp(msg) if to == peer && msg.kind == kind => Some(msg.clone()),
                _ => None,
            })
            .collect()
    }

    async fn wait_for_sdp(
        &self,
        peer: &PeerId,
        kind: SdpKind,
        count: usize,
        timeout_ms: u64,
    ) -> Result<Vec<SdpMessage>> {
        let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);

        loop {
            let seen = self.sdp_for(peer, kind).await;
            if seen.len() >= count {
                return Ok(seen);
            }
            if tokio::time::Instant::now() >= deadline {
                bail!(
                    "timed out waiting for {count} {kind:?} message(s) to {peer}, saw {}",
                    seen.len()
                );
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }
}

#[async_trait]
impl SignalingBridge for MockSignalingBridge {
    async fn send(&self, to: PeerId, payload: SignalPayload) {
        tracing::debug!("[MockBridge] send to {}", to);
        self.sent.lock().await.push((to, payload));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_sent_payloads() {
        let bridge = MockSignalingBridge::new();
        let peer = PeerId::from("x");

        bridge
            .send(
                peer.clone(),
                SignalPayload::Sdp(SdpMessage {
                    kind: SdpKind::Offer,
                    sdp: "v=0".to_owned(),
                }),
            )
            .await;

        assert_eq!(bridge.offers_for(&peer).await.len(), 1);
        assert!(bridge.answers_for(&peer).await.is_empty());
        assert!(bridge.candidates_for(&peer).await.is_empty());
    }
}
