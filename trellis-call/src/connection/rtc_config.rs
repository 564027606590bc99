use trellis_core::IceServerConfig;
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::peer_connection::configuration::RTCConfiguration;

/// ICE configuration shared by every peer connection of a call. TURN
/// servers are plain additional entries; nothing else changes.
#[derive(Clone)]
pub struct RtcConfig {
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            ice_servers: vec![IceServerConfig {
                urls: vec!["stun:stun.l.google.com:19302".to_owned()],
                username: None,
                credential: None,
            }],
        }
    }
}

impl RtcConfig {
    /// No ICE servers at all; in-process loopback negotiation only.
    pub fn no_ice_servers() -> Self {
        Self {
            ice_servers: Vec::new(),
        }
    }

    pub(crate) fn to_rtc_configuration(&self) -> RTCConfiguration {
        RTCConfiguration {
            ice_servers: self
                .ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                })
                .collect(),
            ..Default::default()
        }
    }
}
