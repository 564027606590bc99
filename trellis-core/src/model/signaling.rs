use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// One signal relayed between two peers. Externally tagged so the wire
/// shape is `{"sdp": {...}}` or `{"ice": {...}}`; the sender peer id is
/// carried by the transport, not the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SignalPayload {
    #[serde(rename = "sdp")]
    Sdp(SdpMessage),
    #[serde(rename = "ice")]
    Ice(IceCandidateMsg),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdpMessage {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

/// ICE candidate body in the browser-JSON field naming.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidateMsg {
    pub candidate: String,
    pub sdp_mid: Option<String>,
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}
