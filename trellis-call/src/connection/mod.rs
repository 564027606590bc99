mod engine_event;
mod manager;
mod peer_link;
mod registry;
mod remote_tile;
mod rtc_config;

pub use engine_event::EngineEvent;
pub use manager::PeerConnectionManager;
pub use peer_link::PeerLink;
pub use registry::ConnectionRegistry;
pub use remote_tile::RemoteTile;
pub use rtc_config::RtcConfig;
