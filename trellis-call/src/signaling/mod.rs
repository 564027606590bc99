mod bridge;

pub use bridge::SignalingBridge;
