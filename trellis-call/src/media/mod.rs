mod capture;
mod controller;
mod local_stream;

pub use capture::{CapturedSource, MediaCapture};
pub use controller::{LocalMediaController, MediaChange, MediaToggles};
pub use local_stream::{LocalStream, StreamId, StreamSource};
