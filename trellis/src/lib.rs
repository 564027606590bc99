pub use trellis_core::model::PeerId;

pub mod model {
    pub use trellis_core::model::*;
}

pub mod call {
    pub use trellis_call::*;
}
