mod call_session;
mod renegotiation;
mod session_command;
mod session_handle;
mod session_manager;

pub use call_session::CallSession;
pub use renegotiation::renegotiate_all;
pub use session_command::CallCommand;
pub use session_handle::CallHandle;
pub use session_manager::CallManager;
