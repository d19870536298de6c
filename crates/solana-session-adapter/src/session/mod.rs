/*
[INPUT]:  Provider seam, RPC client, and configuration
[OUTPUT]: Session lifecycle management and wallet operations
[POS]:    Session layer - the core state machine
[UPDATE]: When lifecycle semantics or the presentation-facing surface change
*/

pub mod manager;
pub mod state;

pub use manager::SessionManager;
pub use state::{SessionState, SessionStatus};
