/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public session adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod config;
pub mod error;
pub mod provider;
pub mod rpc;
pub mod session;
pub mod types;

// Re-export commonly used types from config
pub use config::{SessionConfig, CLIENT_ID_ENV_VAR, NETWORK_ENV_VAR, RPC_URL_ENV_VAR};

// Re-export commonly used types from error
pub use error::{Result, SessionError};

// Re-export commonly used types from provider
pub use provider::{
    IdentityProvider,
    LocalKeyProvider,
    MockProvider,
    MockWallet,
    WalletHandle,
};

// Re-export commonly used types from rpc
pub use rpc::{lamports_to_sol, RpcClient, RpcConfig, LAMPORTS_PER_SOL};

// Re-export commonly used types from session
pub use session::{SessionManager, SessionStatus};

// Re-export all types
pub use types::*;
