/*
[INPUT]:  Identity provider SDK contract requirements
[OUTPUT]: Trait seams for the provider and its wallet handle
[POS]:    Provider layer - abstraction over the hosted identity/wallet SDK
[UPDATE]: When the provider contract gains operations
*/

pub mod local;
pub mod mock;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{SignedTransaction, Transaction};

pub use local::LocalKeyProvider;
pub use mock::{MockProvider, MockWallet};

/// Contract of the hosted identity/wallet provider.
///
/// The trait is async to support network-backed SDKs; implementations must
/// make `initialize` idempotent (guarded by explicit state on the object,
/// never a process-global flag).
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Prepare the provider for use. Safe to call more than once.
    async fn initialize(&self) -> Result<()>;

    /// Run the interactive login flow and return a wallet handle
    async fn connect(&self) -> Result<Arc<dyn WalletHandle>>;

    /// Recover a previously established session without user interaction.
    /// Returns `None` when no stored session exists.
    async fn try_restore(&self) -> Result<Option<Arc<dyn WalletHandle>>>;

    /// Tear down the provider-side session
    async fn disconnect(&self) -> Result<()>;

    /// Whether a provider-side session is currently established
    fn is_connected(&self) -> bool;
}

/// Signing capability scoped to one network family.
///
/// Exclusively owned by the session manager; never handed to callers.
#[async_trait]
pub trait WalletHandle: Send + Sync {
    /// Public-key strings of the accounts behind this handle
    async fn request_accounts(&self) -> Result<Vec<String>>;

    /// Produce a detached signature over raw message bytes
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>>;

    /// Attach a signature to an opaque transaction payload
    async fn sign_transaction(&self, transaction: Transaction) -> Result<SignedTransaction>;
}
