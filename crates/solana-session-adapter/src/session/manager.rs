/*
[INPUT]:  Identity provider seam, RPC endpoint, session configuration
[OUTPUT]: Authenticated sessions and wallet operations (sign, balance)
[POS]:    Session layer - orchestrates the authentication lifecycle
[UPDATE]: When lifecycle operations or their preconditions change
*/

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::provider::{IdentityProvider, WalletHandle};
use crate::rpc::{lamports_to_sol, RpcClient, RpcConfig};
use crate::session::state::{SessionState, SessionStatus};
use crate::types::{Pubkey, SignedTransaction, Transaction};

/// Mediates the authentication lifecycle and wallet operations.
///
/// The only component with authority to mutate session state. Lifecycle
/// operations (`login`, `logout`, `restore_session`) are serialized through a
/// single in-flight guard; signing and balance reads take a short state read
/// and then run concurrently. The state lock is never held across an await.
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    rpc: RpcClient,
    state: RwLock<SessionState>,
    lifecycle: Mutex<()>,
    restore_attempted: AtomicBool,
    provider_timeout: Duration,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("rpc", &self.rpc)
            .field("state", &self.state)
            .field("restore_attempted", &self.restore_attempted)
            .field("provider_timeout", &self.provider_timeout)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    /// Create a manager for the given provider, building the RPC client from
    /// the configured endpoint.
    pub fn new(config: SessionConfig, provider: Arc<dyn IdentityProvider>) -> Result<Self> {
        config.validate()?;
        let rpc = RpcClient::with_config(
            config.effective_rpc_url(),
            RpcConfig {
                timeout: config.rpc_timeout(),
                connect_timeout: config.connect_timeout(),
            },
        )?;

        Ok(Self {
            provider,
            rpc,
            state: RwLock::new(SessionState::Unauthenticated),
            lifecycle: Mutex::new(()),
            restore_attempted: AtomicBool::new(false),
            provider_timeout: config.provider_timeout(),
        })
    }

    /// Current presentation-facing status
    pub fn status(&self) -> SessionStatus {
        self.state.read().unwrap().status()
    }

    /// Public key of the authenticated identity, if any
    pub fn user_public_key(&self) -> Option<Pubkey> {
        match &*self.state.read().unwrap() {
            SessionState::Authenticated { identity, .. } => Some(*identity),
            _ => None,
        }
    }

    /// When the current session was established, if authenticated
    pub fn authenticated_at(&self) -> Option<DateTime<Utc>> {
        match &*self.state.read().unwrap() {
            SessionState::Authenticated { since, .. } => Some(*since),
            _ => None,
        }
    }

    /// Attempt to recover a previously established provider session.
    ///
    /// Runs at most once per manager lifetime regardless of how many times
    /// the host calls it. Failures are logged and swallowed; the caller is
    /// never handed an error from startup restoration.
    pub async fn restore_session(&self) {
        if self.restore_attempted.swap(true, Ordering::SeqCst) {
            debug!("session restore already attempted, skipping");
            return;
        }

        let _guard = self.lifecycle.lock().await;
        if self.state.read().unwrap().is_authenticated() {
            debug!("session already authenticated, skipping restore");
            return;
        }
        self.set_state(SessionState::Authenticating);

        match self.restore_inner().await {
            Ok(Some((identity, wallet))) => {
                info!(%identity, "session restored");
                self.set_state(SessionState::Authenticated {
                    identity,
                    wallet,
                    since: Utc::now(),
                });
            }
            Ok(None) => {
                debug!("no stored provider session");
                self.set_state(SessionState::Unauthenticated);
            }
            Err(err) => {
                warn!(error = %err, "session restore failed");
                self.set_state(SessionState::Unauthenticated);
            }
        }
    }

    async fn restore_inner(&self) -> Result<Option<(Pubkey, Arc<dyn WalletHandle>)>> {
        self.with_provider_timeout(self.provider.initialize())
            .await?;
        let wallet = match self
            .with_provider_timeout(self.provider.try_restore())
            .await?
        {
            Some(wallet) => wallet,
            None => return Ok(None),
        };
        let identity = self.resolve_identity(&wallet).await?;
        Ok(Some((identity, wallet)))
    }

    /// Run the interactive login flow.
    ///
    /// Idempotent: when the provider already reports a connection and the
    /// session is authenticated, no second connect attempt is made. Failures
    /// are re-raised as `Authentication` so the caller can surface them.
    pub async fn login(&self) -> Result<Pubkey> {
        let _guard = self.lifecycle.lock().await;

        if self.provider.is_connected() {
            if let SessionState::Authenticated { identity, .. } = &*self.state.read().unwrap() {
                debug!(%identity, "already connected, skipping login");
                return Ok(*identity);
            }
        }

        self.set_state(SessionState::Authenticating);
        match self.login_inner().await {
            Ok((identity, wallet)) => {
                info!(%identity, "login complete");
                self.set_state(SessionState::Authenticated {
                    identity,
                    wallet,
                    since: Utc::now(),
                });
                Ok(identity)
            }
            Err(err) => {
                warn!(error = %err, "login failed");
                let err = match err {
                    SessionError::Timeout { .. } | SessionError::Authentication { .. } => err,
                    other => SessionError::authentication(other.to_string()),
                };
                self.set_state(SessionState::Failed {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn login_inner(&self) -> Result<(Pubkey, Arc<dyn WalletHandle>)> {
        self.with_provider_timeout(self.provider.initialize())
            .await?;
        let wallet = self.with_provider_timeout(self.provider.connect()).await?;
        let identity = self.resolve_identity(&wallet).await?;
        Ok((identity, wallet))
    }

    async fn resolve_identity(&self, wallet: &Arc<dyn WalletHandle>) -> Result<Pubkey> {
        let accounts = self
            .with_provider_timeout(wallet.request_accounts())
            .await?;
        let first = accounts
            .first()
            .ok_or_else(|| SessionError::authentication("provider returned no accounts"))?;
        first.parse()
    }

    /// Disconnect from the provider and clear the local session.
    ///
    /// Local state is cleared unconditionally: a failed provider-side
    /// disconnect must not leave the caller holding a stale authenticated
    /// view, so the error is logged and swallowed.
    pub async fn logout(&self) -> Result<()> {
        let _guard = self.lifecycle.lock().await;

        if let Err(err) = self
            .with_provider_timeout(self.provider.disconnect())
            .await
        {
            warn!(error = %err, "provider disconnect failed, clearing local session anyway");
        }

        self.set_state(SessionState::Unauthenticated);
        info!("logged out");
        Ok(())
    }

    /// Sign a UTF-8 text message with the held signing capability.
    ///
    /// Returns the raw signature bytes; session state is untouched.
    pub async fn sign_message(&self, message: &str) -> Result<Vec<u8>> {
        let wallet = self.wallet().ok_or(SessionError::NotConnected)?;
        let identity = self.user_public_key().ok_or(SessionError::NotAuthenticated)?;
        debug!(%identity, message_len = message.len(), "signing message");

        self.with_provider_timeout(wallet.sign_message(message.as_bytes()))
            .await
            .map_err(map_sign_error)
    }

    /// Sign an opaque transaction payload. Signing only, never submission.
    pub async fn sign_transaction(&self, transaction: Transaction) -> Result<SignedTransaction> {
        let wallet = self.wallet().ok_or(SessionError::NotConnected)?;

        self.with_provider_timeout(wallet.sign_transaction(transaction))
            .await
            .map_err(map_sign_error)
    }

    /// Query the native-token balance of the authenticated identity, in SOL
    pub async fn get_balance(&self) -> Result<Decimal> {
        let identity = self.user_public_key().ok_or(SessionError::NotConnected)?;
        let lamports = self.rpc.get_balance(&identity).await?;
        Ok(lamports_to_sol(lamports))
    }

    fn wallet(&self) -> Option<Arc<dyn WalletHandle>> {
        match &*self.state.read().unwrap() {
            SessionState::Authenticated { wallet, .. } => Some(wallet.clone()),
            _ => None,
        }
    }

    fn set_state(&self, next: SessionState) {
        let mut guard = self.state.write().unwrap();
        debug!(from = guard.name(), to = next.name(), "session state transition");
        *guard = next;
    }

    async fn with_provider_timeout<T>(
        &self,
        fut: impl Future<Output = Result<T>> + Send,
    ) -> Result<T> {
        match tokio::time::timeout(self.provider_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout {
                duration: self.provider_timeout.as_secs(),
            }),
        }
    }
}

fn map_sign_error(err: SessionError) -> SessionError {
    match err {
        SessionError::Signing(_) | SessionError::Timeout { .. } => err,
        other => SessionError::Signing(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockProvider;

    fn test_manager(provider: Arc<MockProvider>) -> SessionManager {
        let mut config = SessionConfig::new("test-client");
        config.rpc_url = Some("http://127.0.0.1:1".to_string());
        SessionManager::new(config, provider).unwrap()
    }

    #[tokio::test]
    async fn test_initial_state_is_unauthenticated() {
        let manager = test_manager(Arc::new(MockProvider::new()));
        assert_eq!(manager.status(), SessionStatus::Unauthenticated);
        assert!(manager.user_public_key().is_none());
        assert!(manager.authenticated_at().is_none());
    }

    #[tokio::test]
    async fn test_login_sets_identity() {
        let provider = Arc::new(MockProvider::new());
        let manager = test_manager(provider.clone());

        let identity = manager.login().await.unwrap();
        assert_eq!(manager.user_public_key(), Some(identity));
        assert!(manager.status().is_authenticated());
        assert!(manager.authenticated_at().is_some());
    }

    #[tokio::test]
    async fn test_failed_login_records_reason() {
        let provider = Arc::new(MockProvider::new());
        provider.set_fail_connect(true);
        let manager = test_manager(provider.clone());

        let err = manager.login().await.unwrap_err();
        assert!(err.is_auth_error());
        match manager.status() {
            SessionStatus::Failed { reason } => assert!(reason.contains("connect")),
            other => panic!("unexpected status: {other:?}"),
        }

        // login is permitted again after a failure
        provider.set_fail_connect(false);
        assert!(manager.login().await.is_ok());
    }

    #[tokio::test]
    async fn test_provider_timeout_is_bounded() {
        struct StallingProvider;

        #[async_trait::async_trait]
        impl IdentityProvider for StallingProvider {
            async fn initialize(&self) -> Result<()> {
                Ok(())
            }
            async fn connect(&self) -> Result<Arc<dyn WalletHandle>> {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                unreachable!()
            }
            async fn try_restore(&self) -> Result<Option<Arc<dyn WalletHandle>>> {
                Ok(None)
            }
            async fn disconnect(&self) -> Result<()> {
                Ok(())
            }
            fn is_connected(&self) -> bool {
                false
            }
        }

        let mut config = SessionConfig::new("test-client");
        config.rpc_url = Some("http://127.0.0.1:1".to_string());
        config.provider_timeout_secs = 0;
        let manager = SessionManager::new(config, Arc::new(StallingProvider)).unwrap();

        let err = manager.login().await.unwrap_err();
        assert!(matches!(err, SessionError::Timeout { .. }));
    }
}
