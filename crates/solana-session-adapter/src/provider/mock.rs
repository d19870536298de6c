/*
[INPUT]:  Scripted failure toggles and canned account data
[OUTPUT]: In-memory provider recording every collaborator call
[POS]:    Provider layer - mock implementation for tests and examples
[UPDATE]: When the provider contract changes
*/

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Result, SessionError};
use crate::provider::{IdentityProvider, WalletHandle};
use crate::types::{Pubkey, SignedTransaction, Transaction, PUBKEY_LEN};

/// Mock wallet handle with call counting and scriptable sign failures
#[derive(Debug)]
pub struct MockWallet {
    address: Pubkey,
    signature: Vec<u8>,
    sign_calls: AtomicUsize,
    fail_sign: AtomicBool,
}

impl MockWallet {
    /// Create a mock wallet for the given key bytes with a canned signature
    pub fn new(key_bytes: [u8; PUBKEY_LEN]) -> Self {
        Self {
            address: Pubkey::new(key_bytes),
            signature: vec![7u8; 64],
            sign_calls: AtomicUsize::new(0),
            fail_sign: AtomicBool::new(false),
        }
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    /// Number of sign requests (message or transaction) received
    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }

    pub fn set_fail_sign(&self, fail: bool) {
        self.fail_sign.store(fail, Ordering::SeqCst);
    }
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new([1u8; PUBKEY_LEN])
    }
}

#[async_trait]
impl WalletHandle for MockWallet {
    async fn request_accounts(&self) -> Result<Vec<String>> {
        Ok(vec![self.address.to_base58()])
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<Vec<u8>> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign.load(Ordering::SeqCst) {
            return Err(SessionError::Signing("mock sign failure".to_string()));
        }
        Ok(self.signature.clone())
    }

    async fn sign_transaction(&self, transaction: Transaction) -> Result<SignedTransaction> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_sign.load(Ordering::SeqCst) {
            return Err(SessionError::Signing("mock sign failure".to_string()));
        }
        Ok(SignedTransaction {
            transaction,
            signer: self.address,
            signature: self.signature.clone(),
        })
    }
}

/// Mock identity provider recording connect/disconnect/restore traffic
#[derive(Debug)]
pub struct MockProvider {
    wallet: Arc<MockWallet>,
    connected: AtomicBool,
    restorable: AtomicBool,
    fail_connect: AtomicBool,
    fail_restore: AtomicBool,
    fail_disconnect: AtomicBool,
    initialize_calls: AtomicUsize,
    connect_calls: AtomicUsize,
    restore_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::with_wallet(Arc::new(MockWallet::default()))
    }

    pub fn with_wallet(wallet: Arc<MockWallet>) -> Self {
        Self {
            wallet,
            connected: AtomicBool::new(false),
            restorable: AtomicBool::new(false),
            fail_connect: AtomicBool::new(false),
            fail_restore: AtomicBool::new(false),
            fail_disconnect: AtomicBool::new(false),
            initialize_calls: AtomicUsize::new(0),
            connect_calls: AtomicUsize::new(0),
            restore_calls: AtomicUsize::new(0),
            disconnect_calls: AtomicUsize::new(0),
        }
    }

    pub fn wallet(&self) -> Arc<MockWallet> {
        self.wallet.clone()
    }

    /// Pretend a previous provider session exists on the next restore
    pub fn set_restorable(&self, restorable: bool) {
        self.restorable.store(restorable, Ordering::SeqCst);
    }

    pub fn set_fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_restore(&self, fail: bool) {
        self.fail_restore.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_disconnect(&self, fail: bool) {
        self.fail_disconnect.store(fail, Ordering::SeqCst);
    }

    pub fn initialize_calls(&self) -> usize {
        self.initialize_calls.load(Ordering::SeqCst)
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn restore_calls(&self) -> usize {
        self.restore_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn initialize(&self) -> Result<()> {
        self.initialize_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn connect(&self) -> Result<Arc<dyn WalletHandle>> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect.load(Ordering::SeqCst) {
            return Err(SessionError::authentication("mock connect failure"));
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(self.wallet.clone())
    }

    async fn try_restore(&self) -> Result<Option<Arc<dyn WalletHandle>>> {
        self.restore_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_restore.load(Ordering::SeqCst) {
            return Err(SessionError::authentication("mock restore failure"));
        }
        if self.restorable.load(Ordering::SeqCst) {
            self.connected.store(true, Ordering::SeqCst);
            Ok(Some(self.wallet.clone() as Arc<dyn WalletHandle>))
        } else {
            Ok(None)
        }
    }

    async fn disconnect(&self) -> Result<()> {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_disconnect.load(Ordering::SeqCst) {
            return Err(SessionError::Network(
                "mock disconnect failure".to_string(),
            ));
        }
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
