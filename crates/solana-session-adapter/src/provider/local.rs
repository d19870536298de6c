/*
[INPUT]:  Key storage directory and provider client identifier
[OUTPUT]: Ed25519-backed wallet handles with on-disk session persistence
[POS]:    Provider layer - local keypair implementation of the SDK contract
[UPDATE]: When key storage format or restore semantics change
*/

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use solana_keypair::{keypair_from_seed, Keypair};
use solana_signer::Signer;
use tracing::debug;

use crate::config::SessionConfig;
use crate::error::{Result, SessionError};
use crate::provider::{IdentityProvider, WalletHandle};
use crate::types::{LoginMethod, Pubkey, SignedTransaction, Transaction};

const KEY_FILE: &str = "local_ed25519.key";
const SESSION_MARKER_FILE: &str = "local.session";

/// On-disk record of an established session, checked on restore
#[derive(Debug, Serialize, Deserialize)]
struct SessionMarker {
    client_id: String,
    chain_id: String,
}

/// Wallet handle backed by a locally held Ed25519 keypair
pub struct LocalWallet {
    keypair: Keypair,
    address: Pubkey,
}

impl LocalWallet {
    fn new(keypair: Keypair) -> Self {
        let address = Pubkey::new(keypair.pubkey().to_bytes());
        Self { keypair, address }
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }
}

#[async_trait]
impl WalletHandle for LocalWallet {
    async fn request_accounts(&self) -> Result<Vec<String>> {
        Ok(vec![self.address.to_base58()])
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>> {
        let signature = self.keypair.sign_message(message);
        Ok(signature.as_ref().to_vec())
    }

    async fn sign_transaction(&self, transaction: Transaction) -> Result<SignedTransaction> {
        let signature = self.keypair.sign_message(&transaction.message);
        Ok(SignedTransaction {
            signer: self.address,
            signature: signature.as_ref().to_vec(),
            transaction,
        })
    }
}

/// Identity provider backed by a persistent local keypair.
///
/// Stands in for the hosted social-login SDK in development and tests: the
/// interactive flow is replaced by loading (or generating) an Ed25519 seed
/// under `key_dir`, and "a previously established session" is a marker file
/// written on connect and removed on disconnect. Restore therefore succeeds
/// only between a connect and the matching disconnect, like the hosted SDK.
pub struct LocalKeyProvider {
    client_id: String,
    chain_id: String,
    login_methods: Vec<LoginMethod>,
    key_dir: PathBuf,
    initialized: AtomicBool,
    connected: AtomicBool,
}

impl LocalKeyProvider {
    pub fn new(config: &SessionConfig, key_dir: impl AsRef<Path>) -> Self {
        Self {
            client_id: config.client_id.clone(),
            chain_id: config.network.chain_id().to_string(),
            login_methods: config.login_methods.clone(),
            key_dir: key_dir.as_ref().to_path_buf(),
            initialized: AtomicBool::new(false),
            connected: AtomicBool::new(false),
        }
    }

    fn key_path(&self) -> PathBuf {
        self.key_dir.join(KEY_FILE)
    }

    fn marker_path(&self) -> PathBuf {
        self.key_dir.join(SESSION_MARKER_FILE)
    }

    fn load_keypair(&self) -> Result<Option<Keypair>> {
        let path = self.key_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| SessionError::Config(format!("Failed to read key file: {e}")))?;
        let bytes = STANDARD
            .decode(content.trim())
            .map_err(|e| SessionError::Config(format!("Invalid key file encoding: {e}")))?;

        if bytes.len() != 32 {
            return Err(SessionError::Config(format!(
                "Invalid seed length: expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let keypair = keypair_from_seed(&bytes)
            .map_err(|e| SessionError::Config(format!("Invalid seed bytes: {e}")))?;
        Ok(Some(keypair))
    }

    fn load_or_create_keypair(&self) -> Result<Keypair> {
        if let Some(keypair) = self.load_keypair()? {
            return Ok(keypair);
        }

        let mut seed = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut seed);
        let keypair = keypair_from_seed(&seed)
            .map_err(|e| SessionError::Config(format!("Failed to derive keypair: {e}")))?;

        fs::create_dir_all(&self.key_dir)
            .map_err(|e| SessionError::Config(format!("Failed to create key dir: {e}")))?;
        let path = self.key_path();
        fs::write(&path, STANDARD.encode(seed))
            .map_err(|e| SessionError::Config(format!("Failed to write key file: {e}")))?;

        let mut perms = fs::metadata(&path)
            .map_err(|e| SessionError::Config(format!("Failed to stat key file: {e}")))?
            .permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)
            .map_err(|e| SessionError::Config(format!("Failed to chmod key file: {e}")))?;

        Ok(keypair)
    }

    fn write_marker(&self) -> Result<()> {
        let marker = SessionMarker {
            client_id: self.client_id.clone(),
            chain_id: self.chain_id.clone(),
        };
        fs::write(self.marker_path(), serde_json::to_string(&marker)?)
            .map_err(|e| SessionError::Config(format!("Failed to write session marker: {e}")))
    }

    /// Read the stored marker and check it belongs to this client and chain
    fn marker_matches(&self) -> Result<bool> {
        let path = self.marker_path();
        if !path.exists() {
            return Ok(false);
        }
        let content = fs::read_to_string(&path)
            .map_err(|e| SessionError::Config(format!("Failed to read session marker: {e}")))?;
        let marker: SessionMarker = serde_json::from_str(&content)?;

        if marker.client_id != self.client_id || marker.chain_id != self.chain_id {
            debug!(
                stored_chain = %marker.chain_id,
                chain_id = %self.chain_id,
                "stored session belongs to another client or chain"
            );
            return Ok(false);
        }
        Ok(true)
    }
}

#[async_trait]
impl IdentityProvider for LocalKeyProvider {
    async fn initialize(&self) -> Result<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        fs::create_dir_all(&self.key_dir)
            .map_err(|e| SessionError::Config(format!("Failed to create key dir: {e}")))?;
        debug!(client_id = %self.client_id, key_dir = %self.key_dir.display(), "local key provider initialized");
        Ok(())
    }

    async fn connect(&self) -> Result<Arc<dyn WalletHandle>> {
        debug!(methods = ?self.login_methods, "starting interactive login");
        let keypair = self.load_or_create_keypair()?;
        let wallet = LocalWallet::new(keypair);
        self.write_marker()?;
        self.connected.store(true, Ordering::SeqCst);
        debug!(address = %wallet.address(), chain_id = %self.chain_id, "local wallet connected");
        Ok(Arc::new(wallet))
    }

    async fn try_restore(&self) -> Result<Option<Arc<dyn WalletHandle>>> {
        if !self.marker_matches()? {
            return Ok(None);
        }
        match self.load_keypair()? {
            Some(keypair) => {
                let wallet = LocalWallet::new(keypair);
                self.connected.store(true, Ordering::SeqCst);
                debug!(address = %wallet.address(), "local session restored");
                Ok(Some(Arc::new(wallet) as Arc<dyn WalletHandle>))
            }
            None => Err(SessionError::Config(
                "Session marker present but key file missing".to_string(),
            )),
        }
    }

    async fn disconnect(&self) -> Result<()> {
        let marker = self.marker_path();
        if marker.exists() {
            fs::remove_file(&marker).map_err(|e| {
                SessionError::Config(format!("Failed to remove session marker: {e}"))
            })?;
        }
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
