/*
[INPUT]:  Raw key bytes and opaque transaction payloads
[OUTPUT]: Typed public-key identifier and transaction models
[POS]:    Data layer - wallet-facing data models
[UPDATE]: When the identifier or transaction framing changes
*/

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SessionError;

/// Length in bytes of a Solana public key
pub const PUBKEY_LEN: usize = 32;

/// Public key of the authenticated identity on the target network.
///
/// Opaque fixed-length identifier; the canonical text form is base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pubkey([u8; PUBKEY_LEN]);

impl Pubkey {
    pub fn new(bytes: [u8; PUBKEY_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_LEN] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pubkey").field(&self.to_base58()).finish()
    }
}

impl FromStr for Pubkey {
    type Err = SessionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(value.trim()).into_vec().map_err(|e| {
            SessionError::InvalidResponse(format!("Invalid base58 public key: {e}"))
        })?;

        if bytes.len() != PUBKEY_LEN {
            return Err(SessionError::InvalidResponse(format!(
                "Invalid public key length: expected {PUBKEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }

        let mut key = [0u8; PUBKEY_LEN];
        key.copy_from_slice(&bytes);
        Ok(Self(key))
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(D::Error::custom)
    }
}

/// Unsigned transaction payload.
///
/// The adapter treats the serialized message as opaque bytes; building the
/// message is the caller's business, signing it is the provider's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub message: Vec<u8>,
}

impl Transaction {
    pub fn new(message: impl Into<Vec<u8>>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Transaction payload with a detached signature attached by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signer: Pubkey,
    pub signature: Vec<u8>,
}
