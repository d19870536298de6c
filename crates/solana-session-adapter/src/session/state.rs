/*
[INPUT]:  Lifecycle transitions driven by the session manager
[OUTPUT]: Tagged session state and its presentation-facing status view
[POS]:    Session layer - state definitions
[UPDATE]: When lifecycle states change
*/

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::provider::WalletHandle;
use crate::types::Pubkey;

/// Session lifecycle state.
///
/// Invariant: the wallet handle (signing capability) exists iff the state is
/// `Authenticated`. `Failed` carries the last failure reason and behaves like
/// `Unauthenticated` for preconditions: login is permitted, signing is not.
pub enum SessionState {
    Unauthenticated,
    Authenticating,
    Authenticated {
        identity: Pubkey,
        wallet: Arc<dyn WalletHandle>,
        since: DateTime<Utc>,
    },
    Failed {
        reason: String,
    },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated => "unauthenticated",
            SessionState::Authenticating => "authenticating",
            SessionState::Authenticated { .. } => "authenticated",
            SessionState::Failed { .. } => "failed",
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }

    /// Status view safe to hand to the presentation layer (no capability)
    pub fn status(&self) -> SessionStatus {
        match self {
            SessionState::Unauthenticated => SessionStatus::Unauthenticated,
            SessionState::Authenticating => SessionStatus::Authenticating,
            SessionState::Authenticated { identity, since, .. } => SessionStatus::Authenticated {
                public_key: *identity,
                since: *since,
            },
            SessionState::Failed { reason } => SessionStatus::Failed {
                reason: reason.clone(),
            },
        }
    }
}

impl fmt::Debug for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Authenticated { identity, since, .. } => f
                .debug_struct("Authenticated")
                .field("identity", identity)
                .field("since", since)
                .finish_non_exhaustive(),
            SessionState::Failed { reason } => {
                f.debug_struct("Failed").field("reason", reason).finish()
            }
            SessionState::Unauthenticated => f.write_str("Unauthenticated"),
            SessionState::Authenticating => f.write_str("Authenticating"),
        }
    }
}

/// Presentation-facing session status without the signing capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Authenticating,
    Authenticated {
        public_key: Pubkey,
        since: DateTime<Utc>,
    },
    Failed {
        reason: String,
    },
}

impl SessionStatus {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionStatus::Authenticated { .. })
    }
}
