/*
[INPUT]:  Session, network, and wallet data definitions
[OUTPUT]: Typed identifiers, transaction payloads, and network enums
[POS]:    Data layer - shared type definitions
[UPDATE]: When adding new shared types
*/

pub mod enums;
pub mod models;

pub use enums::{LoginMethod, Network};
pub use models::{Pubkey, SignedTransaction, Transaction, PUBKEY_LEN};
