//! Ripple ledger adapter of the swap router.
//!
//! [`RippleBridge`] turns a [`router_lib::BuildTxArgs`] into an unsigned
//! Payment, gets it signed through the configured signer, verifies the
//! signature and returns the wire-ready transaction.

pub mod amount;
pub mod balance;
pub mod bridge;
pub mod codec;
pub mod error;
pub mod ledger;
pub mod network;
pub mod sequence;
pub mod signing;
pub mod transaction;
pub mod utils;

pub use bridge::{RippleBridge, RippleCollaborators};
pub use error::RippleError;
pub use ledger::{AccountInfo, LedgerClient};
pub use network::{AccountId, RippleNetwork};
pub use signing::{SigningSession, SigningState};
pub use transaction::{SignedTransaction, UnsignedTransaction};
