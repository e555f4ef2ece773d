//! Ledger Payment transactions: construction, signing data and finishing.

pub mod builder;
pub mod hash;
pub mod payment;
pub mod signed;

pub use builder::{new_unsigned_payment_transaction, PaymentParams, UnsignedTransaction};
pub use payment::{Memo, Payment, TransactionType};
pub use signed::{make_signed_transaction, SignedTransaction};
