//! Canonical binary encoding of ledger transactions.

pub mod amount;
pub mod field;
pub mod path;
pub mod serializer;

pub use amount::{parse_native_drops, Amount, Currency, IssuedValue};
pub use path::{PathSet, PathStep};
pub use serializer::BinarySerializer;
