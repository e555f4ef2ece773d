pub mod base58;
