pub mod build_args;
pub mod collaborators;
pub mod config;
pub mod error;
#[cfg(feature = "ic")]
pub mod ic;
pub mod logging;
pub mod nonce;
pub mod signature;
pub mod signer;
pub mod token_config;

pub use build_args::{BuildTxArgs, Erc20SwapInfo, SwapType, TxExtra};
pub use error::{ErrorKind, RouterError};
pub use signature::KeyAlgorithm;
