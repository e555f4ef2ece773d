use candid::Deserialize;
use router_lib::RouterError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RippleError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid public key format: {0}")]
    InvalidPublicKeyFormat(String),

    #[error("Invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl From<RippleError> for RouterError {
    fn from(e: RippleError) -> Self {
        match e {
            RippleError::InvalidPublicKeyFormat(reason) => RouterError::InvalidPublicKey {
                key: String::new(),
                reason,
            },
            other => RouterError::Encoding(other.to_string()),
        }
    }
}
