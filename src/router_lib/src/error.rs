use candid::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a pipeline failure, used by the router to decide
/// whether a swap can be re-queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Precondition,
    Solvency,
    Encoding,
    OracleProtocol,
    Transient,
}

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouterError {
    // Precondition violations
    #[error("to chainID mismatch: have {have}, want {want}")]
    ToChainIdMismatch { have: String, want: String },

    #[error("unsupported chain id: {0}")]
    UnsupportedChain(String),

    #[error("forbid empty sender")]
    EmptySender,

    #[error("router signer not found for token {token_id} on chain {chain_id}")]
    RouterSignerNotFound { token_id: String, chain_id: String },

    #[error("sender mismatch: have {have}, want {want}")]
    SenderMismatch { have: String, want: String },

    #[error("swap type not supported: {0}")]
    SwapTypeNotSupported(String),

    #[error("missing mpc public key for {0}")]
    MissingPublicKey(String),

    #[error("invalid public key {key}: {reason}")]
    InvalidPublicKey { key: String, reason: String },

    #[error("public key mismatch: transaction is signed by {have}, signer holds {want}")]
    PublicKeyMismatch { have: String, want: String },

    #[error("missing token config: {0}")]
    MissingTokenConfig(String),

    #[error("can not swapout to empty or invalid receiver: {0}")]
    InvalidReceiver(String),

    #[error("[sign] verify tx receiver failed: tx pays {have}, swap binds {want}")]
    ReceiverMismatch { have: String, want: String },

    #[error("missing signer private key for chain {0}")]
    MissingPrivateKey(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("signing session is {actual}, expected {expected}")]
    SigningState { expected: String, actual: String },

    // Solvency violations
    #[error("insufficient native balance, sender: {0}")]
    InsufficientNativeSender(String),

    #[error("insufficient native balance, receiver: {0}")]
    InsufficientNativeReceiver(String),

    #[error("insufficient {currency} balance, issuer: {issuer}, account: {account}")]
    InsufficientIssued {
        currency: String,
        issuer: String,
        account: String,
    },

    // Encoding violations
    #[error("amount value {0} is overflow of type int64")]
    AmountOverflow(String),

    #[error("malformed fee {0}")]
    MalformedFee(String),

    #[error("non exist currency {0}")]
    UnknownCurrency(String),

    #[error("non exist issuer {0}")]
    UnknownIssuer(String),

    #[error("sequence {0} is overflow of type uint32")]
    SequenceOverflow(u64),

    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    #[error("encoding error: {0}")]
    Encoding(String),

    // Oracle protocol violations
    #[error("get sign status require one rsv but have {count} (keyID = {key_id})")]
    UnexpectedSignatureCount { count: usize, key_id: String },

    #[error("verify signature error (keyID = {key_id}): {reason}")]
    SignatureVerification { key_id: String, reason: String },

    // Transient infrastructure failures
    #[error("signing oracle error: {0}")]
    Oracle(String),

    #[error("cannot get account {address}: {reason}")]
    AccountUnavailable { address: String, reason: String },

    #[error("cannot get balance of {address}: {reason}")]
    BalanceUnavailable { address: String, reason: String },

    #[error("rpc error: {0}")]
    Rpc(String),
}

impl RouterError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RouterError::ToChainIdMismatch { .. }
            | RouterError::UnsupportedChain(_)
            | RouterError::EmptySender
            | RouterError::RouterSignerNotFound { .. }
            | RouterError::SenderMismatch { .. }
            | RouterError::SwapTypeNotSupported(_)
            | RouterError::MissingPublicKey(_)
            | RouterError::InvalidPublicKey { .. }
            | RouterError::PublicKeyMismatch { .. }
            | RouterError::MissingTokenConfig(_)
            | RouterError::InvalidReceiver(_)
            | RouterError::ReceiverMismatch { .. }
            | RouterError::MissingPrivateKey(_)
            | RouterError::InvalidPrivateKey(_)
            | RouterError::SigningState { .. } => ErrorKind::Precondition,

            RouterError::InsufficientNativeSender(_)
            | RouterError::InsufficientNativeReceiver(_)
            | RouterError::InsufficientIssued { .. } => ErrorKind::Solvency,

            RouterError::AmountOverflow(_)
            | RouterError::MalformedFee(_)
            | RouterError::UnknownCurrency(_)
            | RouterError::UnknownIssuer(_)
            | RouterError::SequenceOverflow(_)
            | RouterError::InvalidSignature(_)
            | RouterError::Encoding(_) => ErrorKind::Encoding,

            RouterError::UnexpectedSignatureCount { .. } | RouterError::SignatureVerification { .. } => ErrorKind::OracleProtocol,

            RouterError::Oracle(_)
            | RouterError::AccountUnavailable { .. }
            | RouterError::BalanceUnavailable { .. }
            | RouterError::Rpc(_) => ErrorKind::Transient,
        }
    }

    /// Only infrastructure failures are worth re-running the pipeline for;
    /// everything else needs a change of state or operator correction first.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Transient
    }
}
