//! Signing capability used by the chain adapters.
//!
//! A [`Signer`] is chosen once at setup, either a remote [`OracleSigner`] that
//! asks the MPC network, or a [`LocalKeySigner`] for controlled environments.
//! Adapters only ever talk to the trait.

use async_trait::async_trait;
use ed25519_dalek::Signer as _;
use k256::ecdsa::signature::hazmat::PrehashSigner;
use k256::ecdsa::{Signature as K256Signature, SigningKey as K256SigningKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use std::fmt;
use std::sync::Arc;
use tracing::{info, trace};

use crate::error::RouterError;
use crate::signature::{decode_hex, signature_to_rsv, verify_signature, KeyAlgorithm, ED25519_KEY_PREFIX};

/// Reply of the remote signing network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleResponse {
    /// Correlation ID of the signing round.
    pub key_id: String,
    pub rsvs: Vec<String>,
}

/// The remote MPC signing network.
#[async_trait]
pub trait SigningOracle: Send + Sync {
    async fn sign(
        &self,
        algorithm: KeyAlgorithm,
        public_key_hex: &str,
        content_hex: &str,
        context: &str,
    ) -> Result<OracleResponse, RouterError>;
}

/// Everything a signer needs to produce a signature for one transaction.
#[derive(Debug, Clone, Copy)]
pub struct SigningRequest<'a> {
    pub algorithm: KeyAlgorithm,
    pub public_key: &'a [u8],
    pub signing_hash: &'a [u8; 32],
    /// Signing prefix ‖ payload.
    pub message: &'a [u8],
    pub context: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignOutcome {
    pub key_id: String,
    pub rsv: String,
}

#[async_trait]
pub trait Signer: Send + Sync {
    async fn sign(&self, request: &SigningRequest<'_>) -> Result<SignOutcome, RouterError>;

    fn is_local(&self) -> bool {
        false
    }
}

pub struct OracleSigner {
    oracle: Arc<dyn SigningOracle>,
}

impl OracleSigner {
    pub fn new(oracle: Arc<dyn SigningOracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl Signer for OracleSigner {
    async fn sign(&self, request: &SigningRequest<'_>) -> Result<SignOutcome, RouterError> {
        let public_key = request.algorithm.oracle_public_key(request.public_key);
        let content = request.algorithm.signing_content(request.signing_hash, request.message);

        let response = self
            .oracle
            .sign(request.algorithm, &public_key, &content, request.context)
            .await?;
        info!(key_id = %response.key_id, sign_type = %request.algorithm, sign_content = %content, "mpc sign finished");

        if response.rsvs.len() != 1 {
            return Err(RouterError::UnexpectedSignatureCount {
                count: response.rsvs.len(),
                key_id: response.key_id,
            });
        }
        let OracleResponse { key_id, mut rsvs } = response;
        let rsv = rsvs.remove(0);
        trace!(key_id = %key_id, rsv = %rsv, "mpc sign get rsv success");

        Ok(SignOutcome { key_id, rsv })
    }
}

/// Private key held by the process itself.
#[derive(Clone)]
pub enum LocalKey {
    Secp256k1(K256SigningKey),
    Ed25519(ed25519_dalek::SigningKey),
}

impl fmt::Debug for LocalKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // never print key material
        write!(f, "LocalKey({}, {})", self.algorithm(), hex::encode(self.public_key()))
    }
}

impl LocalKey {
    /// Parse a hex private key. A 32-byte key is secp256k1; an `ED`-prefixed
    /// 33-byte key is an ed25519 seed.
    pub fn from_hex(value: &str) -> Result<Self, RouterError> {
        let bytes = decode_hex(value).map_err(|_| RouterError::InvalidPrivateKey("not a hex string".to_string()))?;
        match bytes.len() {
            32 => K256SigningKey::from_slice(&bytes)
                .map(LocalKey::Secp256k1)
                .map_err(|e| RouterError::InvalidPrivateKey(e.to_string())),
            33 if bytes[0] == ED25519_KEY_PREFIX => {
                let seed: [u8; 32] = bytes[1..]
                    .try_into()
                    .map_err(|_| RouterError::InvalidPrivateKey("ed25519 seed must be 32 bytes".to_string()))?;
                Ok(LocalKey::Ed25519(ed25519_dalek::SigningKey::from_bytes(&seed)))
            }
            n => Err(RouterError::InvalidPrivateKey(format!("unexpected key length {}", n))),
        }
    }

    pub fn algorithm(&self) -> KeyAlgorithm {
        match self {
            LocalKey::Secp256k1(_) => KeyAlgorithm::Ecdsa,
            LocalKey::Ed25519(_) => KeyAlgorithm::EdDsa,
        }
    }

    /// Ledger form of the public key: compressed SEC1 or 0xED ‖ ed25519 key.
    pub fn public_key(&self) -> Vec<u8> {
        match self {
            LocalKey::Secp256k1(key) => k256::PublicKey::from(key.verifying_key())
                .to_encoded_point(true)
                .as_bytes()
                .to_vec(),
            LocalKey::Ed25519(key) => {
                let mut public_key = Vec::with_capacity(33);
                public_key.push(ED25519_KEY_PREFIX);
                public_key.extend_from_slice(key.verifying_key().as_bytes());
                public_key
            }
        }
    }

    /// Raw ledger signature: DER for secp256k1, 64 bytes for ed25519.
    pub fn sign(&self, signing_hash: &[u8; 32], message: &[u8]) -> Result<Vec<u8>, RouterError> {
        match self {
            LocalKey::Secp256k1(key) => {
                let signature: K256Signature = key
                    .sign_prehash(signing_hash)
                    .map_err(|e| RouterError::InvalidSignature(format!("sign hash error: {}", e)))?;
                Ok(signature.to_der().as_bytes().to_vec())
            }
            LocalKey::Ed25519(key) => Ok(key.sign(message).to_bytes().to_vec()),
        }
    }
}

pub struct LocalKeySigner {
    key: LocalKey,
}

impl LocalKeySigner {
    pub fn new(key: LocalKey) -> Self {
        Self { key }
    }

    pub fn from_hex(value: &str) -> Result<Self, RouterError> {
        LocalKey::from_hex(value).map(Self::new)
    }

    pub fn public_key(&self) -> Vec<u8> {
        self.key.public_key()
    }
}

#[async_trait]
impl Signer for LocalKeySigner {
    async fn sign(&self, request: &SigningRequest<'_>) -> Result<SignOutcome, RouterError> {
        let public_key = self.key.public_key();
        let signature = self.key.sign(request.signing_hash, request.message)?;

        verify_signature(&public_key, request.signing_hash, request.message, &signature).map_err(|e| {
            RouterError::SignatureVerification {
                key_id: "local".to_string(),
                reason: e.to_string(),
            }
        })?;

        let rsv = signature_to_rsv(&signature, self.key.algorithm())?;
        Ok(SignOutcome {
            key_id: "local".to_string(),
            rsv,
        })
    }

    fn is_local(&self) -> bool {
        true
    }
}
