//! Signing oracle backed by the Internet Computer's threshold signatures.
//!
//! The subnet's key shares never leave the replicas, so this is an MPC signing
//! network reached through the management canister.

use async_trait::async_trait;
use candid::Principal;
use ic_cdk::management_canister::{
    ecdsa_public_key, schnorr_public_key, sign_with_ecdsa, sign_with_schnorr, EcdsaCurve, EcdsaKeyId, EcdsaPublicKeyArgs,
    SchnorrAlgorithm, SchnorrKeyId, SchnorrPublicKeyArgs, SignWithEcdsaArgs, SignWithSchnorrArgs,
};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

use crate::error::RouterError;
use crate::signature::{decode_hex, RSV_PAD_BYTE};
use crate::signer::{OracleResponse, SigningOracle};
use crate::KeyAlgorithm;

static THRESHOLD_KEY_NAME: OnceLock<String> = OnceLock::new();

pub struct ThresholdSigningOracle {
    derivation_path: Vec<Vec<u8>>,
}

impl ThresholdSigningOracle {
    /// Keys are derived from the canister's principal.
    pub fn new(canister: &Principal) -> Self {
        Self {
            derivation_path: vec![canister.as_slice().to_vec()],
        }
    }

    /// Get the threshold key name for this build
    pub fn get_key_name() -> String {
        THRESHOLD_KEY_NAME
            .get_or_init(|| {
                // Official IC threshold key names:
                // - "dfx_test_key": local dfx replica only
                // - "test_key_1": mainnet test key
                // - "key_1": mainnet production key
                if cfg!(feature = "prod") {
                    "key_1".to_string()
                } else if cfg!(feature = "staging") {
                    "test_key_1".to_string()
                } else {
                    "dfx_test_key".to_string()
                }
            })
            .clone()
    }

    fn ecdsa_key_id() -> EcdsaKeyId {
        EcdsaKeyId {
            curve: EcdsaCurve::Secp256k1,
            name: Self::get_key_name(),
        }
    }

    fn schnorr_key_id() -> SchnorrKeyId {
        SchnorrKeyId {
            algorithm: SchnorrAlgorithm::Ed25519,
            name: Self::get_key_name(),
        }
    }

    /// Compressed secp256k1 public key of this canister's threshold key.
    pub async fn get_ecdsa_public_key(&self) -> Result<Vec<u8>, RouterError> {
        let request = EcdsaPublicKeyArgs {
            canister_id: None,
            derivation_path: self.derivation_path.clone(),
            key_id: Self::ecdsa_key_id(),
        };
        ecdsa_public_key(&request)
            .await
            .map(|response| response.public_key)
            .map_err(|e| RouterError::Oracle(format!("Failed to get secp256k1 public key: {}", e)))
    }

    /// Ed25519 public key of this canister's threshold key, without the 0xED marker.
    pub async fn get_ed25519_public_key(&self) -> Result<Vec<u8>, RouterError> {
        let request = SchnorrPublicKeyArgs {
            canister_id: None,
            derivation_path: self.derivation_path.clone(),
            key_id: Self::schnorr_key_id(),
        };
        schnorr_public_key(&request)
            .await
            .map(|response| response.public_key)
            .map_err(|e| RouterError::Oracle(format!("Failed to get Ed25519 public key: {}", e)))
    }
}

/// `<key name>:<first 8 bytes of sha256(content)>`, enough to find the
/// signing round in replica logs.
fn correlation_id(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    format!("{}:{}", ThresholdSigningOracle::get_key_name(), hex::encode(&digest[..8]))
}

#[async_trait]
impl SigningOracle for ThresholdSigningOracle {
    async fn sign(
        &self,
        algorithm: KeyAlgorithm,
        _public_key_hex: &str,
        content_hex: &str,
        _context: &str,
    ) -> Result<OracleResponse, RouterError> {
        let content = decode_hex(content_hex)?;
        let key_id = correlation_id(&content);

        let rsv = match algorithm {
            KeyAlgorithm::Ecdsa => {
                let request = SignWithEcdsaArgs {
                    message_hash: content,
                    derivation_path: self.derivation_path.clone(),
                    key_id: Self::ecdsa_key_id(),
                };
                let signature = sign_with_ecdsa(&request)
                    .await
                    .map(|response| response.signature)
                    .map_err(|e| RouterError::Oracle(format!("Failed to sign transaction: {}", e)))?;
                // threshold ECDSA returns r ‖ s
                format!("{}{}", hex::encode_upper(signature), RSV_PAD_BYTE)
            }
            KeyAlgorithm::EdDsa => {
                let request = SignWithSchnorrArgs {
                    message: content,
                    derivation_path: self.derivation_path.clone(),
                    key_id: Self::schnorr_key_id(),
                    aux: None,
                };
                let signature = sign_with_schnorr(&request)
                    .await
                    .map(|response| response.signature)
                    .map_err(|e| RouterError::Oracle(format!("Failed to sign transaction: {}", e)))?;
                hex::encode_upper(signature)
            }
        };

        Ok(OracleResponse { key_id, rsvs: vec![rsv] })
    }
}
