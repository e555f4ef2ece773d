//! Conversion between the router's canonical RSV signature string and the raw
//! encodings ledgers put on the wire.
//!
//! * ECDSA (secp256k1): RSV is 130 hex characters, `R(64) ‖ S(64) ‖ 00`. The raw
//!   form is a DER `(r, s)` sequence with low-S normalisation.
//! * EdDSA (ed25519): RSV is the 64-byte signature itself, hex encoded.

use ed25519_dalek::{Signature as Ed25519Signature, VerifyingKey as Ed25519VerifyingKey};
use k256::ecdsa::signature::hazmat::PrehashVerifier;
use k256::ecdsa::{Signature as K256Signature, VerifyingKey as K256VerifyingKey};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

use crate::error::RouterError;

/// Marker byte that tags an ed25519 public key on Ripple-style ledgers.
pub const ED25519_KEY_PREFIX: u8 = 0xED;
pub const ED25519_PUBLIC_KEY_LEN: usize = 32;
pub const ED25519_SIGNATURE_LEN: usize = 64;
pub const ECDSA_RSV_HEX_LEN: usize = 130;
/// Trailing byte of an ECDSA RSV. The ledger encoding does not use it.
pub const RSV_PAD_BYTE: &str = "00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAlgorithm {
    Ecdsa,
    EdDsa,
}

impl Display for KeyAlgorithm {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.oracle_sign_type())
    }
}

impl KeyAlgorithm {
    /// EdDSA iff the key is the 0xED marker followed by a 32-byte ed25519 key.
    pub fn from_public_key(public_key: &[u8]) -> Self {
        if public_key.len() == ED25519_PUBLIC_KEY_LEN + 1 && public_key[0] == ED25519_KEY_PREFIX {
            KeyAlgorithm::EdDsa
        } else {
            KeyAlgorithm::Ecdsa
        }
    }

    /// Sign type understood by the signing oracle.
    pub fn oracle_sign_type(&self) -> &'static str {
        match self {
            KeyAlgorithm::Ecdsa => "EC256K1",
            KeyAlgorithm::EdDsa => "ED25519",
        }
    }

    /// Content handed to the oracle.
    ///
    /// ECDSA signs the ledger's signing hash. EdDSA must sign the exact message
    /// (signing prefix ‖ payload), never a pre-hash; the oracle hex-decodes it.
    pub fn signing_content(&self, signing_hash: &[u8; 32], message: &[u8]) -> String {
        match self {
            KeyAlgorithm::Ecdsa => hex::encode_upper(signing_hash),
            KeyAlgorithm::EdDsa => format!("0x{}", hex::encode(message)),
        }
    }

    /// Public key in the form the oracle indexes its key shares by.
    /// The oracle's ed25519 keys carry no 0xED marker.
    pub fn oracle_public_key(&self, public_key: &[u8]) -> String {
        match self {
            KeyAlgorithm::Ecdsa => hex::encode(public_key),
            KeyAlgorithm::EdDsa => hex::encode(&public_key[1..]),
        }
    }
}

fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Decode a hex string with an optional `0x` prefix.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, RouterError> {
    hex::decode(strip_hex_prefix(value)).map_err(|e| RouterError::Encoding(format!("invalid hex {}: {}", value, e)))
}

/// Split an ECDSA RSV into its big-endian `R` and `S` integers.
pub fn decode_ecdsa_rsv(rsv: &str) -> Result<(BigUint, BigUint), RouterError> {
    let rsv = strip_hex_prefix(rsv);
    if rsv.len() != ECDSA_RSV_HEX_LEN {
        return Err(RouterError::InvalidSignature(format!(
            "ecdsa rsv must be {} hex chars, got {}",
            ECDSA_RSV_HEX_LEN,
            rsv.len()
        )));
    }
    let bytes = hex::decode(rsv).map_err(|e| RouterError::InvalidSignature(format!("invalid rsv hex: {}", e)))?;
    let r = BigUint::from_bytes_be(&bytes[..32]);
    let s = BigUint::from_bytes_be(&bytes[32..64]);
    Ok((r, s))
}

/// `R` and `S` zero-padded to 32 bytes each, followed by the pad byte.
pub fn encode_ecdsa_rsv(r: &BigUint, s: &BigUint) -> String {
    format!("{:064X}{:064X}{}", r, s, RSV_PAD_BYTE)
}

fn to_field_bytes(value: &BigUint, name: &str) -> Result<[u8; 32], RouterError> {
    let bytes = value.to_bytes_be();
    if bytes.len() > 32 {
        return Err(RouterError::InvalidSignature(format!("{} exceeds 32 bytes", name)));
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

/// DER encoding of `(r, s)` with `s` normalised to the low half of the curve order.
pub fn ecdsa_der_from_scalars(r: &BigUint, s: &BigUint) -> Result<Vec<u8>, RouterError> {
    let signature = K256Signature::from_scalars(to_field_bytes(r, "r")?, to_field_bytes(s, "s")?)
        .map_err(|e| RouterError::InvalidSignature(format!("invalid ecdsa scalars: {}", e)))?;
    let signature = signature.normalize_s().unwrap_or(signature);
    Ok(signature.to_der().as_bytes().to_vec())
}

/// Convert an RSV into the raw signature bytes the ledger stores.
pub fn rsv_to_signature(rsv: &str, algorithm: KeyAlgorithm) -> Result<Vec<u8>, RouterError> {
    match algorithm {
        KeyAlgorithm::EdDsa => {
            let signature = decode_hex(rsv).map_err(|e| RouterError::InvalidSignature(e.to_string()))?;
            if signature.len() != ED25519_SIGNATURE_LEN {
                return Err(RouterError::InvalidSignature(format!(
                    "ed25519 signature must be {} bytes, got {}",
                    ED25519_SIGNATURE_LEN,
                    signature.len()
                )));
            }
            Ok(signature)
        }
        KeyAlgorithm::Ecdsa => {
            let (r, s) = decode_ecdsa_rsv(rsv)?;
            ecdsa_der_from_scalars(&r, &s)
        }
    }
}

/// Inverse of [`rsv_to_signature`]: raw ledger signature to RSV.
pub fn signature_to_rsv(signature: &[u8], algorithm: KeyAlgorithm) -> Result<String, RouterError> {
    match algorithm {
        KeyAlgorithm::EdDsa => Ok(hex::encode_upper(signature)),
        KeyAlgorithm::Ecdsa => {
            let signature = K256Signature::from_der(signature)
                .map_err(|e| RouterError::InvalidSignature(format!("parse signature error: {}", e)))?;
            let (r, s) = signature.split_bytes();
            Ok(encode_ecdsa_rsv(&BigUint::from_bytes_be(&r), &BigUint::from_bytes_be(&s)))
        }
    }
}

/// Verify a raw ledger signature.
///
/// ECDSA keys are checked against the 32-byte signing hash, EdDSA keys against
/// the full signing message.
pub fn verify_signature(public_key: &[u8], signing_hash: &[u8; 32], message: &[u8], signature: &[u8]) -> Result<(), RouterError> {
    match KeyAlgorithm::from_public_key(public_key) {
        KeyAlgorithm::Ecdsa => {
            let verifying_key = K256VerifyingKey::from_sec1_bytes(public_key).map_err(|e| RouterError::InvalidPublicKey {
                key: hex::encode(public_key),
                reason: e.to_string(),
            })?;
            let signature =
                K256Signature::from_der(signature).map_err(|e| RouterError::InvalidSignature(format!("parse signature error: {}", e)))?;
            verifying_key
                .verify_prehash(signing_hash, &signature)
                .map_err(|e| RouterError::InvalidSignature(e.to_string()))
        }
        KeyAlgorithm::EdDsa => {
            let key_bytes: [u8; ED25519_PUBLIC_KEY_LEN] = public_key[1..].try_into().map_err(|_| RouterError::InvalidPublicKey {
                key: hex::encode(public_key),
                reason: "ed25519 key must be 32 bytes".to_string(),
            })?;
            let verifying_key = Ed25519VerifyingKey::from_bytes(&key_bytes).map_err(|e| RouterError::InvalidPublicKey {
                key: hex::encode(public_key),
                reason: e.to_string(),
            })?;
            let signature =
                Ed25519Signature::from_slice(signature).map_err(|e| RouterError::InvalidSignature(format!("parse signature error: {}", e)))?;
            verifying_key
                .verify_strict(message, &signature)
                .map_err(|e| RouterError::InvalidSignature(e.to_string()))
        }
    }
}
