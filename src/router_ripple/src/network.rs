use ripemd::Ripemd160;
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use super::error::RippleError;
use super::utils::base58;

const ACCOUNT_ID_LEN: usize = 20;
const ADDRESS_VERSION: u8 = 0x00;
const CHECKSUM_LEN: usize = 4;

/// 20-byte ledger account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId(pub [u8; ACCOUNT_ID_LEN]);

impl AccountId {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_address(&self) -> String {
        RippleNetwork::encode_address(self)
    }
}

impl Display for AccountId {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.to_address())
    }
}

impl FromStr for AccountId {
    type Err = RippleError;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        RippleNetwork::decode_address(address)
    }
}

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let first = Sha256::digest(payload);
    let second = Sha256::digest(first);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&second[..CHECKSUM_LEN]);
    out
}

pub struct RippleNetwork;

impl RippleNetwork {
    /// RIPEMD160(SHA256(pubkey)), for both secp256k1 and 0xED-prefixed ed25519 keys.
    pub fn account_id_from_public_key(public_key: &[u8]) -> Result<AccountId, RippleError> {
        if public_key.len() != 33 {
            return Err(RippleError::InvalidPublicKeyFormat(format!(
                "expected 33 bytes, got {}",
                public_key.len()
            )));
        }

        let sha = Sha256::digest(public_key);
        let mut ripemd = Ripemd160::new();
        ripemd.update(sha);
        let account_id = ripemd.finalize();

        let mut out = [0u8; ACCOUNT_ID_LEN];
        out.copy_from_slice(&account_id);
        Ok(AccountId(out))
    }

    pub fn address_from_public_key(public_key: &[u8]) -> Result<String, RippleError> {
        Self::account_id_from_public_key(public_key).map(|id| Self::encode_address(&id))
    }

    /// base58(version ‖ account_id ‖ checksum)
    pub fn encode_address(account_id: &AccountId) -> String {
        let mut payload = Vec::with_capacity(1 + ACCOUNT_ID_LEN + CHECKSUM_LEN);
        payload.push(ADDRESS_VERSION);
        payload.extend_from_slice(&account_id.0);
        let checksum = checksum(&payload);
        payload.extend_from_slice(&checksum);

        base58::encode_wallet_address(&payload)
    }

    pub fn decode_address(address: &str) -> Result<AccountId, RippleError> {
        let bytes = base58::decode_wallet_address(address).map_err(|e| RippleError::InvalidAddress(format!("{}: {}", address, e)))?;
        if bytes.len() != 1 + ACCOUNT_ID_LEN + CHECKSUM_LEN {
            return Err(RippleError::InvalidAddress(format!("{}: wrong length", address)));
        }
        if bytes[0] != ADDRESS_VERSION {
            return Err(RippleError::InvalidAddress(format!("{}: wrong version", address)));
        }

        let (payload, expected) = bytes.split_at(1 + ACCOUNT_ID_LEN);
        if checksum(payload) != expected {
            return Err(RippleError::InvalidAddress(format!("{}: checksum mismatch", address)));
        }

        let mut out = [0u8; ACCOUNT_ID_LEN];
        out.copy_from_slice(&payload[1..]);
        Ok(AccountId(out))
    }

    pub fn is_valid_address(address: &str) -> bool {
        Self::decode_address(address).is_ok()
    }
}
