use router_lib::signature::{rsv_to_signature, KeyAlgorithm};
use router_lib::RouterError;
use tracing::warn;

use super::builder::UnsignedTransaction;
use super::payment::Payment;

/// A Payment carrying its signature, ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    payment: Payment,
    blob: Vec<u8>,
    hash: [u8; 32],
}

impl SignedTransaction {
    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    /// Upper-case hex of the wire serialization, as submitted to a node.
    pub fn blob_hex(&self) -> String {
        hex::encode_upper(&self.blob)
    }

    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    pub fn hash_hex(&self) -> String {
        hex::encode_upper(self.hash)
    }
}

/// Inject the signature decoded from `rsv` and compute the transaction hash.
///
/// `public_key` must be the key the payment was built with; its algorithm
/// decides how the RSV is decoded.
pub fn make_signed_transaction(public_key: &[u8], rsv: &str, unsigned: &UnsignedTransaction) -> Result<SignedTransaction, RouterError> {
    if public_key != unsigned.public_key() {
        return Err(RouterError::PublicKeyMismatch {
            have: hex::encode(unsigned.public_key()),
            want: hex::encode(public_key),
        });
    }

    let signature = rsv_to_signature(rsv, KeyAlgorithm::from_public_key(public_key))?;
    let mut payment = unsigned.payment().clone();
    payment.txn_signature = Some(signature);

    let (blob, hash) = payment.raw().map_err(|e| {
        warn!(error = %e, "encode ripple tx error");
        RouterError::from(e)
    })?;

    Ok(SignedTransaction { payment, blob, hash })
}

#[cfg(test)]
mod tests {
    use super::super::builder::{new_unsigned_payment_transaction, PaymentParams};
    use super::super::hash::{sha512_half, TRANSACTION_ID_PREFIX};
    use super::*;
    use crate::codec::Amount;
    use crate::network::AccountId;
    use router_lib::signer::LocalKey;
    use router_lib::signature::{signature_to_rsv, verify_signature};

    const SECP_KEY: &str = "1111111111111111111111111111111111111111111111111111111111111111";
    const ED_KEY: &str = "ED2222222222222222222222222222222222222222222222222222222222222222";

    fn build(key: &LocalKey) -> UnsignedTransaction {
        let public_key = key.public_key();
        let receiver = AccountId([0x33; 20]).to_address();
        new_unsigned_payment_transaction(PaymentParams::new(&public_key, 9, &receiver, Amount::Native(25_000_000), "10")).unwrap()
    }

    fn sign(key: &LocalKey, unsigned: &UnsignedTransaction) -> String {
        let signature = key.sign(unsigned.signing_hash(), &unsigned.signing_message()).unwrap();
        signature_to_rsv(&signature, key.algorithm()).unwrap()
    }

    #[test]
    fn test_finish_ecdsa() {
        let key = LocalKey::from_hex(SECP_KEY).unwrap();
        let unsigned = build(&key);
        let rsv = sign(&key, &unsigned);
        assert_eq!(rsv.len(), 130);

        let signed = make_signed_transaction(&key.public_key(), &rsv, &unsigned).unwrap();
        let signature = signed.payment().txn_signature.clone().unwrap();
        verify_signature(&key.public_key(), unsigned.signing_hash(), &unsigned.signing_message(), &signature).unwrap();

        assert_eq!(signed.hash(), &sha512_half(&[&TRANSACTION_ID_PREFIX, signed.blob()]));
        assert_eq!(signed.hash_hex().len(), 64);
        // the signature field is present in the wire form only
        assert!(signed.blob().len() > unsigned.signing_payload().len() + signature.len());
    }

    #[test]
    fn test_finish_eddsa() {
        let key = LocalKey::from_hex(ED_KEY).unwrap();
        let unsigned = build(&key);
        let rsv = sign(&key, &unsigned);
        assert_eq!(rsv.len(), 128);

        let signed = make_signed_transaction(&key.public_key(), &rsv, &unsigned).unwrap();
        assert_eq!(signed.payment().txn_signature.as_ref().unwrap().len(), 64);
        // 0x74 0x40 is the TxnSignature header and its 64-byte length
        assert!(signed.blob_hex().contains(&format!("7440{}", rsv)));
    }

    #[test]
    fn test_rejects_foreign_public_key() {
        let key = LocalKey::from_hex(SECP_KEY).unwrap();
        let other = LocalKey::from_hex(ED_KEY).unwrap();
        let unsigned = build(&key);
        let rsv = sign(&key, &unsigned);
        let err = make_signed_transaction(&other.public_key(), &rsv, &unsigned).unwrap_err();
        assert!(matches!(err, RouterError::PublicKeyMismatch { .. }));
    }

    #[test]
    fn test_rejects_malformed_rsv() {
        let key = LocalKey::from_hex(SECP_KEY).unwrap();
        let unsigned = build(&key);
        let err = make_signed_transaction(&key.public_key(), "00", &unsigned).unwrap_err();
        assert!(matches!(err, RouterError::InvalidSignature(_)));
    }
}
