//! Unsigned Payment construction.

use router_lib::RouterError;
use tracing::{info, warn};

use super::super::codec::{parse_native_drops, Amount, PathSet};
use super::super::network::{AccountId, RippleNetwork};
use super::payment::{
    Memo, Payment, TF_FULLY_CANONICAL_SIG, TF_LIMIT_QUALITY, TF_NO_DIRECT_RIPPLE, TF_PARTIAL_PAYMENT,
};
use super::hash::SIGNING_PREFIX;

/// Inputs of [`new_unsigned_payment_transaction`].
#[derive(Debug, Clone)]
pub struct PaymentParams<'a> {
    /// Ledger form of the signing key (33 bytes).
    pub public_key: &'a [u8],
    pub sequence: u64,
    pub destination: &'a str,
    pub destination_tag: Option<u32>,
    pub amount: Amount,
    /// Integer drops or a decimal XRP value.
    pub fee: &'a str,
    /// Carried as a `BIND` memo when present.
    pub memo: Option<&'a str>,
    /// Path set in `step=>step,step` notation.
    pub paths: Option<&'a str>,
    pub no_direct: bool,
    /// Partial and limit should stay off for router payouts.
    pub partial: bool,
    pub limit: bool,
}

impl<'a> PaymentParams<'a> {
    pub fn new(public_key: &'a [u8], sequence: u64, destination: &'a str, amount: Amount, fee: &'a str) -> Self {
        Self {
            public_key,
            sequence,
            destination,
            destination_tag: None,
            amount,
            fee,
            memo: None,
            paths: None,
            no_direct: false,
            partial: false,
            limit: false,
        }
    }
}

/// A Payment together with its signing data. The payment cannot change once
/// the signing hash has been computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    payment: Payment,
    signing_hash: [u8; 32],
    signing_payload: Vec<u8>,
}

impl UnsignedTransaction {
    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    pub fn signing_hash(&self) -> &[u8; 32] {
        &self.signing_hash
    }

    pub fn signing_payload(&self) -> &[u8] {
        &self.signing_payload
    }

    /// Signing prefix ‖ payload, what EdDSA keys sign.
    pub fn signing_message(&self) -> Vec<u8> {
        let mut message = Vec::with_capacity(SIGNING_PREFIX.len() + self.signing_payload.len());
        message.extend_from_slice(&SIGNING_PREFIX);
        message.extend_from_slice(&self.signing_payload);
        message
    }

    pub fn public_key(&self) -> &[u8] {
        &self.payment.signing_pub_key
    }

    pub fn destination(&self) -> &AccountId {
        &self.payment.destination
    }
}

pub fn new_unsigned_payment_transaction(params: PaymentParams<'_>) -> Result<UnsignedTransaction, RouterError> {
    if params.partial {
        warn!(destination = params.destination, "building payment with partial flag");
    }
    if params.limit {
        warn!(destination = params.destination, "building payment with limit flag");
    }

    let account = RippleNetwork::account_id_from_public_key(params.public_key).map_err(|e| RouterError::InvalidPublicKey {
        key: hex::encode(params.public_key),
        reason: e.to_string(),
    })?;
    let destination: AccountId = params
        .destination
        .parse()
        .map_err(|_| RouterError::InvalidReceiver(params.destination.to_string()))?;
    let sequence = u32::try_from(params.sequence).map_err(|_| RouterError::SequenceOverflow(params.sequence))?;
    let fee = parse_native_drops(params.fee).map_err(|_| RouterError::MalformedFee(params.fee.to_string()))?;
    let paths = params.paths.filter(|p| !p.is_empty()).map(str::parse::<PathSet>).transpose()?;

    let mut flags = TF_FULLY_CANONICAL_SIG;
    if params.no_direct {
        flags |= TF_NO_DIRECT_RIPPLE;
    }
    if params.partial {
        flags |= TF_PARTIAL_PAYMENT;
    }
    if params.limit {
        flags |= TF_LIMIT_QUALITY;
    }

    let payment = Payment {
        account,
        destination,
        amount: params.amount,
        destination_tag: params.destination_tag,
        memos: params.memo.filter(|m| !m.is_empty()).map(Memo::bind).into_iter().collect(),
        paths,
        flags,
        sequence,
        fee,
        signing_pub_key: params.public_key.to_vec(),
        txn_signature: None,
    };

    let signing_payload = payment.signing_payload()?;
    let signing_hash = payment.signing_hash()?;
    info!(
        signing_hash = %hex::encode_upper(signing_hash),
        blob = %hex::encode_upper(&signing_payload),
        "build unsigned tx success"
    );

    Ok(UnsignedTransaction {
        payment,
        signing_hash,
        signing_payload,
    })
}
