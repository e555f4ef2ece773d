use num_enum::IntoPrimitive;

use super::super::codec::field::{
    Field, ACCOUNT, AMOUNT, ARRAY_END_MARKER, DESTINATION, DESTINATION_TAG, FEE, FLAGS, MEMO, MEMOS, MEMO_DATA, MEMO_TYPE,
    OBJECT_END_MARKER, PATHS, SEQUENCE, SIGNING_PUB_KEY, TRANSACTION_TYPE, TXN_SIGNATURE,
};
use super::super::codec::{Amount, BinarySerializer, PathSet};
use super::super::error::RippleError;
use super::super::network::AccountId;
use super::hash::{sha512_half, SIGNING_PREFIX, TRANSACTION_ID_PREFIX};

pub const TF_FULLY_CANONICAL_SIG: u32 = 0x8000_0000;
pub const TF_NO_DIRECT_RIPPLE: u32 = 0x0001_0000;
pub const TF_PARTIAL_PAYMENT: u32 = 0x0002_0000;
pub const TF_LIMIT_QUALITY: u32 = 0x0004_0000;

/// Memo type attached to router payouts, the memo data carries the bind value.
pub const MEMO_TYPE_BIND: &[u8] = b"BIND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(u16)]
pub enum TransactionType {
    Payment = 0,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memo {
    pub memo_type: Vec<u8>,
    pub memo_data: Vec<u8>,
}

impl Memo {
    pub fn bind(data: &str) -> Self {
        Self {
            memo_type: MEMO_TYPE_BIND.to_vec(),
            memo_data: data.as_bytes().to_vec(),
        }
    }
}

enum FieldValue<'a> {
    UInt16(u16),
    UInt32(u32),
    Amount(&'a Amount),
    Blob(&'a [u8]),
    Account(&'a AccountId),
    Memos(&'a [Memo]),
    Paths(&'a PathSet),
}

/// A ledger Payment transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub account: AccountId,
    pub destination: AccountId,
    pub amount: Amount,
    pub destination_tag: Option<u32>,
    pub memos: Vec<Memo>,
    pub paths: Option<PathSet>,
    pub flags: u32,
    pub sequence: u32,
    /// Fee in drops.
    pub fee: i64,
    pub signing_pub_key: Vec<u8>,
    pub txn_signature: Option<Vec<u8>>,
}

impl Payment {
    pub fn transaction_type(&self) -> TransactionType {
        TransactionType::Payment
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag == flag
    }

    fn fields<'a>(&'a self, fee: &'a Amount) -> Vec<(Field, FieldValue<'a>)> {
        let mut fields = Vec::with_capacity(12);
        fields.push((TRANSACTION_TYPE, FieldValue::UInt16(self.transaction_type().into())));
        fields.push((FLAGS, FieldValue::UInt32(self.flags)));
        fields.push((SEQUENCE, FieldValue::UInt32(self.sequence)));
        if let Some(tag) = self.destination_tag {
            fields.push((DESTINATION_TAG, FieldValue::UInt32(tag)));
        }
        fields.push((AMOUNT, FieldValue::Amount(&self.amount)));
        fields.push((FEE, FieldValue::Amount(fee)));
        fields.push((SIGNING_PUB_KEY, FieldValue::Blob(&self.signing_pub_key)));
        if let Some(signature) = &self.txn_signature {
            fields.push((TXN_SIGNATURE, FieldValue::Blob(signature)));
        }
        fields.push((ACCOUNT, FieldValue::Account(&self.account)));
        fields.push((DESTINATION, FieldValue::Account(&self.destination)));
        if !self.memos.is_empty() {
            fields.push((MEMOS, FieldValue::Memos(&self.memos)));
        }
        if let Some(paths) = self.paths.as_ref().filter(|paths| !paths.is_empty()) {
            fields.push((PATHS, FieldValue::Paths(paths)));
        }
        fields
    }

    /// Canonical binary form. With `for_signing` set, non-signing fields
    /// (the signature) are left out.
    pub fn serialize(&self, for_signing: bool) -> Result<Vec<u8>, RippleError> {
        let fee = Amount::native(self.fee)?;
        let mut fields = self.fields(&fee);
        fields.retain(|(field, _)| field.is_signing || !for_signing);
        fields.sort_by_key(|(field, _)| field.ordinal());

        let mut serializer = BinarySerializer::new();
        for (field, value) in &fields {
            write_value(&mut serializer, field, value)?;
        }
        Ok(serializer.into_bytes())
    }

    pub fn signing_payload(&self) -> Result<Vec<u8>, RippleError> {
        self.serialize(true)
    }

    pub fn signing_hash(&self) -> Result<[u8; 32], RippleError> {
        Ok(sha512_half(&[&SIGNING_PREFIX, &self.signing_payload()?]))
    }

    /// Full serialization and the transaction hash computed from it.
    pub fn raw(&self) -> Result<(Vec<u8>, [u8; 32]), RippleError> {
        let blob = self.serialize(false)?;
        let hash = sha512_half(&[&TRANSACTION_ID_PREFIX, &blob]);
        Ok((blob, hash))
    }
}

fn write_value(serializer: &mut BinarySerializer, field: &Field, value: &FieldValue<'_>) -> Result<(), RippleError> {
    match value {
        FieldValue::UInt16(v) => serializer.write_u16(field, *v),
        FieldValue::UInt32(v) => serializer.write_u32(field, *v),
        FieldValue::Amount(amount) => {
            serializer.write_field(field);
            serializer.write_raw(&amount.to_bytes()?);
        }
        FieldValue::Blob(bytes) => serializer.write_vl(field, bytes)?,
        FieldValue::Account(account) => serializer.write_vl(field, account.as_bytes())?,
        FieldValue::Memos(memos) => {
            serializer.write_field(field);
            for memo in memos.iter() {
                serializer.write_field(&MEMO);
                serializer.write_vl(&MEMO_TYPE, &memo.memo_type)?;
                serializer.write_vl(&MEMO_DATA, &memo.memo_data)?;
                serializer.write_field(&OBJECT_END_MARKER);
            }
            serializer.write_field(&ARRAY_END_MARKER);
        }
        FieldValue::Paths(paths) => {
            serializer.write_field(field);
            serializer.write_raw(&paths.encode()?);
        }
    }
    Ok(())
}
