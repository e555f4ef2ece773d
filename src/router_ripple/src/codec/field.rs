use num_enum::IntoPrimitive;

/// Serialized type codes of the ledger's binary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, IntoPrimitive)]
#[repr(u8)]
pub enum TypeCode {
    UInt16 = 1,
    UInt32 = 2,
    UInt64 = 3,
    Hash128 = 4,
    Hash256 = 5,
    Amount = 6,
    Blob = 7,
    AccountId = 8,
    StObject = 14,
    StArray = 15,
    UInt8 = 16,
    Hash160 = 17,
    PathSet = 18,
    Vector256 = 19,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: &'static str,
    pub type_code: TypeCode,
    pub field_code: u8,
    /// Part of the data that gets signed.
    pub is_signing: bool,
}

impl Field {
    const fn new(name: &'static str, type_code: TypeCode, field_code: u8) -> Self {
        Self {
            name,
            type_code,
            field_code,
            is_signing: true,
        }
    }

    const fn non_signing(name: &'static str, type_code: TypeCode, field_code: u8) -> Self {
        Self {
            name,
            type_code,
            field_code,
            is_signing: false,
        }
    }

    /// Canonical ordering key: fields are serialized sorted by type, then field code.
    pub fn ordinal(&self) -> (u8, u8) {
        (self.type_code.into(), self.field_code)
    }

    /// One to three byte field ID.
    pub fn header(&self) -> Vec<u8> {
        let type_code: u8 = self.type_code.into();
        let field_code = self.field_code;
        match (type_code < 16, field_code < 16) {
            (true, true) => vec![(type_code << 4) | field_code],
            (true, false) => vec![type_code << 4, field_code],
            (false, true) => vec![field_code, type_code],
            (false, false) => vec![0, type_code, field_code],
        }
    }
}

pub const TRANSACTION_TYPE: Field = Field::new("TransactionType", TypeCode::UInt16, 2);
pub const FLAGS: Field = Field::new("Flags", TypeCode::UInt32, 2);
pub const SEQUENCE: Field = Field::new("Sequence", TypeCode::UInt32, 4);
pub const DESTINATION_TAG: Field = Field::new("DestinationTag", TypeCode::UInt32, 14);
pub const AMOUNT: Field = Field::new("Amount", TypeCode::Amount, 1);
pub const FEE: Field = Field::new("Fee", TypeCode::Amount, 8);
pub const SIGNING_PUB_KEY: Field = Field::new("SigningPubKey", TypeCode::Blob, 3);
pub const TXN_SIGNATURE: Field = Field::non_signing("TxnSignature", TypeCode::Blob, 4);
pub const MEMO_TYPE: Field = Field::new("MemoType", TypeCode::Blob, 12);
pub const MEMO_DATA: Field = Field::new("MemoData", TypeCode::Blob, 13);
pub const ACCOUNT: Field = Field::new("Account", TypeCode::AccountId, 1);
pub const DESTINATION: Field = Field::new("Destination", TypeCode::AccountId, 3);
pub const OBJECT_END_MARKER: Field = Field::new("ObjectEndMarker", TypeCode::StObject, 1);
pub const MEMO: Field = Field::new("Memo", TypeCode::StObject, 10);
pub const ARRAY_END_MARKER: Field = Field::new("ArrayEndMarker", TypeCode::StArray, 1);
pub const MEMOS: Field = Field::new("Memos", TypeCode::StArray, 9);
pub const PATHS: Field = Field::new("Paths", TypeCode::PathSet, 1);
