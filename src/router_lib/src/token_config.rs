use candid::CandidType;
use serde::{Deserialize, Serialize};

pub const NATIVE_CURRENCY: &str = "XRP";

/// Ledger-specific token identity for Ripple-style chains.
#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RippleExtra {
    pub currency: String,
    #[serde(default)]
    pub issuer: String,
}

impl RippleExtra {
    pub fn native() -> Self {
        Self {
            currency: NATIVE_CURRENCY.to_string(),
            issuer: String::new(),
        }
    }

    pub fn is_native(&self) -> bool {
        self.currency == NATIVE_CURRENCY
    }
}

#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    pub token_id: String,
    pub decimals: u8,
    pub contract_address: String,
    #[serde(default)]
    pub ripple_extra: Option<RippleExtra>,
}

impl TokenConfig {
    pub fn is_native(&self) -> bool {
        self.ripple_extra.as_ref().is_some_and(RippleExtra::is_native)
    }
}
