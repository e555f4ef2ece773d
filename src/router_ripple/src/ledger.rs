//! Read access to the ledger, plus the wire shapes of the node RPC replies
//! a client implementation decodes.

use async_trait::async_trait;
use router_lib::RouterError;
use serde::{Deserialize, Serialize};

use super::codec::{Currency, IssuedValue};

/// Error code nodes return for an account that has never been funded.
pub const ACCOUNT_NOT_FOUND: &str = "actNotFound";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub account: String,
    /// Native balance in drops.
    pub balance: u64,
    pub sequence: u32,
}

/// Ledger queries used by the build pipeline. `Ok(None)` means the account
/// (or trust line) does not exist; `Err` is a failed query.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn get_account(&self, address: &str) -> Result<Option<AccountInfo>, RouterError>;

    async fn get_native_balance(&self, address: &str) -> Result<Option<u64>, RouterError> {
        Ok(self.get_account(address).await?.map(|account| account.balance))
    }

    async fn get_issued_balance(&self, address: &str, currency: &str, issuer: &str) -> Result<Option<IssuedValue>, RouterError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccountRoot {
    pub account: String,
    pub balance: String,
    pub sequence: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountInfoResult {
    #[serde(default)]
    pub account_data: Option<AccountRoot>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl AccountInfoResult {
    /// Decode the `result` object of an `account_info` reply.
    pub fn into_account_info(self) -> Result<Option<AccountInfo>, RouterError> {
        match (self.account_data, self.error) {
            (_, Some(error)) if error == ACCOUNT_NOT_FOUND => Ok(None),
            (_, Some(error)) => Err(RouterError::Rpc(format!(
                "account_info: {} {}",
                error,
                self.error_message.unwrap_or_default()
            ))),
            (Some(root), None) => {
                let balance = root
                    .balance
                    .parse::<u64>()
                    .map_err(|e| RouterError::Rpc(format!("account_info: bad balance {}: {}", root.balance, e)))?;
                Ok(Some(AccountInfo {
                    account: root.account,
                    balance,
                    sequence: root.sequence,
                }))
            }
            (None, None) => Err(RouterError::Rpc("account_info: missing account_data".to_string())),
        }
    }
}

/// One entry of an `account_lines` reply. `account` is the counterparty,
/// the issuer when the line holds an issued asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustLine {
    pub account: String,
    pub balance: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLinesResult {
    #[serde(default)]
    pub lines: Vec<TrustLine>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AccountLinesResult {
    /// Balance of the line for (currency, issuer), `None` when there is no such line.
    pub fn issued_balance(&self, currency: &str, issuer: &str) -> Result<Option<IssuedValue>, RouterError> {
        if let Some(error) = &self.error {
            if error == ACCOUNT_NOT_FOUND {
                return Ok(None);
            }
            return Err(RouterError::Rpc(format!("account_lines: {}", error)));
        }
        let wanted = Currency::from_code(currency)?;
        for line in &self.lines {
            let same_currency = Currency::from_code(&line.currency).map(|c| c == wanted).unwrap_or(false);
            if same_currency && line.account == issuer {
                let balance = line.balance.parse::<IssuedValue>()?;
                return Ok(Some(balance));
            }
        }
        Ok(None)
    }
}
