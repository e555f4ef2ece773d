//! Reserve and balance-sufficiency checks run before a payout is built.

use router_lib::config::ChainConfig;
use router_lib::RouterError;
use tracing::{debug, warn};

use super::codec::IssuedValue;
use super::ledger::LedgerClient;

/// Ledger account reserve: 10 XRP.
pub const DEFAULT_ACCOUNT_RESERVE: u64 = 10_000_000;
/// Minimum balance kept on the sender on top of the payment: 0.1 XRP.
pub const DEFAULT_MIN_RESERVE_FEE: u64 = 100_000;

/// Reserve amounts in drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservePolicy {
    pub account_reserve: u64,
    pub min_reserve_fee: u64,
}

impl Default for ReservePolicy {
    fn default() -> Self {
        Self {
            account_reserve: DEFAULT_ACCOUNT_RESERVE,
            min_reserve_fee: DEFAULT_MIN_RESERVE_FEE,
        }
    }
}

impl ReservePolicy {
    pub fn from_chain_config(config: &ChainConfig) -> Self {
        Self {
            account_reserve: config.account_reserve.unwrap_or(DEFAULT_ACCOUNT_RESERVE),
            min_reserve_fee: config.min_reserve_fee.unwrap_or(DEFAULT_MIN_RESERVE_FEE),
        }
    }
}

/// How a native balance changes before it is held against the reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceChange {
    /// Sender side: the amount leaves the account.
    Pay(u64),
    /// Receiver side: the amount arrives.
    Receive(u64),
    /// The balance alone must already meet the reserve.
    Hold,
}

/// `true` when `balance` after `change` still meets `reserve`.
pub fn meets_reserve(balance: u64, change: BalanceChange, reserve: u64) -> bool {
    let balance = i128::from(balance);
    let remain = match change {
        BalanceChange::Pay(amount) => balance - i128::from(amount),
        BalanceChange::Receive(amount) => balance + i128::from(amount),
        BalanceChange::Hold => balance,
    };
    remain >= i128::from(reserve)
}

/// Native balance in drops; an account that does not exist holds nothing.
async fn native_balance(ledger: &dyn LedgerClient, account: &str) -> Result<u64, RouterError> {
    match ledger.get_native_balance(account).await {
        Ok(balance) => Ok(balance.unwrap_or(0)),
        Err(e) => {
            warn!(address = account, error = %e, "get native balance failed");
            Err(RouterError::BalanceUnavailable {
                address: account.to_string(),
                reason: e.to_string(),
            })
        }
    }
}

pub async fn check_native_balance(
    ledger: &dyn LedgerClient,
    account: &str,
    change: BalanceChange,
    account_reserve: u64,
) -> Result<(), RouterError> {
    let balance = native_balance(ledger, account).await?;
    debug!(address = account, balance, ?change, account_reserve, "check native balance");

    if meets_reserve(balance, change, account_reserve) {
        return Ok(());
    }
    match change {
        BalanceChange::Pay(_) => Err(RouterError::InsufficientNativeSender(account.to_string())),
        BalanceChange::Receive(_) | BalanceChange::Hold => Err(RouterError::InsufficientNativeReceiver(account.to_string())),
    }
}

/// The sender's trust line for (currency, issuer) must cover `amount`.
pub async fn check_non_native_balance(
    ledger: &dyn LedgerClient,
    currency: &str,
    issuer: &str,
    account: &str,
    amount: &IssuedValue,
) -> Result<(), RouterError> {
    let balance = ledger
        .get_issued_balance(account, currency, issuer)
        .await
        .map_err(|e| {
            warn!(address = account, currency, issuer, error = %e, "get trust line balance failed");
            RouterError::BalanceUnavailable {
                address: account.to_string(),
                reason: e.to_string(),
            }
        })?
        .unwrap_or_default();
    debug!(address = account, currency, issuer, balance = %balance, amount = %amount, "check issued balance");

    if balance < *amount {
        return Err(RouterError::InsufficientIssued {
            currency: currency.to_string(),
            issuer: issuer.to_string(),
            account: account.to_string(),
        });
    }
    Ok(())
}
