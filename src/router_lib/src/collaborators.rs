//! Router-owned services the chain adapters consult. They are injected by the
//! router at setup; adapters never reach for global state.

use candid::Nat;

use crate::error::RouterError;
use crate::token_config::TokenConfig;

/// Inputs of the router's cross-chain value calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapValueQuery<'a> {
    pub token_id: &'a str,
    pub to_chain_id: &'a str,
    pub origin_value: &'a Nat,
    pub from_decimals: u8,
    pub to_decimals: u8,
    pub origin_from: &'a str,
    pub origin_tx_to: &'a str,
}

pub trait RouteResolver: Send + Sync {
    /// Multichain token key of `token_id` on `to_chain_id`.
    fn resolve_destination_token(&self, token_id: &str, to_chain_id: &str) -> Option<String>;

    fn get_token_config(&self, chain_id: &str, token: &str) -> Option<TokenConfig>;

    /// Destination amount in the destination token's smallest unit, after fees
    /// and decimal rescaling.
    fn calc_swap_value(&self, query: &SwapValueQuery<'_>) -> Nat;
}

pub trait ChainRegistry: Send + Sync {
    fn is_supported_chain(&self, chain_id: &str) -> bool;

    /// MPC-controlled address allowed to send `token_id` on `chain_id`.
    fn get_router_signer(&self, token_id: &str, chain_id: &str) -> Result<String, RouterError>;

    /// Hex public key registered for an MPC address.
    fn get_public_key(&self, address: &str) -> Option<String>;
}

/// Reconciles a freshly fetched account sequence with sequences already
/// handed out but not yet confirmed on-ledger.
pub trait NonceReconciler: Send + Sync {
    /// Returns a usable sequence, never lower than `fetched`.
    fn adjust(&self, address: &str, fetched: u64) -> u64;
}
