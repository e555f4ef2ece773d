use candid::{CandidType, Nat};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

#[derive(CandidType, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapType {
    Erc20Swap,
    NftSwap,
    AnyCallSwap,
}

impl Display for SwapType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SwapType::Erc20Swap => write!(f, "erc20swap"),
            SwapType::NftSwap => write!(f, "nftswap"),
            SwapType::AnyCallSwap => write!(f, "anycallswap"),
        }
    }
}

#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20SwapInfo {
    /// Token address on the source chain.
    pub token: String,
    /// Router-wide token identifier (e.g. "USDC").
    pub token_id: String,
}

/// Sequence and fee resolved for a swap on its first build attempt.
///
/// Once `Built`, the values are reused verbatim on every retry so that a
/// re-signed transaction never consumes a fresh sequence.
#[derive(CandidType, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxExtra {
    #[default]
    NotBuilt,
    Built { sequence: u64, fee: String },
}

impl TxExtra {
    pub fn is_built(&self) -> bool {
        matches!(self, TxExtra::Built { .. })
    }

    pub fn sequence(&self) -> Option<u64> {
        match self {
            TxExtra::Built { sequence, .. } => Some(*sequence),
            TxExtra::NotBuilt => None,
        }
    }

    pub fn fee(&self) -> Option<&str> {
        match self {
            TxExtra::Built { fee, .. } => Some(fee.as_str()),
            TxExtra::NotBuilt => None,
        }
    }
}

#[derive(CandidType, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTxArgs {
    pub swap_id: String,
    pub swap_type: SwapType,
    pub from_chain_id: String,
    pub to_chain_id: String,
    /// Sender on the destination chain, the router's MPC-controlled address.
    pub from: String,
    /// Receiver on the destination chain.
    pub bind: String,
    pub origin_from: String,
    pub origin_tx_to: String,
    pub origin_value: Nat,
    pub erc20_swap_info: Option<Erc20SwapInfo>,
    pub extra: TxExtra,
}

/// Context attached to every signing request so oracle operators can trace
/// a signature back to the swap it pays out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraArgs {
    pub swap_id: String,
    pub from_chain_id: String,
    pub to_chain_id: String,
    pub token_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<String>,
}

impl BuildTxArgs {
    pub fn token_id(&self) -> &str {
        self.erc20_swap_info.as_ref().map(|info| info.token_id.as_str()).unwrap_or_default()
    }

    pub fn extra_args(&self) -> ExtraArgs {
        ExtraArgs {
            swap_id: self.swap_id.clone(),
            from_chain_id: self.from_chain_id.clone(),
            to_chain_id: self.to_chain_id.clone(),
            token_id: self.token_id().to_string(),
            sequence: self.extra.sequence(),
            fee: self.extra.fee().map(str::to_string),
        }
    }

    /// JSON form of [`ExtraArgs`], sent to the signing oracle as message context.
    pub fn message_context(&self) -> String {
        serde_json::to_string(&self.extra_args()).unwrap_or_default()
    }
}
