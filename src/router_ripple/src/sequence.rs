use router_lib::collaborators::NonceReconciler;
use router_lib::{BuildTxArgs, RouterError, TxExtra};
use std::sync::Arc;
use tracing::{debug, warn};

use super::ledger::LedgerClient;

/// Transaction fee in drops.
pub const DEFAULT_FEE_DROPS: u64 = 10;

/// Hands out the next usable sequence per sender and pins it, with the fee,
/// into the request's extra slot.
pub struct SequenceAllocator {
    ledger: Arc<dyn LedgerClient>,
    reconciler: Arc<dyn NonceReconciler>,
    default_fee: u64,
}

impl SequenceAllocator {
    pub fn new(ledger: Arc<dyn LedgerClient>, reconciler: Arc<dyn NonceReconciler>, default_fee: Option<u64>) -> Self {
        Self {
            ledger,
            reconciler,
            default_fee: default_fee.unwrap_or(DEFAULT_FEE_DROPS),
        }
    }

    pub fn default_fee(&self) -> String {
        self.default_fee.to_string()
    }

    /// Raw on-ledger sequence. An account that does not exist yet starts at 0.
    pub async fn get_pool_nonce(&self, address: &str) -> Result<u64, RouterError> {
        let account = self.ledger.get_account(address).await.map_err(|e| RouterError::AccountUnavailable {
            address: address.to_string(),
            reason: e.to_string(),
        })?;
        Ok(account.map(|info| u64::from(info.sequence)).unwrap_or(0))
    }

    /// On-ledger sequence reconciled against sequences already handed out.
    pub async fn get_seq(&self, address: &str) -> Result<u64, RouterError> {
        let fetched = self.get_pool_nonce(address).await?;
        let adjusted = self.reconciler.adjust(address, fetched);
        if adjusted < fetched {
            warn!(address, fetched, adjusted, "nonce reconciler went backwards, using ledger sequence");
            return Ok(fetched);
        }
        Ok(adjusted)
    }

    /// Sequence and fee for `args`, allocated on first use and reused verbatim afterwards.
    pub async fn resolve_extra(&self, args: &mut BuildTxArgs) -> Result<(u64, String), RouterError> {
        if let TxExtra::Built { sequence, fee } = &args.extra {
            debug!(swap_id = %args.swap_id, sequence, fee = %fee, "reuse tx extra");
            return Ok((*sequence, fee.clone()));
        }

        let sequence = self.get_seq(&args.from).await?;
        let fee = self.default_fee();
        args.extra = TxExtra::Built {
            sequence,
            fee: fee.clone(),
        };
        debug!(swap_id = %args.swap_id, sequence, fee = %fee, "allocate tx extra");
        Ok((sequence, fee))
    }
}
