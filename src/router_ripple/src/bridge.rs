//! Ripple payout adapter: builds, signs and verifies the payment that settles
//! a swap on the ledger.

use router_lib::collaborators::{ChainRegistry, NonceReconciler, RouteResolver, SwapValueQuery};
use router_lib::config::{ChainConfig, RouterConfig};
use router_lib::signature::decode_hex;
use router_lib::signer::{LocalKey, LocalKeySigner, OracleSigner, Signer, SigningOracle};
use router_lib::{BuildTxArgs, RouterError, SwapType};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::amount::get_payment_amount;
use super::balance::{check_native_balance, check_non_native_balance, BalanceChange, ReservePolicy};
use super::codec::Amount;
use super::ledger::LedgerClient;
use super::network::RippleNetwork;
use super::sequence::SequenceAllocator;
use super::signing::SigningSession;
use super::transaction::{self, new_unsigned_payment_transaction, PaymentParams, SignedTransaction, UnsignedTransaction};

/// External services the bridge depends on.
pub struct RippleCollaborators {
    pub routes: Arc<dyn RouteResolver>,
    pub registry: Arc<dyn ChainRegistry>,
    pub ledger: Arc<dyn LedgerClient>,
    pub reconciler: Arc<dyn NonceReconciler>,
    pub oracle: Arc<dyn SigningOracle>,
}

pub struct RippleBridge {
    chain_config: ChainConfig,
    router_config: Arc<RouterConfig>,
    routes: Arc<dyn RouteResolver>,
    registry: Arc<dyn ChainRegistry>,
    ledger: Arc<dyn LedgerClient>,
    sequences: SequenceAllocator,
    signer: Arc<dyn Signer>,
    reserve: ReservePolicy,
}

impl RippleBridge {
    /// Set up the adapter for `chain_id`. The signer is chosen here, once:
    /// the configured private key when `sign_with_private_key` is on, the
    /// signing oracle otherwise.
    pub fn new(chain_id: &str, router_config: Arc<RouterConfig>, collaborators: RippleCollaborators) -> Result<Self, RouterError> {
        let chain_config = router_config
            .chain(chain_id)
            .cloned()
            .ok_or_else(|| RouterError::UnsupportedChain(chain_id.to_string()))?;

        let signer: Arc<dyn Signer> = if router_config.sign_with_private_key {
            let key = router_config
                .signer_private_key(chain_id)
                .ok_or_else(|| RouterError::MissingPrivateKey(chain_id.to_string()))?;
            let signer = LocalKeySigner::from_hex(key)?;
            info!(chain_id, public_key = %hex::encode(signer.public_key()), "sign with private key");
            Arc::new(signer)
        } else {
            Arc::new(OracleSigner::new(collaborators.oracle))
        };

        let sequences = SequenceAllocator::new(collaborators.ledger.clone(), collaborators.reconciler, chain_config.default_fee);
        let reserve = ReservePolicy::from_chain_config(&chain_config);

        Ok(Self {
            chain_config,
            router_config,
            routes: collaborators.routes,
            registry: collaborators.registry,
            ledger: collaborators.ledger,
            sequences,
            signer,
            reserve,
        })
    }

    pub fn chain_config(&self) -> &ChainConfig {
        &self.chain_config
    }

    pub fn chain_id(&self) -> &str {
        &self.chain_config.chain_id
    }

    pub fn is_valid_address(&self, address: &str) -> bool {
        RippleNetwork::is_valid_address(address)
    }

    fn mpc_public_key(&self, address: &str) -> Result<Vec<u8>, RouterError> {
        let public_key = self
            .registry
            .get_public_key(address)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| RouterError::MissingPublicKey(address.to_string()))?;
        decode_hex(&public_key).map_err(|e| RouterError::InvalidPublicKey {
            key: public_key.clone(),
            reason: e.to_string(),
        })
    }

    /// Build the unsigned payout for `args`.
    ///
    /// Sequence and fee are allocated on the first build and stored in
    /// `args.extra`; a retry with the same args reuses them.
    pub async fn build_transaction(&self, args: &mut BuildTxArgs) -> Result<UnsignedTransaction, RouterError> {
        let chain_id = self.chain_id();
        if !self.registry.is_supported_chain(chain_id) {
            return Err(RouterError::UnsupportedChain(chain_id.to_string()));
        }
        if !self.router_config.is_test_mode && args.to_chain_id != chain_id {
            return Err(RouterError::ToChainIdMismatch {
                have: args.to_chain_id.clone(),
                want: chain_id.to_string(),
            });
        }
        if args.from.is_empty() {
            return Err(RouterError::EmptySender);
        }

        let router_mpc = self.registry.get_router_signer(args.token_id(), chain_id)?;
        if !args.from.eq_ignore_ascii_case(&router_mpc) {
            error!(have = %args.from, want = %router_mpc, "build tx mpc mismatch");
            return Err(RouterError::SenderMismatch {
                have: args.from.clone(),
                want: router_mpc,
            });
        }

        if args.swap_type != SwapType::Erc20Swap {
            return Err(RouterError::SwapTypeNotSupported(args.swap_type.to_string()));
        }

        let public_key = self.mpc_public_key(&args.from)?;

        let swap_info = args
            .erc20_swap_info
            .clone()
            .ok_or_else(|| RouterError::MissingTokenConfig(format!("swap {} has no token info", args.swap_id)))?;
        let multichain_token = self
            .routes
            .resolve_destination_token(&swap_info.token_id, &args.to_chain_id)
            .ok_or_else(|| {
                warn!(token_id = %swap_info.token_id, chain_id = %args.to_chain_id, "get multichain token failed");
                RouterError::MissingTokenConfig(swap_info.token_id.clone())
            })?;
        let token = self
            .routes
            .get_token_config(chain_id, &multichain_token)
            .ok_or_else(|| RouterError::MissingTokenConfig(multichain_token.clone()))?;

        let (receiver, amount) = self.get_receiver_and_amount(args, &swap_info.token, token.decimals)?;
        let payment_amount = get_payment_amount(&amount, &token)?;

        match (&payment_amount, token.ripple_extra.as_ref()) {
            (Amount::Native(drops), _) => {
                let drops = *drops as u64;
                let need = drops.saturating_add(self.reserve.min_reserve_fee);
                check_native_balance(self.ledger.as_ref(), &args.from, BalanceChange::Pay(need), self.reserve.account_reserve).await?;
                check_native_balance(self.ledger.as_ref(), &receiver, BalanceChange::Receive(drops), self.reserve.account_reserve)
                    .await?;
            }
            (Amount::Issued { value, .. }, Some(extra)) => {
                check_native_balance(self.ledger.as_ref(), &receiver, BalanceChange::Hold, self.reserve.account_reserve).await?;
                check_non_native_balance(self.ledger.as_ref(), &extra.currency, &extra.issuer, &args.from, value).await?;
            }
            (Amount::Issued { .. }, None) => return Err(RouterError::MissingTokenConfig(multichain_token)),
        }

        let (sequence, fee) = self.sequences.resolve_extra(args).await?;
        debug!(swap_id = %args.swap_id, sequence, fee = %fee, amount = %payment_amount, receiver = %receiver, "build payment");

        new_unsigned_payment_transaction(PaymentParams::new(&public_key, sequence, &receiver, payment_amount, &fee))
    }

    fn get_receiver_and_amount(
        &self,
        args: &BuildTxArgs,
        from_token: &str,
        to_decimals: u8,
    ) -> Result<(String, candid::Nat), RouterError> {
        let receiver = args.bind.clone();
        if receiver.is_empty() || !self.is_valid_address(&receiver) {
            warn!(receiver = %receiver, "swapout to wrong receiver");
            return Err(RouterError::InvalidReceiver(receiver));
        }

        let from_token_config = self.routes.get_token_config(&args.from_chain_id, from_token).ok_or_else(|| {
            warn!(chain_id = %args.from_chain_id, token = from_token, "get token config failed");
            RouterError::MissingTokenConfig(from_token.to_string())
        })?;

        let amount = self.routes.calc_swap_value(&SwapValueQuery {
            token_id: args.token_id(),
            to_chain_id: self.chain_id(),
            origin_value: &args.origin_value,
            from_decimals: from_token_config.decimals,
            to_decimals,
            origin_from: &args.origin_from,
            origin_tx_to: &args.origin_tx_to,
        });
        Ok((receiver, amount))
    }

    /// The payment must go to the swap's bind address.
    pub fn verify_transaction_with_args(&self, unsigned: &UnsignedTransaction, args: &BuildTxArgs) -> Result<(), RouterError> {
        let payment = unsigned.payment();
        if payment.transaction_type() != transaction::TransactionType::Payment {
            return Err(RouterError::Encoding("not a payment transaction".to_string()));
        }

        let to = payment.destination.to_address();
        if !to.eq_ignore_ascii_case(&args.bind) {
            return Err(RouterError::ReceiverMismatch {
                have: to,
                want: args.bind.clone(),
            });
        }
        Ok(())
    }

    /// Sign with the signer chosen at setup, verify the signature and
    /// assemble the signed transaction.
    pub async fn sign_transaction(&self, unsigned: &UnsignedTransaction, args: &BuildTxArgs) -> Result<SignedTransaction, RouterError> {
        if let Err(e) = self.verify_transaction_with_args(unsigned, args) {
            warn!(swap_id = %args.swap_id, error = %e, "verify transaction failed");
            return Err(e);
        }

        if !self.signer.is_local() {
            let public_key = self.mpc_public_key(&args.from)?;
            if public_key != unsigned.public_key() {
                return Err(RouterError::PublicKeyMismatch {
                    have: hex::encode(unsigned.public_key()),
                    want: hex::encode(public_key),
                });
            }
        }

        let mut session = SigningSession::new(unsigned);
        session.request_signature(self.signer.as_ref(), &args.message_context()).await?;
        session.verify()?;
        let (signed, outcome) = session.finish()?;

        info!(
            block_chain = %self.chain_config.block_chain,
            key_id = %outcome.key_id,
            swap_id = %args.swap_id,
            tx_hash = %signed.hash_hex(),
            "sign transaction finished"
        );
        Ok(signed)
    }

    /// Sign with an explicitly supplied private key, bypassing the configured signer.
    pub async fn sign_transaction_with_local_key(&self, unsigned: &UnsignedTransaction, key: &LocalKey) -> Result<SignedTransaction, RouterError> {
        let public_key = key.public_key();
        if public_key != unsigned.public_key() {
            return Err(RouterError::PublicKeyMismatch {
                have: hex::encode(unsigned.public_key()),
                want: hex::encode(public_key),
            });
        }
        info!(
            signing_hash = %hex::encode_upper(unsigned.signing_hash()),
            blob = %hex::encode_upper(unsigned.signing_message()),
            "prepare to sign"
        );

        let signer = LocalKeySigner::new(key.clone());
        let mut session = SigningSession::new(unsigned);
        session.request_signature(&signer, "").await?;
        session.verify()?;
        let (signed, _) = session.finish()?;
        Ok(signed)
    }

    /// Attach an externally obtained RSV.
    pub fn make_signed_transaction(&self, public_key: &[u8], rsv: &str, unsigned: &UnsignedTransaction) -> Result<SignedTransaction, RouterError> {
        transaction::make_signed_transaction(public_key, rsv, unsigned)
    }

    /// Raw on-ledger sequence of `address`.
    pub async fn get_pool_nonce(&self, address: &str) -> Result<u64, RouterError> {
        self.sequences.get_pool_nonce(address).await
    }

    /// Next sequence for the sender of `args`, reconciled with pending allocations.
    pub async fn get_seq(&self, args: &BuildTxArgs) -> Result<u64, RouterError> {
        self.sequences.get_seq(&args.from).await
    }
}
