#![allow(dead_code)]

use async_trait::async_trait;
use candid::Nat;
use router_lib::collaborators::{ChainRegistry, RouteResolver, SwapValueQuery};
use router_lib::config::{ChainConfig, RouterConfig};
use router_lib::nonce::InMemoryNonceReconciler;
use router_lib::signature::{decode_hex, signature_to_rsv, KeyAlgorithm};
use router_lib::signer::{LocalKey, OracleResponse, SigningOracle};
use router_lib::token_config::{RippleExtra, TokenConfig};
use router_lib::{BuildTxArgs, Erc20SwapInfo, RouterError, SwapType, TxExtra};
use router_ripple::codec::IssuedValue;
use router_ripple::{AccountId, AccountInfo, LedgerClient, RippleBridge, RippleCollaborators, RippleNetwork};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const CHAIN_ID: &str = "1000005788240";
pub const FROM_CHAIN_ID: &str = "56";
pub const TOKEN_ID: &str = "XRP";
pub const FROM_TOKEN: &str = "0xfromtoken";
pub const DEST_TOKEN: &str = "XRP";
pub const ISSUED_TOKEN_ID: &str = "USDX";
pub const ISSUED_DEST_TOKEN: &str = "USD.issued";

pub const SECP_PRIVATE_KEY: &str = "c87509a1c067bbde78beb793e6fa76530b6382a4c0241e5e4a9ec0a0f44dc0d3";
pub const ED_PRIVATE_KEY: &str = "ED1ACAAEDECE405B2A958212629E16F2EB46B153EEE94CDD350FDEFF52795525B7";

pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").with_test_writer().try_init();
}

pub fn receiver_address() -> String {
    AccountId([0x42; 20]).to_address()
}

pub fn issuer_address() -> String {
    AccountId([0x17; 20]).to_address()
}

pub fn address_of(key: &LocalKey) -> String {
    RippleNetwork::address_from_public_key(&key.public_key()).expect("33-byte public key")
}

// --- Route resolver ---

pub struct MockRoutes {
    pub tokens: HashMap<(String, String), TokenConfig>,
    pub destinations: HashMap<(String, String), String>,
}

impl MockRoutes {
    pub fn new() -> Self {
        let mut tokens = HashMap::new();
        let mut destinations = HashMap::new();

        tokens.insert(
            (FROM_CHAIN_ID.to_string(), FROM_TOKEN.to_string()),
            TokenConfig {
                token_id: TOKEN_ID.to_string(),
                decimals: 6,
                contract_address: FROM_TOKEN.to_string(),
                ripple_extra: None,
            },
        );
        tokens.insert(
            (CHAIN_ID.to_string(), DEST_TOKEN.to_string()),
            TokenConfig {
                token_id: TOKEN_ID.to_string(),
                decimals: 6,
                contract_address: DEST_TOKEN.to_string(),
                ripple_extra: Some(RippleExtra::native()),
            },
        );
        tokens.insert(
            (CHAIN_ID.to_string(), ISSUED_DEST_TOKEN.to_string()),
            TokenConfig {
                token_id: ISSUED_TOKEN_ID.to_string(),
                decimals: 6,
                contract_address: ISSUED_DEST_TOKEN.to_string(),
                ripple_extra: Some(RippleExtra {
                    currency: "USD".to_string(),
                    issuer: issuer_address(),
                }),
            },
        );

        destinations.insert((TOKEN_ID.to_string(), CHAIN_ID.to_string()), DEST_TOKEN.to_string());
        destinations.insert((ISSUED_TOKEN_ID.to_string(), CHAIN_ID.to_string()), ISSUED_DEST_TOKEN.to_string());

        Self { tokens, destinations }
    }
}

impl RouteResolver for MockRoutes {
    fn resolve_destination_token(&self, token_id: &str, to_chain_id: &str) -> Option<String> {
        self.destinations.get(&(token_id.to_string(), to_chain_id.to_string())).cloned()
    }

    fn get_token_config(&self, chain_id: &str, token: &str) -> Option<TokenConfig> {
        self.tokens.get(&(chain_id.to_string(), token.to_string())).cloned()
    }

    /// Rescales between decimals, no fees.
    fn calc_swap_value(&self, query: &SwapValueQuery<'_>) -> Nat {
        let value = query.origin_value.0.clone();
        let scaled = if query.to_decimals >= query.from_decimals {
            value * num_bigint::BigUint::from(10u32).pow(u32::from(query.to_decimals - query.from_decimals))
        } else {
            value / num_bigint::BigUint::from(10u32).pow(u32::from(query.from_decimals - query.to_decimals))
        };
        Nat(scaled)
    }
}

// --- Chain registry ---

pub struct MockRegistry {
    pub router_signer: String,
    pub public_keys: HashMap<String, String>,
    pub supported: HashSet<String>,
}

impl MockRegistry {
    pub fn new(router_signer: &str, public_key_hex: &str) -> Self {
        let mut public_keys = HashMap::new();
        public_keys.insert(router_signer.to_string(), public_key_hex.to_string());
        Self {
            router_signer: router_signer.to_string(),
            public_keys,
            supported: [CHAIN_ID.to_string()].into_iter().collect(),
        }
    }
}

impl ChainRegistry for MockRegistry {
    fn is_supported_chain(&self, chain_id: &str) -> bool {
        self.supported.contains(chain_id)
    }

    fn get_router_signer(&self, token_id: &str, chain_id: &str) -> Result<String, RouterError> {
        if token_id.is_empty() {
            return Err(RouterError::RouterSignerNotFound {
                token_id: token_id.to_string(),
                chain_id: chain_id.to_string(),
            });
        }
        Ok(self.router_signer.clone())
    }

    fn get_public_key(&self, address: &str) -> Option<String> {
        self.public_keys.get(address).cloned()
    }
}

// --- Ledger ---

#[derive(Default)]
pub struct MockLedger {
    pub accounts: Mutex<HashMap<String, AccountInfo>>,
    pub trust_lines: Mutex<HashMap<(String, String, String), IssuedValue>>,
    pub unreachable: Mutex<HashSet<String>>,
    pub account_queries: AtomicUsize,
}

impl MockLedger {
    pub fn fund(&self, address: &str, balance: u64, sequence: u32) {
        self.accounts.lock().unwrap().insert(
            address.to_string(),
            AccountInfo {
                account: address.to_string(),
                balance,
                sequence,
            },
        );
    }

    pub fn set_trust_line(&self, address: &str, currency: &str, issuer: &str, balance: &str) {
        self.trust_lines.lock().unwrap().insert(
            (address.to_string(), currency.to_string(), issuer.to_string()),
            balance.parse().unwrap(),
        );
    }

    pub fn make_unreachable(&self, address: &str) {
        self.unreachable.lock().unwrap().insert(address.to_string());
    }

    pub fn account_queries(&self) -> usize {
        self.account_queries.load(Ordering::SeqCst)
    }

    fn check_reachable(&self, address: &str) -> Result<(), RouterError> {
        if self.unreachable.lock().unwrap().contains(address) {
            return Err(RouterError::Rpc("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerClient for MockLedger {
    async fn get_account(&self, address: &str) -> Result<Option<AccountInfo>, RouterError> {
        self.account_queries.fetch_add(1, Ordering::SeqCst);
        self.check_reachable(address)?;
        Ok(self.accounts.lock().unwrap().get(address).cloned())
    }

    async fn get_issued_balance(&self, address: &str, currency: &str, issuer: &str) -> Result<Option<IssuedValue>, RouterError> {
        self.check_reachable(address)?;
        Ok(self
            .trust_lines
            .lock()
            .unwrap()
            .get(&(address.to_string(), currency.to_string(), issuer.to_string()))
            .copied())
    }
}

// --- Signing oracle ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OracleBehaviour {
    Honest,
    TwoSignatures,
    WrongSignature,
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleCall {
    pub algorithm: KeyAlgorithm,
    pub public_key_hex: String,
    pub content_hex: String,
    pub context: String,
}

/// Signs with a key it holds, the way the MPC network would.
pub struct MockOracle {
    pub key: LocalKey,
    pub behaviour: Mutex<OracleBehaviour>,
    pub calls: Mutex<Vec<OracleCall>>,
}

impl MockOracle {
    pub fn new(key: LocalKey) -> Self {
        Self {
            key,
            behaviour: Mutex::new(OracleBehaviour::Honest),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_behaviour(&self, behaviour: OracleBehaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap().clone()
    }

    fn sign_content(&self, algorithm: KeyAlgorithm, content_hex: &str) -> String {
        let content = decode_hex(content_hex).unwrap();
        let signature = match algorithm {
            KeyAlgorithm::Ecdsa => {
                let hash: [u8; 32] = content.try_into().unwrap();
                self.key.sign(&hash, &[]).unwrap()
            }
            KeyAlgorithm::EdDsa => self.key.sign(&[0u8; 32], &content).unwrap(),
        };
        signature_to_rsv(&signature, algorithm).unwrap()
    }
}

#[async_trait]
impl SigningOracle for MockOracle {
    async fn sign(
        &self,
        algorithm: KeyAlgorithm,
        public_key_hex: &str,
        content_hex: &str,
        context: &str,
    ) -> Result<OracleResponse, RouterError> {
        self.calls.lock().unwrap().push(OracleCall {
            algorithm,
            public_key_hex: public_key_hex.to_string(),
            content_hex: content_hex.to_string(),
            context: context.to_string(),
        });

        let behaviour = *self.behaviour.lock().unwrap();
        let key_id = format!("key-{}", self.calls.lock().unwrap().len());
        let rsvs = match behaviour {
            OracleBehaviour::Unavailable => return Err(RouterError::Oracle("mpc network timeout".to_string())),
            OracleBehaviour::Honest => vec![self.sign_content(algorithm, content_hex)],
            OracleBehaviour::TwoSignatures => {
                let rsv = self.sign_content(algorithm, content_hex);
                vec![rsv.clone(), rsv]
            }
            OracleBehaviour::WrongSignature => {
                // a valid signature, over different content
                let other = match algorithm {
                    KeyAlgorithm::Ecdsa => hex::encode([0xAB; 32]),
                    KeyAlgorithm::EdDsa => format!("0x{}", hex::encode(b"something else")),
                };
                vec![self.sign_content(algorithm, &other)]
            }
        };
        Ok(OracleResponse { key_id, rsvs })
    }
}

// --- Fixture ---

pub struct Fixture {
    pub bridge: RippleBridge,
    pub ledger: Arc<MockLedger>,
    pub oracle: Arc<MockOracle>,
    pub reconciler: Arc<InMemoryNonceReconciler>,
    pub key: LocalKey,
    pub sender: String,
}

pub struct FixtureOptions {
    pub private_key: &'static str,
    pub sign_with_private_key: bool,
    pub is_test_mode: bool,
    pub min_reserve_fee: Option<u64>,
}

impl Default for FixtureOptions {
    fn default() -> Self {
        Self {
            private_key: SECP_PRIVATE_KEY,
            sign_with_private_key: false,
            is_test_mode: false,
            min_reserve_fee: None,
        }
    }
}

pub fn router_config(options: &FixtureOptions) -> RouterConfig {
    let mut config = RouterConfig {
        is_test_mode: options.is_test_mode,
        sign_with_private_key: options.sign_with_private_key,
        ..Default::default()
    };
    config.chains.insert(
        CHAIN_ID.to_string(),
        ChainConfig {
            chain_id: CHAIN_ID.to_string(),
            block_chain: "XRP".to_string(),
            min_reserve_fee: options.min_reserve_fee,
            account_reserve: None,
            default_fee: None,
        },
    );
    if options.sign_with_private_key {
        config
            .signer_private_keys
            .insert(CHAIN_ID.to_string(), options.private_key.to_string());
    }
    config
}

pub fn setup(options: FixtureOptions) -> Fixture {
    init_test_logging();

    let key = LocalKey::from_hex(options.private_key).expect("test key");
    let sender = address_of(&key);
    let ledger = Arc::new(MockLedger::default());
    let oracle = Arc::new(MockOracle::new(key.clone()));
    let reconciler = Arc::new(InMemoryNonceReconciler::new());

    let collaborators = RippleCollaborators {
        routes: Arc::new(MockRoutes::new()),
        registry: Arc::new(MockRegistry::new(&sender, &hex::encode(key.public_key()))),
        ledger: ledger.clone(),
        reconciler: reconciler.clone(),
        oracle: oracle.clone(),
    };
    let bridge = RippleBridge::new(CHAIN_ID, Arc::new(router_config(&options)), collaborators).expect("bridge setup");

    Fixture {
        bridge,
        ledger,
        oracle,
        reconciler,
        key,
        sender,
    }
}

pub fn swap_args(sender: &str, token_id: &str, origin_value: u64) -> BuildTxArgs {
    BuildTxArgs {
        swap_id: "0x5a1f7e0d3c0b9a8f".to_string(),
        swap_type: SwapType::Erc20Swap,
        from_chain_id: FROM_CHAIN_ID.to_string(),
        to_chain_id: CHAIN_ID.to_string(),
        from: sender.to_string(),
        bind: receiver_address(),
        origin_from: "0x1111111111111111111111111111111111111111".to_string(),
        origin_tx_to: "0x2222222222222222222222222222222222222222".to_string(),
        origin_value: Nat::from(origin_value),
        erc20_swap_info: Some(Erc20SwapInfo {
            token: FROM_TOKEN.to_string(),
            token_id: token_id.to_string(),
        }),
        extra: TxExtra::NotBuilt,
    }
}
