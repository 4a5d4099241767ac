//! End-to-end tests through the swap engine.
//!
//! Every scenario runs the full request lifecycle:
//! fee quote -> request -> oracle fulfilment -> swap -> replay attempt,
//! with balances checked by decrypting in the mock backend.

use std::sync::Arc;

use sealswap_ledger::{SwapEngine, SwapLedger};
use sealswap_oracle::MockEntropyOracle;
use sealswap_types::mock::MockBackend;
use sealswap_types::*;

const USER: AccountId = AccountId([0x11; 20]);
const OTHER: AccountId = AccountId([0x22; 20]);
const ADMIN: AccountId = AccountId([0xad; 20]);
const ORACLE: OracleId = OracleId([0x0e; 20]);
const TOKEN_A: TokenId = TokenId([0xaa; 20]);
const TOKEN_B: TokenId = TokenId([0xbb; 20]);

type Engine = SwapEngine<MockBackend, MockEntropyOracle>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct World {
    fhe: Arc<MockBackend>,
    oracle: Arc<MockEntropyOracle>,
    engine: Engine,
}

impl World {
    fn new(rate: u64, fee: Fee) -> Self {
        init_tracing();
        let fhe = Arc::new(MockBackend::new());
        let oracle = Arc::new(MockEntropyOracle::new(ORACLE, fee));
        let config = SwapConfig::new(ORACLE, TOKEN_A, TOKEN_B, ADMIN);
        let rate = fhe.encrypt_input(rate, ADMIN);
        let engine = SwapEngine::new(config, Arc::clone(&fhe), Arc::clone(&oracle), &rate)
            .expect("engine construction");
        Self {
            fhe,
            oracle,
            engine,
        }
    }

    fn deposit(&self, account: AccountId, asset: AssetClass, amount: u64) {
        self.engine
            .deposit(account, asset, &self.fhe.encrypt_input(amount, account))
            .expect("deposit");
    }

    fn swap(&self, account: AccountId, id: RequestId, amount: u64) -> Result<()> {
        self.engine
            .swap(account, id, &self.fhe.encrypt_input(amount, account))
            .map(|_| ())
    }

    fn balance(&self, account: AccountId, asset: AssetClass) -> u64 {
        self.fhe
            .decrypt(&self.engine.encrypted_balance(account, asset))
            .expect("balance handle known to backend")
    }
}

// =============================================================================
// The reference scenario: rate 2, deposit 100, swap 50, replay rejected
// =============================================================================
#[test]
fn e2e_request_fulfil_swap_replay() {
    let world = World::new(2, 500);

    world.deposit(USER, AssetClass::A, 100);

    let fee = world.engine.required_fee().unwrap();
    assert_eq!(fee, 500);
    let id = world.engine.request_swap(USER, fee).unwrap();
    assert_eq!(world.engine.request_status(id), Some(RequestStatus::Pending));

    world.oracle.fulfill_all();
    assert!(world.engine.is_fulfilled(id).unwrap());

    world.swap(USER, id, 50).unwrap();
    assert_eq!(world.balance(USER, AssetClass::A), 50);
    assert_eq!(world.balance(USER, AssetClass::B), 100);
    assert_eq!(world.engine.request_status(id), None);

    let err = world.swap(USER, id, 50).unwrap_err();
    assert!(matches!(err, SealswapError::NotFound(rid) if rid == id));
    assert_eq!(world.balance(USER, AssetClass::A), 50);
    assert_eq!(world.balance(USER, AssetClass::B), 100);
}

// =============================================================================
// Deposits without swaps leave asset B at zero
// =============================================================================
#[test]
fn e2e_deposit_only_leaves_b_at_zero() {
    let world = World::new(2, 0);
    world.deposit(USER, AssetClass::A, 30);
    world.deposit(USER, AssetClass::A, 12);
    assert_eq!(world.balance(USER, AssetClass::A), 42);
    assert_eq!(world.balance(USER, AssetClass::B), 0);
    assert_eq!(world.balance(OTHER, AssetClass::A), 0);
}

// =============================================================================
// The owner can decrypt their own balances, nobody else can
// =============================================================================
#[test]
fn e2e_balances_granted_to_owner() {
    let world = World::new(3, 0);
    world.deposit(USER, AssetClass::A, 10);
    let id = world.engine.request_swap(USER, 0).unwrap();
    world.oracle.fulfill_all();
    world.swap(USER, id, 4).unwrap();

    let a = world.engine.encrypted_balance(USER, AssetClass::A);
    let b = world.engine.encrypted_balance(USER, AssetClass::B);
    assert_eq!(world.fhe.decrypt_for(&a, USER).unwrap(), 6);
    assert_eq!(world.fhe.decrypt_for(&b, USER).unwrap(), 12);
    assert!(world.fhe.decrypt_for(&b, OTHER).is_err());
}

// =============================================================================
// Several requests per account are independent
// =============================================================================
#[test]
fn e2e_multiple_requests_consumed_in_any_order() {
    let world = World::new(2, 1);
    world.deposit(USER, AssetClass::A, 100);

    let first = world.engine.request_swap(USER, 1).unwrap();
    let second = world.engine.request_swap(USER, 1).unwrap();
    assert!(second > first);
    world.oracle.fulfill_all();

    world.swap(USER, second, 10).unwrap();
    world.swap(USER, first, 20).unwrap();
    assert_eq!(world.balance(USER, AssetClass::A), 70);
    assert_eq!(world.balance(USER, AssetClass::B), 60);
    assert_eq!(world.engine.total_requests(), 2);
    assert_eq!(world.engine.ledger().outstanding(), 0);

    // Ids keep growing after everything is consumed.
    let third = world.engine.request_swap(USER, 1).unwrap();
    assert!(third > second);
}

// =============================================================================
// A request that is never fulfilled stays pending indefinitely
// =============================================================================
#[test]
fn e2e_unfulfilled_request_stays_pending() {
    let world = World::new(2, 0);
    world.deposit(USER, AssetClass::A, 10);
    let id = world.engine.request_swap(USER, 0).unwrap();

    for _ in 0..5 {
        let err = world.swap(USER, id, 1).unwrap_err();
        assert!(matches!(err, SealswapError::NotFulfilled { .. }));
    }
    assert_eq!(world.engine.request_status(id), Some(RequestStatus::Pending));
    assert_eq!(world.balance(USER, AssetClass::A), 10);
}

// =============================================================================
// Oracle outage during the swap poll: retry after recovery succeeds
// =============================================================================
#[test]
fn e2e_oracle_outage_is_retryable() {
    let world = World::new(2, 0);
    world.deposit(USER, AssetClass::A, 10);
    let id = world.engine.request_swap(USER, 0).unwrap();
    world.oracle.fulfill_all();

    world.oracle.set_online(false);
    let err = world.swap(USER, id, 5).unwrap_err();
    assert!(matches!(err, SealswapError::OracleUnavailable { .. }));
    assert_eq!(world.balance(USER, AssetClass::A), 10);

    world.oracle.set_online(true);
    world.swap(USER, id, 5).unwrap();
    assert_eq!(world.balance(USER, AssetClass::B), 10);
}

// =============================================================================
// Known limitation: no balance sufficiency check on ciphertexts
// =============================================================================
#[test]
fn e2e_swap_exceeding_balance_wraps_instead_of_failing() {
    let world = World::new(1, 0);
    let id = world.engine.request_swap(USER, 0).unwrap();
    world.oracle.fulfill_all();

    // Nothing deposited, yet the swap goes through.
    world.swap(USER, id, 1).unwrap();
    assert_eq!(world.balance(USER, AssetClass::A), u64::MAX);
    assert_eq!(world.balance(USER, AssetClass::B), 1);
}

// =============================================================================
// Construction-time validation
// =============================================================================
#[test]
fn e2e_invalid_token_config_rejected() {
    let fhe = Arc::new(MockBackend::new());
    let oracle = Arc::new(MockEntropyOracle::new(ORACLE, 0));

    for (a, b) in [
        (TOKEN_A, TOKEN_A),
        (TokenId::NULL, TOKEN_B),
        (TOKEN_A, TokenId::NULL),
    ] {
        let config = SwapConfig::new(ORACLE, a, b, ADMIN);
        let rate = fhe.encrypt_input(2, ADMIN);
        let err = SwapEngine::new(config, Arc::clone(&fhe), Arc::clone(&oracle), &rate)
            .err()
            .expect("construction must fail");
        assert!(
            matches!(err, SealswapError::InvalidConfig { .. }),
            "Expected InvalidConfig, got: {err:?}"
        );
    }
}

#[test]
fn e2e_wrong_oracle_rejected() {
    let fhe = Arc::new(MockBackend::new());
    let oracle = Arc::new(MockEntropyOracle::new(OracleId([0x0f; 20]), 0));
    let config = SwapConfig::new(ORACLE, TOKEN_A, TOKEN_B, ADMIN);
    let rate = fhe.encrypt_input(2, ADMIN);
    assert!(matches!(
        SwapEngine::new(config, fhe, oracle, &rate),
        Err(SealswapError::InvalidConfig { .. })
    ));
}

#[test]
fn e2e_ledger_rejects_same_pair_directly() {
    assert!(matches!(
        AssetPair::new(TOKEN_B, TOKEN_B),
        Err(SealswapError::InvalidConfig { .. })
    ));
    let fhe = Arc::new(MockBackend::new());
    let pair = AssetPair::new(TOKEN_A, TOKEN_B).unwrap();
    let ledger = SwapLedger::new(fhe, pair).unwrap();
    assert_eq!(ledger.pair().token(AssetClass::B), TOKEN_B);
}

// =============================================================================
// Events export to JSON for indexers
// =============================================================================
#[test]
fn e2e_events_export_as_json() {
    let world = World::new(2, 0);
    world.deposit(USER, AssetClass::A, 10);
    let id = world.engine.request_swap(USER, 0).unwrap();
    world.oracle.fulfill_all();
    world.swap(USER, id, 5).unwrap();

    let events = world.engine.drain_events();
    let json = serde_json::to_string(&events).unwrap();
    assert!(json.contains("\"type\":\"deposited\""));
    assert!(json.contains("\"type\":\"swap_requested\""));
    assert!(json.contains("\"type\":\"swapped\""));
    let back: Vec<SwapEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, events);
}
