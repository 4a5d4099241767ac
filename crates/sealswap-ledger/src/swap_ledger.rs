//! The guarded confidential swap.
//!
//! A swap is applied only when its request is fulfilled and owned by the
//! caller:
//! 1. Check the request is consumable (exists, owned, fulfilled)
//! 2. `amount_out = amount_in * rate`
//! 3. `balance[A] -= amount_in`, `balance[B] += amount_out`
//! 4. Remove the request and write both balances
//!
//! Steps 1 to 4 run under the registry lock and then the balance lock, in
//! that order, so exactly one caller consumes a request and no reader sees
//! a half-applied swap. Every backend call happens before step 4; if one
//! fails the ledger is unchanged.
//!
//! The `*_then` variants take a commit hook that runs before the locks are
//! released, so anything it records is ordered the same way as the commits.
//! The hook must not call back into the ledger.
//!
//! ## Known limitation
//!
//! Step 3 does not check that `balance[A]` covers `amount_in`. Ciphertexts
//! cannot be compared here, so an underfunded swap still succeeds and the
//! backend decides the result (the mock backend wraps modulo 2^64). The
//! multiply in step 2 is likewise unchecked for overflow.

use std::sync::Arc;

use parking_lot::Mutex;
use sealswap_types::{
    AccountId, AssetClass, AssetPair, ConfidentialBackend, ConfidentialValue, OracleTicket,
    RequestId, Result, SwapRequest,
};
use serde::Serialize;

use crate::balances::BalanceBook;
use crate::registry::RequestRegistry;

/// What a successful swap hands back for event emission.
#[derive(Debug, Clone, Serialize)]
pub struct SwapOutcome {
    /// The consumed request (status `Consumed`).
    pub request: SwapRequest,
    pub amount_in: ConfidentialValue,
    pub amount_out: ConfidentialValue,
}

/// Owns all balances and outstanding requests of one swap pair.
///
/// Lock order: `registry` before `balances`. Nothing holds `balances`
/// while acquiring `registry`.
pub struct SwapLedger<B> {
    backend: Arc<B>,
    pair: AssetPair,
    /// Encrypted zero returned for unwritten balances.
    zero: ConfidentialValue,
    registry: Mutex<RequestRegistry>,
    balances: Mutex<BalanceBook>,
}

impl<B: ConfidentialBackend> SwapLedger<B> {
    /// # Errors
    /// Backend errors while preparing the encrypted zero.
    pub fn new(backend: Arc<B>, pair: AssetPair) -> Result<Self> {
        let zero = backend.trivial_encrypt(0)?;
        backend.allow_this(&zero)?;
        Ok(Self {
            backend,
            pair,
            zero,
            registry: Mutex::new(RequestRegistry::new()),
            balances: Mutex::new(BalanceBook::new()),
        })
    }

    #[must_use]
    pub fn pair(&self) -> AssetPair {
        self.pair
    }

    #[must_use]
    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    // -----------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------

    pub fn create_request(&self, owner: AccountId, ticket: Option<OracleTicket>) -> RequestId {
        self.create_request_then(owner, ticket, |_| {})
    }

    /// [`create_request`](Self::create_request), running `on_commit` with
    /// the new id before the registry lock is released.
    pub fn create_request_then<F>(
        &self,
        owner: AccountId,
        ticket: Option<OracleTicket>,
        on_commit: F,
    ) -> RequestId
    where
        F: FnOnce(RequestId),
    {
        let mut registry = self.registry.lock();
        let id = match ticket {
            Some(ticket) => registry.create_with_ticket(owner, ticket),
            None => registry.create(owner),
        };
        on_commit(id);
        id
    }

    #[must_use]
    pub fn request(&self, id: RequestId) -> Option<SwapRequest> {
        self.registry.lock().get(id).cloned()
    }

    pub fn mark_fulfilled(&self, id: RequestId) -> Result<()> {
        self.registry.lock().mark_fulfilled(id)
    }

    /// Consume a request without touching balances.
    pub fn consume(&self, id: RequestId, caller: AccountId) -> Result<SwapRequest> {
        self.registry.lock().consume(id, caller)
    }

    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.registry.lock().total_requests()
    }

    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.registry.lock().outstanding()
    }

    #[must_use]
    pub fn pending_tickets(&self) -> Vec<(RequestId, OracleTicket)> {
        self.registry.lock().pending_tickets()
    }

    // -----------------------------------------------------------------
    // Balances
    // -----------------------------------------------------------------

    /// Unconditional top-up: `balance[account][asset] += amount`.
    ///
    /// `amount` must already be usable by the ledger. Returns the new
    /// balance handle.
    ///
    /// # Errors
    /// `NotAllowed` if `amount` was never granted to the ledger.
    pub fn deposit(
        &self,
        account: AccountId,
        asset: AssetClass,
        amount: &ConfidentialValue,
    ) -> Result<ConfidentialValue> {
        self.deposit_then(account, asset, amount, |_| {})
    }

    /// [`deposit`](Self::deposit), running `on_commit` with the new balance
    /// before the balance lock is released. Not called on error.
    pub fn deposit_then<F>(
        &self,
        account: AccountId,
        asset: AssetClass,
        amount: &ConfidentialValue,
        on_commit: F,
    ) -> Result<ConfidentialValue>
    where
        F: FnOnce(&ConfidentialValue),
    {
        let mut balances = self.balances.lock();
        let current = balances.get(account, asset).unwrap_or(self.zero);
        let updated = self.backend.add(&current, amount)?;
        self.persist(&updated, account)?;
        balances.set(account, asset, updated);
        on_commit(&updated);
        tracing::debug!(account = %account.short(), %asset, handle = %updated.handle(), "deposit applied");
        Ok(updated)
    }

    /// Current balance handle; the encrypted zero if never written.
    #[must_use]
    pub fn get_balance(&self, account: AccountId, asset: AssetClass) -> ConfidentialValue {
        self.balances.lock().get(account, asset).unwrap_or(self.zero)
    }

    #[must_use]
    pub fn funded_accounts(&self) -> usize {
        self.balances.lock().account_count()
    }

    // -----------------------------------------------------------------
    // Swap
    // -----------------------------------------------------------------

    /// Consume `request_id` and move `amount_in` of A into
    /// `amount_in * rate` of B for `caller`.
    ///
    /// # Errors
    /// - `NotFound`, `Unauthorized`, `NotFulfilled` from the request checks
    /// - `NotAllowed` if `amount_in` or `rate` is not usable by the ledger
    ///
    /// On any error neither the request nor a balance changes.
    pub fn swap(
        &self,
        request_id: RequestId,
        caller: AccountId,
        amount_in: &ConfidentialValue,
        rate: &ConfidentialValue,
    ) -> Result<SwapOutcome> {
        self.swap_then(request_id, caller, amount_in, rate, |_| {})
    }

    /// [`swap`](Self::swap), running `on_commit` with the outcome while
    /// both ledger locks are still held. Not called on error.
    pub fn swap_then<F>(
        &self,
        request_id: RequestId,
        caller: AccountId,
        amount_in: &ConfidentialValue,
        rate: &ConfidentialValue,
        on_commit: F,
    ) -> Result<SwapOutcome>
    where
        F: FnOnce(&SwapOutcome),
    {
        let mut registry = self.registry.lock();
        registry.check_consumable(request_id, caller)?;
        let mut balances = self.balances.lock();

        let amount_out = self.backend.mul(amount_in, rate)?;
        let balance_a = balances.get(caller, AssetClass::A).unwrap_or(self.zero);
        let balance_b = balances.get(caller, AssetClass::B).unwrap_or(self.zero);
        // Unguarded: see "Known limitation" above.
        let new_a = self.backend.sub(&balance_a, amount_in)?;
        let new_b = self.backend.add(&balance_b, &amount_out)?;
        self.persist(&new_a, caller)?;
        self.persist(&new_b, caller)?;
        self.persist(&amount_out, caller)?;

        let request = registry.consume(request_id, caller)?;
        balances.set(caller, AssetClass::A, new_a);
        balances.set(caller, AssetClass::B, new_b);

        tracing::info!(
            request = %request_id,
            account = %caller.short(),
            amount_in = %amount_in.handle(),
            amount_out = %amount_out.handle(),
            "swap applied"
        );

        let outcome = SwapOutcome {
            request,
            amount_in: *amount_in,
            amount_out,
        };
        on_commit(&outcome);
        Ok(outcome)
    }

    /// Keep a stored ciphertext usable by the ledger and decryptable by
    /// its owner.
    fn persist(&self, value: &ConfidentialValue, owner: AccountId) -> Result<()> {
        self.backend.allow_this(value)?;
        self.backend.allow(value, owner)
    }
}
