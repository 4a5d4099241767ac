//! Swap engine: the outward-facing surface.
//!
//! Combines the pieces a caller talks to:
//! 1. Fee check and request submission through the [`FulfillmentGate`]
//! 2. Request bookkeeping and the guarded transition in the [`SwapLedger`]
//! 3. Import of client ciphertexts (proof check, then `allow_this`)
//! 4. The encrypted exchange rate and its admin
//! 5. An append-only journal of [`SwapEvent`]s
//!
//! Oracle round-trips happen before any ledger lock is taken. Events are
//! journaled from the ledger's commit hooks, so their sequence numbers
//! follow commit order. Lock order: registry, balances, rate, journal.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use sealswap_oracle::{EntropyOracle, FulfillmentGate};
use sealswap_types::{
    AccountId, AssetClass, ConfidentialBackend, ConfidentialValue, ExternalInput, Fee, RequestId,
    RequestStatus, Result, SealswapError, SwapConfig, SwapEvent, SwapEventKind, constants,
};

use crate::swap_ledger::{SwapLedger, SwapOutcome};

#[derive(Default)]
struct EventJournal {
    next_sequence: u64,
    events: Vec<SwapEvent>,
}

/// Oracle-gated confidential swap engine for one asset pair.
pub struct SwapEngine<B, O> {
    config: SwapConfig,
    ledger: SwapLedger<B>,
    gate: FulfillmentGate<O>,
    /// Held only long enough to copy or replace the handle.
    rate: Mutex<ConfidentialValue>,
    journal: Mutex<EventJournal>,
}

impl<B: ConfidentialBackend, O: EntropyOracle> SwapEngine<B, O> {
    /// Build an engine. The exchange rate is required up front, encrypted
    /// by the admin and imported with the admin's proof.
    ///
    /// # Errors
    /// - `InvalidConfig` for a bad config or an oracle that does not match it
    /// - `InvalidProof` if `initial_rate` is not bound to the admin
    pub fn new(
        config: SwapConfig,
        backend: Arc<B>,
        oracle: Arc<O>,
        initial_rate: &ExternalInput,
    ) -> Result<Self> {
        let pair = config.validate()?;
        let gate = FulfillmentGate::new(oracle, config.oracle)?;
        let rate = import(backend.as_ref(), initial_rate, config.admin)?;
        let ledger = SwapLedger::new(backend, pair)?;

        tracing::info!(
            engine = constants::ENGINE_NAME,
            version = constants::VERSION,
            oracle = %gate.oracle_id(),
            token_a = %config.token_a,
            token_b = %config.token_b,
            rate = %rate.handle(),
            "swap engine ready"
        );

        Ok(Self {
            config,
            ledger,
            gate,
            rate: Mutex::new(rate),
            journal: Mutex::new(EventJournal::default()),
        })
    }

    // -----------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------

    /// Current oracle fee a `request_swap` call must cover.
    pub fn required_fee(&self) -> Result<Fee> {
        self.gate.required_fee()
    }

    /// Pay the oracle and open a swap request owned by `caller`.
    ///
    /// # Errors
    /// - `InsufficientFee` if `fee_paid` is below the oracle fee
    /// - `OracleUnavailable` if the oracle cannot be reached
    ///
    /// No request is recorded unless the oracle accepted the submission.
    pub fn request_swap(&self, caller: AccountId, fee_paid: Fee) -> Result<RequestId> {
        self.gate.ensure_fee(fee_paid)?;
        let ticket = self.gate.submit(&self.config.request_tag, fee_paid)?;
        let request_id = self.ledger.create_request_then(caller, Some(ticket), |request_id| {
            self.emit(SwapEventKind::SwapRequested {
                account: caller,
                request_id,
            });
        });
        tracing::info!(request = %request_id, %ticket, account = %caller.short(), "swap requested");
        Ok(request_id)
    }

    /// Push-style fulfillment, for oracles that call back instead of
    /// being polled.
    pub fn acknowledge_fulfillment(&self, request_id: RequestId) -> Result<()> {
        self.ledger.mark_fulfilled(request_id)
    }

    /// Poll the oracle once for `request_id` and record a fulfillment.
    ///
    /// # Errors
    /// - `NotFound` if the request does not exist
    /// - `OracleUnavailable` if the poll fails
    pub fn refresh(&self, request_id: RequestId) -> Result<RequestStatus> {
        let request = self
            .ledger
            .request(request_id)
            .ok_or(SealswapError::NotFound(request_id))?;
        if request.status != RequestStatus::Pending {
            return Ok(request.status);
        }
        let Some(ticket) = request.ticket else {
            return Ok(RequestStatus::Pending);
        };
        if self.gate.is_fulfilled(ticket)? {
            self.ledger.mark_fulfilled(request_id)?;
            return Ok(RequestStatus::Fulfilled);
        }
        Ok(RequestStatus::Pending)
    }

    /// Poll every pending ticketed request once. Returns the ids that
    /// became fulfilled. Stops at the first oracle failure.
    pub fn refresh_all(&self) -> Result<Vec<RequestId>> {
        let mut fulfilled = Vec::new();
        for (request_id, ticket) in self.ledger.pending_tickets() {
            if self.gate.is_fulfilled(ticket)? {
                match self.ledger.mark_fulfilled(request_id) {
                    Ok(()) => fulfilled.push(request_id),
                    // Consumed between listing and marking.
                    Err(SealswapError::NotFound(_)) => {}
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(fulfilled)
    }

    /// `true` once the oracle has fulfilled `request_id`.
    pub fn is_fulfilled(&self, request_id: RequestId) -> Result<bool> {
        Ok(self.refresh(request_id)? == RequestStatus::Fulfilled)
    }

    #[must_use]
    pub fn request_status(&self, request_id: RequestId) -> Option<RequestStatus> {
        self.ledger.request(request_id).map(|r| r.status)
    }

    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.ledger.total_requests()
    }

    // -----------------------------------------------------------------
    // Balances
    // -----------------------------------------------------------------

    /// Import a client ciphertext and credit it to `caller`.
    ///
    /// # Errors
    /// `InvalidProof` if the input is not bound to `caller`.
    pub fn deposit(
        &self,
        caller: AccountId,
        asset: AssetClass,
        amount: &ExternalInput,
    ) -> Result<ConfidentialValue> {
        let value = import(self.ledger.backend().as_ref(), amount, caller)?;
        self.ledger.deposit_then(caller, asset, &value, |_| {
            self.emit(SwapEventKind::Deposited {
                account: caller,
                asset,
                amount_handle: value.handle(),
            });
        })
    }

    #[must_use]
    pub fn encrypted_balance(&self, account: AccountId, asset: AssetClass) -> ConfidentialValue {
        self.ledger.get_balance(account, asset)
    }

    // -----------------------------------------------------------------
    // Swap
    // -----------------------------------------------------------------

    /// Consume `request_id` and swap `amount_in` of A into B at the
    /// current exchange rate.
    ///
    /// A pending request is polled once first, so a caller need not call
    /// [`refresh`](Self::refresh) separately.
    ///
    /// # Errors
    /// - `NotFound` if the request is absent or already consumed
    /// - `Unauthorized` if `caller` does not own it
    /// - `NotFulfilled` if the oracle has not fulfilled it yet
    /// - `InvalidProof` if `amount_in` is not bound to `caller`
    /// - `OracleUnavailable` if the fulfillment poll fails
    pub fn swap(
        &self,
        caller: AccountId,
        request_id: RequestId,
        amount_in: &ExternalInput,
    ) -> Result<SwapOutcome> {
        let request = self
            .ledger
            .request(request_id)
            .ok_or(SealswapError::NotFound(request_id))?;
        if request.owner != caller {
            return Err(SealswapError::Unauthorized {
                caller,
                reason: format!("does not own {request_id}"),
            });
        }
        if request.status == RequestStatus::Pending {
            self.refresh(request_id)?;
        }

        let amount = import(self.ledger.backend().as_ref(), amount_in, caller)?;
        let rate = *self.rate.lock();
        let pair = self.ledger.pair();
        self.ledger
            .swap_then(request_id, caller, &amount, &rate, |outcome| {
                self.emit(SwapEventKind::Swapped {
                    account: caller,
                    asset_in: pair.token(AssetClass::A),
                    asset_out: pair.token(AssetClass::B),
                    amount_in_handle: outcome.amount_in.handle(),
                    amount_out_handle: outcome.amount_out.handle(),
                });
            })
            .inspect_err(|e| {
                tracing::warn!(request = %request_id, account = %caller.short(), error = %e, "swap rejected");
            })
    }

    // -----------------------------------------------------------------
    // Exchange rate
    // -----------------------------------------------------------------

    /// Replace the encrypted exchange rate. Admin only.
    ///
    /// # Errors
    /// - `Unauthorized` if `caller` is not the configured admin
    /// - `InvalidProof` if `rate` is not bound to the admin
    pub fn set_exchange_rate(&self, caller: AccountId, rate: &ExternalInput) -> Result<()> {
        if caller != self.config.admin {
            return Err(SealswapError::Unauthorized {
                caller,
                reason: "is not the exchange rate admin".to_string(),
            });
        }
        let value = import(self.ledger.backend().as_ref(), rate, caller)?;
        {
            let mut current = self.rate.lock();
            *current = value;
            self.emit(SwapEventKind::ExchangeRateUpdated {
                rate_handle: value.handle(),
            });
        }
        tracing::info!(rate = %value.handle(), "exchange rate updated");
        Ok(())
    }

    #[must_use]
    pub fn exchange_rate(&self) -> ConfidentialValue {
        *self.rate.lock()
    }

    // -----------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------

    fn emit(&self, kind: SwapEventKind) {
        let mut journal = self.journal.lock();
        let sequence = journal.next_sequence;
        journal.next_sequence += 1;
        journal.events.push(SwapEvent {
            sequence,
            kind,
            emitted_at: Utc::now(),
        });
    }

    /// Snapshot of undrained events.
    #[must_use]
    pub fn events(&self) -> Vec<SwapEvent> {
        self.journal.lock().events.clone()
    }

    /// Take all undrained events. Sequence numbers keep counting.
    pub fn drain_events(&self) -> Vec<SwapEvent> {
        std::mem::take(&mut self.journal.lock().events)
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &SwapConfig {
        &self.config
    }

    #[must_use]
    pub fn ledger(&self) -> &SwapLedger<B> {
        &self.ledger
    }
}

/// Import a client ciphertext and make it usable by the ledger.
fn import<B: ConfidentialBackend>(
    backend: &B,
    input: &ExternalInput,
    owner: AccountId,
) -> Result<ConfidentialValue> {
    let value = backend.from_external(input, owner)?;
    backend.allow_this(&value)?;
    Ok(value)
}
