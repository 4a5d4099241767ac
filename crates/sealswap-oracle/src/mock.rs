//! In-memory [`EntropyOracle`] for tests.
//!
//! Requests stay pending until the test calls [`MockEntropyOracle::fulfill`],
//! which stands in for the oracle's off-chain callback.

use std::collections::BTreeMap;

use parking_lot::Mutex;
use sealswap_types::{Fee, OracleId, OracleTicket, Result, SealswapError};

use crate::EntropyOracle;

struct OracleState {
    fee: Fee,
    online: bool,
    next_ticket: u64,
    /// `None` until fulfilled.
    requests: BTreeMap<OracleTicket, Option<[u8; 32]>>,
    tags: BTreeMap<OracleTicket, String>,
    collected: Fee,
}

/// Scriptable entropy oracle.
pub struct MockEntropyOracle {
    id: OracleId,
    state: Mutex<OracleState>,
}

impl MockEntropyOracle {
    #[must_use]
    pub fn new(id: OracleId, fee: Fee) -> Self {
        Self {
            id,
            state: Mutex::new(OracleState {
                fee,
                online: true,
                next_ticket: 0,
                requests: BTreeMap::new(),
                tags: BTreeMap::new(),
                collected: 0,
            }),
        }
    }

    /// Deliver random entropy for `ticket`. Returns `false` if the ticket
    /// is unknown or was already fulfilled.
    pub fn fulfill(&self, ticket: OracleTicket) -> bool {
        let mut state = self.state.lock();
        match state.requests.get_mut(&ticket) {
            Some(slot) if slot.is_none() => {
                *slot = Some(rand::random());
                true
            }
            _ => false,
        }
    }

    /// Fulfil every pending request. Returns how many were fulfilled.
    pub fn fulfill_all(&self) -> usize {
        let mut state = self.state.lock();
        let mut count = 0;
        for slot in state.requests.values_mut().filter(|s| s.is_none()) {
            *slot = Some(rand::random());
            count += 1;
        }
        count
    }

    #[must_use]
    pub fn entropy(&self, ticket: OracleTicket) -> Option<[u8; 32]> {
        self.state.lock().requests.get(&ticket).copied().flatten()
    }

    #[must_use]
    pub fn tag(&self, ticket: OracleTicket) -> Option<String> {
        self.state.lock().tags.get(&ticket).cloned()
    }

    pub fn set_fee(&self, fee: Fee) {
        self.state.lock().fee = fee;
    }

    /// Simulate an outage: while offline every call fails.
    pub fn set_online(&self, online: bool) {
        self.state.lock().online = online;
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// Total fees received.
    #[must_use]
    pub fn collected_fees(&self) -> Fee {
        self.state.lock().collected
    }

    fn check_online(state: &OracleState) -> Result<()> {
        if state.online {
            Ok(())
        } else {
            Err(SealswapError::OracleUnavailable {
                reason: "mock oracle offline".to_string(),
            })
        }
    }
}

impl EntropyOracle for MockEntropyOracle {
    fn id(&self) -> OracleId {
        self.id
    }

    fn fee(&self) -> Result<Fee> {
        let state = self.state.lock();
        Self::check_online(&state)?;
        Ok(state.fee)
    }

    fn request_entropy(&self, tag: &str, fee_paid: Fee) -> Result<OracleTicket> {
        let mut state = self.state.lock();
        Self::check_online(&state)?;
        if fee_paid < state.fee {
            return Err(SealswapError::InsufficientFee {
                required: state.fee,
                paid: fee_paid,
            });
        }
        let ticket = OracleTicket(state.next_ticket);
        state.next_ticket += 1;
        state.requests.insert(ticket, None);
        state.tags.insert(ticket, tag.to_string());
        state.collected += fee_paid;
        Ok(ticket)
    }

    fn is_request_fulfilled(&self, ticket: OracleTicket) -> Result<bool> {
        let state = self.state.lock();
        Self::check_online(&state)?;
        Ok(matches!(state.requests.get(&ticket), Some(Some(_))))
    }
}
