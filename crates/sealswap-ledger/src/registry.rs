//! Request registry: issues request ids and tracks who owns them.
//!
//! Like a UTXO set: a request exists until it is consumed, after which
//! its id is gone for good. Consuming an id a second time answers
//! [`SealswapError::NotFound`].
//!
//! The registry itself is not synchronised. [`SwapLedger`](crate::SwapLedger)
//! owns it behind a mutex and holds that mutex across every
//! check-and-consume.

use std::collections::HashMap;

use sealswap_types::{
    AccountId, OracleTicket, RequestId, RequestStatus, Result, SealswapError, SwapRequest,
    constants,
};

/// Outstanding swap requests keyed by id.
pub struct RequestRegistry {
    requests: HashMap<RequestId, SwapRequest>,
    /// Next id to issue. Only ever grows.
    next_id: RequestId,
    /// Requests ever created, consumed or not.
    total_requests: u64,
}

impl RequestRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            requests: HashMap::new(),
            next_id: RequestId(constants::FIRST_REQUEST_ID),
            total_requests: 0,
        }
    }

    /// Open a request whose fulfillment will be pushed in through
    /// [`mark_fulfilled`](Self::mark_fulfilled).
    pub fn create(&mut self, owner: AccountId) -> RequestId {
        self.insert(owner, None)
    }

    /// Open a request backed by an oracle ticket that can be polled.
    pub fn create_with_ticket(&mut self, owner: AccountId, ticket: OracleTicket) -> RequestId {
        self.insert(owner, Some(ticket))
    }

    fn insert(&mut self, owner: AccountId, ticket: Option<OracleTicket>) -> RequestId {
        let id = self.next_id;
        self.next_id = id.next();
        self.total_requests += 1;
        self.requests.insert(id, SwapRequest::new(id, owner, ticket));
        tracing::debug!(%id, owner = %owner.short(), "request created");
        id
    }

    /// Look up a request. `None` if it was never created or is consumed.
    #[must_use]
    pub fn get(&self, id: RequestId) -> Option<&SwapRequest> {
        self.requests.get(&id)
    }

    /// Record that the oracle fulfilled `id`. Re-marking a fulfilled
    /// request is a no-op.
    ///
    /// # Errors
    /// `NotFound` if `id` is absent.
    pub fn mark_fulfilled(&mut self, id: RequestId) -> Result<()> {
        let request = self
            .requests
            .get_mut(&id)
            .ok_or(SealswapError::NotFound(id))?;
        let was_pending = request.status == RequestStatus::Pending;
        request.mark_fulfilled()?;
        if was_pending {
            tracing::debug!(%id, "request fulfilled");
        }
        Ok(())
    }

    /// Every check [`consume`](Self::consume) makes, without mutating.
    ///
    /// Checks run in this order: existence, ownership, fulfillment. A
    /// stranger therefore learns nothing about the request's status.
    ///
    /// # Errors
    /// - `NotFound` if `id` is absent
    /// - `Unauthorized` if `caller` does not own the request
    /// - `NotFulfilled` if the request is still pending
    pub fn check_consumable(&self, id: RequestId, caller: AccountId) -> Result<&SwapRequest> {
        let request = self.requests.get(&id).ok_or(SealswapError::NotFound(id))?;
        if request.owner != caller {
            return Err(SealswapError::Unauthorized {
                caller,
                reason: format!("does not own {id}"),
            });
        }
        if !request.is_fulfilled() {
            return Err(SealswapError::NotFulfilled {
                id,
                status: request.status,
            });
        }
        Ok(request)
    }

    /// Check and remove in one step. On success the returned request is
    /// `Consumed` and `id` will answer `NotFound` from now on.
    ///
    /// # Errors
    /// Same as [`check_consumable`](Self::check_consumable). On error the
    /// registry is unchanged.
    pub fn consume(&mut self, id: RequestId, caller: AccountId) -> Result<SwapRequest> {
        self.check_consumable(id, caller)?;
        let mut request = self
            .requests
            .remove(&id)
            .ok_or(SealswapError::NotFound(id))?;
        request.mark_consumed()?;
        tracing::debug!(%id, owner = %caller.short(), "request consumed");
        Ok(request)
    }

    /// Requests ever created.
    #[must_use]
    pub fn total_requests(&self) -> u64 {
        self.total_requests
    }

    /// Ids of pending requests that carry an oracle ticket, oldest first.
    #[must_use]
    pub fn pending_tickets(&self) -> Vec<(RequestId, OracleTicket)> {
        let mut pending: Vec<_> = self
            .requests
            .values()
            .filter(|r| r.status == RequestStatus::Pending)
            .filter_map(|r| r.ticket.map(|t| (r.id, t)))
            .collect();
        pending.sort_unstable_by_key(|(id, _)| *id);
        pending
    }

    /// Requests not yet consumed.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.requests.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new()
    }
}
