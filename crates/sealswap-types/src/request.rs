//! # SwapRequest: the oracle-gated single-use permit
//!
//! A request is opened before a swap and consumed by it.
//!
//! ## State Machine
//!
//! ```text
//!   ┌─────────┐  oracle fulfils  ┌───────────┐  swap succeeds  ┌──────────┐
//!   │ PENDING ├─────────────────▶│ FULFILLED ├────────────────▶│ CONSUMED │
//!   └─────────┘                  └───────────┘                 └──────────┘
//! ```
//!
//! - `Pending -> Fulfilled` is observed from the external oracle.
//! - `Fulfilled -> Consumed` happens exactly once and removes the request
//!   from the registry; its id is never issued again.
//! - There is no expiry. A request the oracle never fulfils stays pending.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, OracleTicket, RequestId, Result, SealswapError};

/// Lifecycle state of a [`SwapRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Waiting for the oracle.
    Pending,
    /// The oracle has delivered; the owner may swap.
    Fulfilled,
    /// Used by a swap. Terminal.
    Consumed,
}

impl RequestStatus {
    /// Can a request in this state move to `target`?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending, Self::Fulfilled) | (Self::Fulfilled, Self::Consumed)
        )
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Fulfilled => write!(f, "FULFILLED"),
            Self::Consumed => write!(f, "CONSUMED"),
        }
    }
}

/// An outstanding swap request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapRequest {
    pub id: RequestId,
    /// Only the owner may consume the request.
    pub owner: AccountId,
    pub status: RequestStatus,
    /// The oracle's id for the underlying entropy request. `None` for
    /// requests whose fulfillment is pushed in by callback instead of polled.
    pub ticket: Option<OracleTicket>,
    pub created_at: DateTime<Utc>,
    pub fulfilled_at: Option<DateTime<Utc>>,
}

impl SwapRequest {
    #[must_use]
    pub fn new(id: RequestId, owner: AccountId, ticket: Option<OracleTicket>) -> Self {
        Self {
            id,
            owner,
            status: RequestStatus::Pending,
            ticket,
            created_at: Utc::now(),
            fulfilled_at: None,
        }
    }

    #[must_use]
    pub fn is_fulfilled(&self) -> bool {
        self.status == RequestStatus::Fulfilled
    }

    /// Re-observing a fulfilled request is a no-op.
    ///
    /// # Errors
    /// `Internal` if the request is already `Consumed`. The registry drops
    /// consumed requests, so this only fires on a detached copy.
    pub fn mark_fulfilled(&mut self) -> Result<()> {
        match self.status {
            RequestStatus::Fulfilled => Ok(()),
            RequestStatus::Pending => {
                self.status = RequestStatus::Fulfilled;
                self.fulfilled_at = Some(Utc::now());
                Ok(())
            }
            RequestStatus::Consumed => Err(SealswapError::Internal(format!(
                "{} fulfilled after consumption",
                self.id
            ))),
        }
    }

    /// # Errors
    /// Returns `NotFulfilled` if the request is not `Fulfilled`.
    pub fn mark_consumed(&mut self) -> Result<()> {
        if !self.status.can_transition_to(RequestStatus::Consumed) {
            return Err(SealswapError::NotFulfilled {
                id: self.id,
                status: self.status,
            });
        }
        self.status = RequestStatus::Consumed;
        Ok(())
    }
}
