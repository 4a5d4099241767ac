//! # sealswap-oracle
//!
//! **Fulfillment gate**: the only place SealSwap talks to the external
//! entropy oracle.
//!
//! ## Architecture
//!
//! The oracle is a collaborator, not a component. SealSwap never implements
//! it; it calls through the [`EntropyOracle`] trait:
//! 1. `fee()` is quoted before a request is opened
//! 2. `request_entropy()` opens a request and returns the oracle's ticket
//! 3. `is_request_fulfilled()` is polled, one synchronous call at a time
//!
//! [`FulfillmentGate`] wraps a provider with the fee check and logging.
//! Waiting, if any, happens outside: callers re-poll, nothing here blocks
//! or retries.

pub mod gate;
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;

pub use gate::{EntropyOracle, FulfillmentGate};
#[cfg(any(test, feature = "test-helpers"))]
pub use mock::MockEntropyOracle;
