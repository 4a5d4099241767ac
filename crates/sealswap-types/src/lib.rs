//! # sealswap-types
//!
//! Shared types, errors, and configuration for **SealSwap**.
//!
//! This crate is the leaf dependency of the workspace; every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`TokenId`], [`OracleId`], [`RequestId`], [`OracleTicket`]
//! - **Assets**: [`AssetClass`], [`AssetPair`]
//! - **Confidential values**: [`ConfidentialValue`], [`CipherHandle`], [`ExternalInput`], [`ConfidentialBackend`]
//! - **Request model**: [`SwapRequest`], [`RequestStatus`]
//! - **Events**: [`SwapEvent`], [`SwapEventKind`]
//! - **Configuration**: [`SwapConfig`]
//! - **Errors**: [`SealswapError`] with `SS_ERR_` prefix codes
//! - **Constants**: system-wide defaults
//!
//! With the `test-helpers` feature it also exports [`mock::MockBackend`].

pub mod asset;
pub mod confidential;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod ids;
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;
pub mod request;

pub use asset::*;
pub use confidential::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use request::*;

// Constants are accessed via `sealswap_types::constants::FOO`
// (not re-exported to avoid name collisions).
