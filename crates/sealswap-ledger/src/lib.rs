//! # sealswap-ledger
//!
//! **Request registry, guarded swap ledger, and the engine boundary.**
//!
//! ## Architecture
//!
//! 1. **RequestRegistry**: issues request ids, tracks owner and status
//! 2. **BalanceBook**: stores one ciphertext handle per (account, asset)
//! 3. **SwapLedger**: applies the guarded transition under a fixed lock order
//! 4. **SwapEngine**: fee check, oracle polling, ciphertext import, events
//!
//! ## Swap Flow
//!
//! ```text
//! request_swap() → FulfillmentGate.submit() → RequestRegistry.create()
//!     … oracle fulfils out of band …
//! swap() → FulfillmentGate.is_fulfilled() → RequestRegistry.mark_fulfilled()
//!        → SwapLedger.swap() → RequestRegistry.consume() + balance writes
//! ```
//!
//! A request is consumed at most once; every failed call leaves the
//! ledger exactly as it was.

pub mod balances;
pub mod engine;
pub mod registry;
pub mod swap_ledger;

pub use balances::BalanceBook;
pub use engine::SwapEngine;
pub use registry::RequestRegistry;
pub use swap_ledger::{SwapLedger, SwapOutcome};
