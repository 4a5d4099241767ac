//! Events surfaced to the outside world for audit and indexing.
//!
//! Nothing inside SealSwap reads these back; the engine only appends them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetClass, CipherHandle, RequestId, TokenId};

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SwapEventKind {
    /// A request was opened with the oracle.
    SwapRequested {
        account: AccountId,
        request_id: RequestId,
    },
    /// A request was consumed by a successful swap.
    Swapped {
        account: AccountId,
        asset_in: TokenId,
        asset_out: TokenId,
        amount_in_handle: CipherHandle,
        amount_out_handle: CipherHandle,
    },
    /// An account topped up one side of the pair.
    Deposited {
        account: AccountId,
        asset: AssetClass,
        amount_handle: CipherHandle,
    },
    /// The admin replaced the encrypted exchange rate.
    ExchangeRateUpdated { rate_handle: CipherHandle },
}

/// An event plus its position in the engine's journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapEvent {
    /// Strictly increasing per engine, starting at 0.
    pub sequence: u64,
    pub kind: SwapEventKind,
    pub emitted_at: DateTime<Utc>,
}
