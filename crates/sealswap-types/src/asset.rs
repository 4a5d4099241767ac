//! The two asset classes a swap ledger trades between.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Result, SealswapError, TokenId};

/// One side of the swap pair. A swap always withdraws `A` and credits `B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum AssetClass {
    A,
    B,
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
        }
    }
}

/// Binding of the two asset classes to their token contracts.
///
/// Only constructible through [`AssetPair::new`], which rejects null and
/// identical token ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetPair {
    token_a: TokenId,
    token_b: TokenId,
}

impl AssetPair {
    /// # Errors
    /// Returns `InvalidConfig` if either token is null or both are the same.
    pub fn new(token_a: TokenId, token_b: TokenId) -> Result<Self> {
        if token_a.is_null() || token_b.is_null() {
            return Err(SealswapError::InvalidConfig {
                reason: "token addresses must be non-null".to_string(),
            });
        }
        if token_a == token_b {
            return Err(SealswapError::InvalidConfig {
                reason: format!("token A and token B are both {token_a}"),
            });
        }
        Ok(Self { token_a, token_b })
    }

    #[must_use]
    pub fn token(&self, asset: AssetClass) -> TokenId {
        match asset {
            AssetClass::A => self.token_a,
            AssetClass::B => self.token_b,
        }
    }
}
