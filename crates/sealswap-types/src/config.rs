//! Construction-time configuration for a swap engine.

use serde::{Deserialize, Serialize};

use crate::{AccountId, AssetPair, OracleId, Result, SealswapError, TokenId, constants};

/// Everything needed to stand up a swap engine, apart from the backend
/// capabilities and the initial exchange rate ciphertext.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwapConfig {
    /// The entropy oracle gating every swap.
    pub oracle: OracleId,
    /// Token bound to asset class A (the side a swap withdraws).
    pub token_a: TokenId,
    /// Token bound to asset class B (the side a swap credits).
    pub token_b: TokenId,
    /// The only account allowed to replace the exchange rate.
    pub admin: AccountId,
    /// Tag forwarded to the oracle with every entropy request.
    #[serde(default = "default_request_tag")]
    pub request_tag: String,
}

fn default_request_tag() -> String {
    constants::DEFAULT_REQUEST_TAG.to_string()
}

impl SwapConfig {
    #[must_use]
    pub fn new(oracle: OracleId, token_a: TokenId, token_b: TokenId, admin: AccountId) -> Self {
        Self {
            oracle,
            token_a,
            token_b,
            admin,
            request_tag: default_request_tag(),
        }
    }

    /// Parse and validate a JSON config document.
    pub fn from_json(raw: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the config and return the asset pair it describes.
    ///
    /// # Errors
    /// `InvalidConfig` if the oracle or admin is null, the request tag is
    /// empty, or the token ids are null or identical.
    pub fn validate(&self) -> Result<AssetPair> {
        if self.oracle.is_null() {
            return Err(SealswapError::InvalidConfig {
                reason: "oracle address must be non-null".to_string(),
            });
        }
        if self.admin.is_null() {
            return Err(SealswapError::InvalidConfig {
                reason: "admin account must be non-null".to_string(),
            });
        }
        if self.request_tag.trim().is_empty() {
            return Err(SealswapError::InvalidConfig {
                reason: "request tag must not be empty".to_string(),
            });
        }
        AssetPair::new(self.token_a, self.token_b)
    }
}
