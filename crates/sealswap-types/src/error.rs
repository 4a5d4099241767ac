//! Error types for SealSwap.
//!
//! All errors use the `SS_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Configuration errors
//! - 2xx: Fee / oracle errors
//! - 3xx: Confidential value errors
//! - 4xx: Request lifecycle errors
//! - 9xx: General / internal errors
//!
//! Every error except `InvalidConfig` is caller-recoverable: the rejected
//! call leaves no observable state behind.

use thiserror::Error;

use crate::{AccountId, CipherHandle, Fee, RequestId, RequestStatus};

/// Central error enum for all SealSwap operations.
#[derive(Debug, Error)]
pub enum SealswapError {
    // =================================================================
    // Configuration Errors (1xx)
    // =================================================================
    /// Construction-time configuration is unusable. Fatal: the ledger or
    /// engine is never built.
    #[error("SS_ERR_100: Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // =================================================================
    // Fee / Oracle Errors (2xx)
    // =================================================================
    /// The caller paid less than the oracle's current fee.
    #[error("SS_ERR_200: Insufficient fee: required {required}, paid {paid}")]
    InsufficientFee { required: Fee, paid: Fee },

    /// A round-trip to the external entropy oracle failed.
    #[error("SS_ERR_201: Oracle unavailable: {reason}")]
    OracleUnavailable { reason: String },

    // =================================================================
    // Confidential Value Errors (3xx)
    // =================================================================
    /// An external ciphertext came with a malformed or foreign proof.
    #[error("SS_ERR_300: Invalid input proof: {reason}")]
    InvalidProof { reason: String },

    /// A ciphertext was used without having been granted to the user of it.
    #[error("SS_ERR_301: Ciphertext {handle} not allowed")]
    NotAllowed { handle: CipherHandle },

    // =================================================================
    // Request Lifecycle Errors (4xx)
    // =================================================================
    /// No such request: never created, or already consumed.
    #[error("SS_ERR_400: Request not found: {0}")]
    NotFound(RequestId),

    /// The request exists but the oracle has not fulfilled it yet.
    #[error("SS_ERR_401: Request {id} not fulfilled (status {status})")]
    NotFulfilled { id: RequestId, status: RequestStatus },

    /// The caller is not allowed to perform this operation.
    #[error("SS_ERR_402: Unauthorized: {caller} {reason}")]
    Unauthorized { caller: AccountId, reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("SS_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("SS_ERR_901: Serialization error: {0}")]
    Serialization(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, SealswapError>;

impl From<serde_json::Error> for SealswapError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
