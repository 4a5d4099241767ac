//! # Confidential values
//!
//! A [`ConfidentialValue`] is a handle to an encrypted `u64` living inside a
//! [`ConfidentialBackend`]. The handle is all the ledger ever sees: the
//! backend performs `add`, `sub` and `mul` on ciphertexts and hands back new
//! handles.
//!
//! There is no comparison. `ConfidentialValue` does not
//! implement `PartialEq` or `Ord`, and the backend exposes no encrypted
//! `lt`/`select`. Consequently nothing in SealSwap can check that a balance
//! covers a withdrawal; subtraction is unconditional.
//!
//! ## Access control
//!
//! Ciphertexts carry an access list. A value imported from outside with
//! [`ConfidentialBackend::from_external`] must be granted to the ledger with
//! [`ConfidentialBackend::allow_this`] before it can be used in arithmetic,
//! otherwise the backend answers [`SealswapError::NotAllowed`].
//!
//! [`SealswapError::NotAllowed`]: crate::SealswapError::NotAllowed

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AccountId, Result};

/// Identity of a ciphertext object inside a backend.
///
/// Two equal handles are the same ciphertext; two different handles may
/// still encrypt the same plaintext.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CipherHandle(pub [u8; 32]);

impl CipherHandle {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CipherHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ct:{}", hex::encode(&self.0[..8]))
    }
}

/// Opaque encrypted 64-bit unsigned integer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConfidentialValue {
    handle: CipherHandle,
}

impl ConfidentialValue {
    /// Wrap a backend handle. Only backends should need this.
    #[must_use]
    pub fn from_handle(handle: CipherHandle) -> Self {
        Self { handle }
    }

    #[must_use]
    pub fn handle(&self) -> CipherHandle {
        self.handle
    }
}

/// Handle of a ciphertext produced outside the backend (e.g. by a client).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExternalHandle(pub [u8; 32]);

impl fmt::Display for ExternalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ext:{}", hex::encode(&self.0[..8]))
    }
}

/// Zero-knowledge input proof accompanying an [`ExternalHandle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof(pub Vec<u8>);

/// A client-encrypted value plus the proof that binds it to its submitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalInput {
    pub handle: ExternalHandle,
    pub proof: InputProof,
}

/// Confidential arithmetic capability.
///
/// Implementations own the ciphertexts; callers only pass handles around.
/// Every call is synchronous and may fail.
pub trait ConfidentialBackend: Send + Sync {
    /// Encrypt a public constant. The result is usable by the ledger.
    fn trivial_encrypt(&self, value: u64) -> Result<ConfidentialValue>;

    /// Import a client ciphertext. The proof must bind `input` to
    /// `importer`, else `InvalidProof`. The returned value is not usable in
    /// arithmetic until [`allow_this`](Self::allow_this) is called on it.
    fn from_external(&self, input: &ExternalInput, importer: AccountId)
    -> Result<ConfidentialValue>;

    /// Grant the ledger itself persistent use of `value`.
    fn allow_this(&self, value: &ConfidentialValue) -> Result<()>;

    /// Grant `account` use (and decryption rights) of `value`.
    fn allow(&self, value: &ConfidentialValue, account: AccountId) -> Result<()>;

    fn add(&self, lhs: &ConfidentialValue, rhs: &ConfidentialValue) -> Result<ConfidentialValue>;

    /// Unchecked: the backend decides what happens below zero.
    fn sub(&self, lhs: &ConfidentialValue, rhs: &ConfidentialValue) -> Result<ConfidentialValue>;

    /// Unchecked: no overflow detection is possible on ciphertexts.
    fn mul(&self, lhs: &ConfidentialValue, rhs: &ConfidentialValue) -> Result<ConfidentialValue>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_display_is_truncated_hex() {
        let h = CipherHandle([0xab; 32]);
        assert_eq!(h.to_string(), "ct:abababababababab");
    }

    #[test]
    fn value_exposes_handle() {
        let h = CipherHandle([3u8; 32]);
        let v = ConfidentialValue::from_handle(h);
        assert_eq!(v.handle(), h);
    }

    #[test]
    fn external_input_serde_roundtrip() {
        let input = ExternalInput {
            handle: ExternalHandle([9u8; 32]),
            proof: InputProof(vec![1, 2, 3]),
        };
        let json = serde_json::to_string(&input).unwrap();
        let back: ExternalInput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.handle, input.handle);
        assert_eq!(back.proof, input.proof);
    }
}
