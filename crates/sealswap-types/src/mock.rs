//! In-memory [`ConfidentialBackend`] for tests.
//!
//! Keeps plaintexts in a table keyed by handle and enforces the same access
//! rules a real coprocessor would: imported values need `allow_this` before
//! arithmetic, and only accounts on a ciphertext's access list may decrypt
//! it. Arithmetic wraps modulo 2^64.

use std::collections::{HashMap, HashSet};

use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::{
    AccountId, CipherHandle, ConfidentialBackend, ConfidentialValue, ExternalHandle,
    ExternalInput, InputProof, Result, SealswapError, constants,
};

struct Slot {
    plaintext: u64,
    /// Whether the ledger may use this ciphertext.
    contract: bool,
    accounts: HashSet<AccountId>,
}

#[derive(Default)]
struct MockState {
    next: u64,
    slots: HashMap<CipherHandle, Slot>,
    /// Client-side encryptions waiting to be imported.
    inputs: HashMap<ExternalHandle, u64>,
}

impl MockState {
    fn fresh_handle(&mut self) -> CipherHandle {
        let mut hasher = Sha256::new();
        hasher.update(constants::CIPHER_HANDLE_DOMAIN);
        hasher.update(self.next.to_le_bytes());
        self.next += 1;
        CipherHandle(hasher.finalize().into())
    }

    fn insert(&mut self, plaintext: u64, contract: bool) -> ConfidentialValue {
        let handle = self.fresh_handle();
        self.slots.insert(
            handle,
            Slot {
                plaintext,
                contract,
                accounts: HashSet::new(),
            },
        );
        ConfidentialValue::from_handle(handle)
    }

    fn usable(&self, value: &ConfidentialValue) -> Result<u64> {
        match self.slots.get(&value.handle()) {
            Some(slot) if slot.contract => Ok(slot.plaintext),
            _ => Err(SealswapError::NotAllowed {
                handle: value.handle(),
            }),
        }
    }
}

fn proof_for(handle: &ExternalHandle, owner: AccountId) -> InputProof {
    let mut hasher = Sha256::new();
    hasher.update(constants::INPUT_PROOF_DOMAIN);
    hasher.update(handle.0);
    hasher.update(owner.as_bytes());
    InputProof(hasher.finalize().to_vec())
}

/// Plaintext-backed stand-in for a confidential coprocessor.
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
}

impl MockBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Client-side encryption: produce an input only `owner` can import.
    pub fn encrypt_input(&self, value: u64, owner: AccountId) -> ExternalInput {
        let handle = ExternalHandle(rand::random());
        self.state.lock().inputs.insert(handle, value);
        ExternalInput {
            proof: proof_for(&handle, owner),
            handle,
        }
    }

    /// Test-harness decryption, ignoring access lists.
    #[must_use]
    pub fn decrypt(&self, value: &ConfidentialValue) -> Option<u64> {
        self.state
            .lock()
            .slots
            .get(&value.handle())
            .map(|slot| slot.plaintext)
    }

    /// User decryption: succeeds only if `account` was granted the value.
    pub fn decrypt_for(&self, value: &ConfidentialValue, account: AccountId) -> Result<u64> {
        match self.state.lock().slots.get(&value.handle()) {
            Some(slot) if slot.accounts.contains(&account) => Ok(slot.plaintext),
            _ => Err(SealswapError::NotAllowed {
                handle: value.handle(),
            }),
        }
    }

    /// Number of ciphertexts created so far.
    #[must_use]
    pub fn ciphertext_count(&self) -> usize {
        self.state.lock().slots.len()
    }
}

impl ConfidentialBackend for MockBackend {
    fn trivial_encrypt(&self, value: u64) -> Result<ConfidentialValue> {
        Ok(self.state.lock().insert(value, true))
    }

    fn from_external(
        &self,
        input: &ExternalInput,
        importer: AccountId,
    ) -> Result<ConfidentialValue> {
        let mut state = self.state.lock();
        let plaintext =
            *state
                .inputs
                .get(&input.handle)
                .ok_or_else(|| SealswapError::InvalidProof {
                    reason: format!("unknown external handle {}", input.handle),
                })?;
        if proof_for(&input.handle, importer) != input.proof {
            return Err(SealswapError::InvalidProof {
                reason: format!("proof for {} is not bound to {importer}", input.handle),
            });
        }
        let value = state.insert(plaintext, false);
        if let Some(slot) = state.slots.get_mut(&value.handle()) {
            slot.accounts.insert(importer);
        }
        Ok(value)
    }

    fn allow_this(&self, value: &ConfidentialValue) -> Result<()> {
        let mut state = self.state.lock();
        let slot = state
            .slots
            .get_mut(&value.handle())
            .ok_or(SealswapError::NotAllowed {
                handle: value.handle(),
            })?;
        slot.contract = true;
        Ok(())
    }

    fn allow(&self, value: &ConfidentialValue, account: AccountId) -> Result<()> {
        let mut state = self.state.lock();
        state.usable(value)?;
        if let Some(slot) = state.slots.get_mut(&value.handle()) {
            slot.accounts.insert(account);
        }
        Ok(())
    }

    fn add(&self, lhs: &ConfidentialValue, rhs: &ConfidentialValue) -> Result<ConfidentialValue> {
        let mut state = self.state.lock();
        let sum = state.usable(lhs)?.wrapping_add(state.usable(rhs)?);
        Ok(state.insert(sum, true))
    }

    fn sub(&self, lhs: &ConfidentialValue, rhs: &ConfidentialValue) -> Result<ConfidentialValue> {
        let mut state = self.state.lock();
        let diff = state.usable(lhs)?.wrapping_sub(state.usable(rhs)?);
        Ok(state.insert(diff, true))
    }

    fn mul(&self, lhs: &ConfidentialValue, rhs: &ConfidentialValue) -> Result<ConfidentialValue> {
        let mut state = self.state.lock();
        let product = state.usable(lhs)?.wrapping_mul(state.usable(rhs)?);
        Ok(state.insert(product, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: AccountId = AccountId([1u8; 20]);
    const MALLORY: AccountId = AccountId([2u8; 20]);

    #[test]
    fn arithmetic_on_trivial_values() {
        let fhe = MockBackend::new();
        let a = fhe.trivial_encrypt(7).unwrap();
        let b = fhe.trivial_encrypt(5).unwrap();
        assert_eq!(fhe.decrypt(&fhe.add(&a, &b).unwrap()), Some(12));
        assert_eq!(fhe.decrypt(&fhe.sub(&a, &b).unwrap()), Some(2));
        assert_eq!(fhe.decrypt(&fhe.mul(&a, &b).unwrap()), Some(35));
    }

    #[test]
    fn subtraction_wraps_below_zero() {
        let fhe = MockBackend::new();
        let a = fhe.trivial_encrypt(1).unwrap();
        let b = fhe.trivial_encrypt(2).unwrap();
        assert_eq!(fhe.decrypt(&fhe.sub(&a, &b).unwrap()), Some(u64::MAX));
    }

    #[test]
    fn import_requires_allow_this() {
        let fhe = MockBackend::new();
        let input = fhe.encrypt_input(40, ALICE);
        let v = fhe.from_external(&input, ALICE).unwrap();
        let one = fhe.trivial_encrypt(1).unwrap();

        let err = fhe.add(&v, &one).unwrap_err();
        assert!(matches!(err, SealswapError::NotAllowed { handle } if handle == v.handle()));

        fhe.allow_this(&v).unwrap();
        assert_eq!(fhe.decrypt(&fhe.add(&v, &one).unwrap()), Some(41));
    }

    #[test]
    fn proof_is_bound_to_owner() {
        let fhe = MockBackend::new();
        let input = fhe.encrypt_input(40, ALICE);
        let err = fhe.from_external(&input, MALLORY).unwrap_err();
        assert!(matches!(err, SealswapError::InvalidProof { .. }));
    }

    #[test]
    fn tampered_proof_rejected() {
        let fhe = MockBackend::new();
        let mut input = fhe.encrypt_input(40, ALICE);
        input.proof.0[0] ^= 0xff;
        assert!(matches!(
            fhe.from_external(&input, ALICE),
            Err(SealswapError::InvalidProof { .. })
        ));
    }

    #[test]
    fn unknown_external_handle_rejected() {
        let fhe = MockBackend::new();
        let input = ExternalInput {
            handle: ExternalHandle([5u8; 32]),
            proof: InputProof(vec![]),
        };
        assert!(matches!(
            fhe.from_external(&input, ALICE),
            Err(SealswapError::InvalidProof { .. })
        ));
    }

    #[test]
    fn user_decryption_follows_grants() {
        let fhe = MockBackend::new();
        let v = fhe.trivial_encrypt(9).unwrap();
        assert!(fhe.decrypt_for(&v, ALICE).is_err());
        fhe.allow(&v, ALICE).unwrap();
        assert_eq!(fhe.decrypt_for(&v, ALICE).unwrap(), 9);
        assert!(fhe.decrypt_for(&v, MALLORY).is_err());
    }

    #[test]
    fn handles_are_distinct() {
        let fhe = MockBackend::new();
        let a = fhe.trivial_encrypt(1).unwrap();
        let b = fhe.trivial_encrypt(1).unwrap();
        assert_ne!(a.handle(), b.handle());
        assert_eq!(fhe.ciphertext_count(), 2);
    }
}
