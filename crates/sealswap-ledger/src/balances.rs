//! Per-(account, asset) confidential balance storage.
//!
//! Pure storage: the book never touches a backend. Arithmetic happens in
//! [`SwapLedger`](crate::SwapLedger), which writes the resulting handles
//! back here only once every step of an operation has succeeded.

use std::collections::HashMap;

use sealswap_types::{AccountId, AssetClass, ConfidentialValue};

/// Holds the current ciphertext handle of every funded balance.
#[derive(Default)]
pub struct BalanceBook {
    balances: HashMap<(AccountId, AssetClass), ConfidentialValue>,
}

impl BalanceBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored handle, or `None` for a balance that was never written.
    #[must_use]
    pub fn get(&self, account: AccountId, asset: AssetClass) -> Option<ConfidentialValue> {
        self.balances.get(&(account, asset)).copied()
    }

    /// Replace the handle for a balance. The previous one is dropped.
    pub fn set(&mut self, account: AccountId, asset: AssetClass, value: ConfidentialValue) {
        self.balances.insert((account, asset), value);
    }

    /// Accounts with at least one written balance.
    #[must_use]
    pub fn account_count(&self) -> usize {
        let mut accounts: Vec<_> = self.balances.keys().map(|(a, _)| *a).collect();
        accounts.sort_unstable();
        accounts.dedup();
        accounts.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sealswap_types::CipherHandle;

    fn value(byte: u8) -> ConfidentialValue {
        ConfidentialValue::from_handle(CipherHandle([byte; 32]))
    }

    #[test]
    fn unwritten_balance_is_none() {
        let book = BalanceBook::new();
        assert!(book.get(AccountId([1u8; 20]), AssetClass::A).is_none());
        assert!(book.is_empty());
    }

    #[test]
    fn set_replaces_per_asset() {
        let mut book = BalanceBook::new();
        let alice = AccountId([1u8; 20]);
        book.set(alice, AssetClass::A, value(1));
        book.set(alice, AssetClass::A, value(2));
        book.set(alice, AssetClass::B, value(3));

        assert_eq!(
            book.get(alice, AssetClass::A).unwrap().handle(),
            CipherHandle([2u8; 32])
        );
        assert_eq!(
            book.get(alice, AssetClass::B).unwrap().handle(),
            CipherHandle([3u8; 32])
        );
        assert_eq!(book.len(), 2);
        assert_eq!(book.account_count(), 1);
    }
}
