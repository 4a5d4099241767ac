//! Fulfillment gate over a pluggable entropy oracle.

use std::sync::Arc;

use sealswap_types::{Fee, OracleId, OracleTicket, Result, SealswapError};

/// The external entropy provider.
///
/// Every call is a synchronous, fallible, single-shot round-trip. A failed
/// call is reported as `OracleUnavailable`; callers retry by calling again.
pub trait EntropyOracle: Send + Sync {
    /// Address the provider answers on.
    fn id(&self) -> OracleId;

    /// Current fee for one entropy request.
    fn fee(&self) -> Result<Fee>;

    /// Open an entropy request. The provider fulfils it out of band.
    fn request_entropy(&self, tag: &str, fee_paid: Fee) -> Result<OracleTicket>;

    /// Point-in-time fulfillment check.
    fn is_request_fulfilled(&self, ticket: OracleTicket) -> Result<bool>;
}

/// Decides whether an oracle request is ready to be consumed.
pub struct FulfillmentGate<O> {
    oracle: Arc<O>,
}

impl<O: EntropyOracle> FulfillmentGate<O> {
    /// Bind the gate to `oracle`, which must answer on `expected`.
    ///
    /// # Errors
    /// `InvalidConfig` if `expected` is null or names a different oracle.
    pub fn new(oracle: Arc<O>, expected: OracleId) -> Result<Self> {
        if expected.is_null() {
            return Err(SealswapError::InvalidConfig {
                reason: "oracle address must be non-null".to_string(),
            });
        }
        if oracle.id() != expected {
            return Err(SealswapError::InvalidConfig {
                reason: format!("configured {expected} but provider answers as {}", oracle.id()),
            });
        }
        Ok(Self { oracle })
    }

    /// Fee the caller must supply before a request is opened.
    pub fn required_fee(&self) -> Result<Fee> {
        self.oracle.fee()
    }

    /// Quote the fee and reject an underpayment.
    ///
    /// # Errors
    /// `InsufficientFee` if `paid` is below the current fee.
    pub fn ensure_fee(&self, paid: Fee) -> Result<Fee> {
        let required = self.required_fee()?;
        if paid < required {
            tracing::debug!(required, paid, "entropy fee underpaid");
            return Err(SealswapError::InsufficientFee { required, paid });
        }
        Ok(required)
    }

    /// Forward a request to the oracle.
    pub fn submit(&self, tag: &str, fee_paid: Fee) -> Result<OracleTicket> {
        let ticket = self.oracle.request_entropy(tag, fee_paid)?;
        tracing::debug!(%ticket, tag, fee_paid, "entropy requested");
        Ok(ticket)
    }

    /// Ask the oracle whether `ticket` has been fulfilled. Never blocks
    /// beyond the single round-trip.
    pub fn is_fulfilled(&self, ticket: OracleTicket) -> Result<bool> {
        let fulfilled = self.oracle.is_request_fulfilled(ticket)?;
        if !fulfilled {
            tracing::trace!(%ticket, "entropy still pending");
        }
        Ok(fulfilled)
    }

    #[must_use]
    pub fn oracle(&self) -> &Arc<O> {
        &self.oracle
    }

    #[must_use]
    pub fn oracle_id(&self) -> OracleId {
        self.oracle.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockEntropyOracle;

    const ORACLE: OracleId = OracleId([9u8; 20]);

    fn gate(fee: Fee) -> FulfillmentGate<MockEntropyOracle> {
        FulfillmentGate::new(Arc::new(MockEntropyOracle::new(ORACLE, fee)), ORACLE).unwrap()
    }

    #[test]
    fn mismatched_oracle_rejected() {
        let oracle = Arc::new(MockEntropyOracle::new(ORACLE, 1));
        let err = FulfillmentGate::new(oracle, OracleId([8u8; 20]))
            .err()
            .unwrap();
        assert!(matches!(err, SealswapError::InvalidConfig { .. }));
    }

    #[test]
    fn null_oracle_rejected() {
        let oracle = Arc::new(MockEntropyOracle::new(ORACLE, 1));
        assert!(FulfillmentGate::new(oracle, OracleId::NULL).is_err());
    }

    #[test]
    fn fee_check() {
        let gate = gate(100);
        assert_eq!(gate.required_fee().unwrap(), 100);
        assert_eq!(gate.ensure_fee(100).unwrap(), 100);
        assert_eq!(gate.ensure_fee(250).unwrap(), 100);
        let err = gate.ensure_fee(99).unwrap_err();
        assert!(matches!(
            err,
            SealswapError::InsufficientFee {
                required: 100,
                paid: 99
            }
        ));
    }

    #[test]
    fn submit_then_poll() {
        let gate = gate(1);
        let ticket = gate.submit("swap", 1).unwrap();
        assert!(!gate.is_fulfilled(ticket).unwrap());
        assert!(!gate.is_fulfilled(ticket).unwrap());

        gate.oracle().fulfill(ticket);
        assert!(gate.is_fulfilled(ticket).unwrap());
    }

    #[test]
    fn outage_surfaces_as_error() {
        let gate = gate(1);
        let ticket = gate.submit("swap", 1).unwrap();
        gate.oracle().set_online(false);
        assert!(matches!(
            gate.is_fulfilled(ticket),
            Err(SealswapError::OracleUnavailable { .. })
        ));
        assert!(matches!(
            gate.required_fee(),
            Err(SealswapError::OracleUnavailable { .. })
        ));
        gate.oracle().set_online(true);
        assert!(!gate.is_fulfilled(ticket).unwrap());
    }
}
