//! Identifiers used throughout SealSwap.
//!
//! Principals (accounts, tokens, the oracle) are 20-byte addresses.
//! Requests and oracle tickets are monotonic counters.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Amount of native currency paid to the oracle, in its smallest unit.
pub type Fee = u128;

// ---------------------------------------------------------------------------
// Address-shaped principals
// ---------------------------------------------------------------------------

macro_rules! address_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
        pub struct $name(pub [u8; 20]);

        impl $name {
            /// The all-zero address, used as "unset".
            pub const NULL: Self = Self([0u8; 20]);

            #[must_use]
            pub fn from_bytes(bytes: [u8; 20]) -> Self {
                Self(bytes)
            }

            #[must_use]
            pub fn as_bytes(&self) -> &[u8; 20] {
                &self.0
            }

            #[must_use]
            pub fn is_null(&self) -> bool {
                self.0 == [0u8; 20]
            }

            /// Parse a `0x`-prefixed (or bare) 40-character hex string.
            pub fn from_hex(s: &str) -> crate::Result<Self> {
                let raw = s.strip_prefix("0x").unwrap_or(s);
                let bytes = hex::decode(raw).map_err(|e| {
                    crate::SealswapError::Serialization(format!("{}: {e}", stringify!($name)))
                })?;
                let array: [u8; 20] = bytes.try_into().map_err(|_| {
                    crate::SealswapError::Serialization(format!(
                        "{}: expected 20 bytes",
                        stringify!($name)
                    ))
                })?;
                Ok(Self(array))
            }

            /// First four bytes as hex, for compact log fields.
            #[must_use]
            pub fn short(&self) -> String {
                hex::encode(&self.0[..4])
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, ":0x{}"), hex::encode(self.0))
            }
        }

        // Serialized as a `0x` hex string so config files stay readable.
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&format!("0x{}", hex::encode(self.0)))
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::from_hex(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

address_id!(
    /// Opaque principal id of a ledger account.
    AccountId,
    "acct"
);

address_id!(
    /// Address of a token contract backing one asset class.
    TokenId,
    "token"
);

address_id!(
    /// Address of the external entropy oracle.
    OracleId,
    "oracle"
);

// ---------------------------------------------------------------------------
// RequestId
// ---------------------------------------------------------------------------

/// Identifier of a swap request. Issued by the registry, strictly
/// increasing, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// OracleTicket
// ---------------------------------------------------------------------------

/// The oracle's own id for an entropy request. Only meaningful to the
/// oracle that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OracleTicket(pub u64);

impl fmt::Display for OracleTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ticket:{}", self.0)
    }
}
