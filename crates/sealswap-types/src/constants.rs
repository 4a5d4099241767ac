//! System-wide constants for SealSwap.

/// First id handed out by a fresh request registry.
pub const FIRST_REQUEST_ID: u64 = 1;

/// Tag attached to entropy requests when the config does not name one.
pub const DEFAULT_REQUEST_TAG: &str = "sealswap:swap";

/// Domain separator for mock input proofs.
pub const INPUT_PROOF_DOMAIN: &[u8] = b"sealswap:input-proof:v1:";

/// Domain separator for mock ciphertext handles.
pub const CIPHER_HANDLE_DOMAIN: &[u8] = b"sealswap:ct:v1:";

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "SealSwap";
