//! Constants for Stellar transactions.
//!
//! Limits follow the Stellar protocol definitions (`Stellar-transaction.x`,
//! `Stellar-ledger-entries.x`).

// ============================================================================
// Amounts & Fees
// ============================================================================

/// Amount transferred to the distributor: one stroop (`0.0000001`).
pub const ISSUED_AMOUNT: i64 = 1;

/// Trust line limit used when none is given (the largest representable amount).
pub const MAX_TRUST_LIMIT: i64 = i64::MAX;

/// Network minimum fee per operation, in stroops.
pub const MIN_BASE_FEE: u32 = 100;

// ============================================================================
// Size Limits
// ============================================================================

/// Maximum number of operations in one transaction.
pub const MAX_OPERATIONS: usize = 100;

/// Maximum number of signatures attached to one envelope.
pub const MAX_SIGNATURES: usize = 20;

/// Maximum asset code length (credit_alphanum12).
pub const MAX_ASSET_CODE_LEN: usize = 12;

/// Asset codes up to this length encode as credit_alphanum4.
pub const ALPHANUM4_MAX_LEN: usize = 4;

/// Maximum data entry name length in bytes.
pub const MAX_DATA_NAME_LEN: usize = 64;

/// Maximum data entry value length in bytes.
pub const MAX_DATA_VALUE_LEN: usize = 64;
