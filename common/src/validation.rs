//! Validation results for Gatekeeper block admission

use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, Error)]
pub enum ValidationError {
    #[error("Block rule failure: {0}")]
    BlockRules(#[from] BlockRuleViolation),
}

/// Validation status
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ValidationStatus {
    /// All good
    Go,

    /// Error
    NoGo(ValidationError),
}

impl ValidationStatus {
    pub fn is_go(&self) -> bool {
        matches!(self, ValidationStatus::Go)
    }
}

impl From<Result<(), BlockRuleViolation>> for ValidationStatus {
    fn from(result: Result<(), BlockRuleViolation>) -> Self {
        match result {
            Ok(()) => ValidationStatus::Go,
            Err(violation) => ValidationStatus::NoGo(violation.into()),
        }
    }
}

// ------------------------------------------------------------ BlockRuleViolation

/// A well-formed block validation rule which the block does not satisfy
#[derive(Error, Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BlockRuleViolation {
    /// **Cause:** `NofX` - more transactions of the family than allowed
    #[error("Too many '{family}' transactions: {count} exceeds limit of {limit}")]
    TooManyOfFamily {
        family: String,
        limit: usize,
        count: usize,
    },

    /// **Cause:** `XatY` - the transaction at the index is of another family
    #[error("Transaction at position {index} is of family '{actual}', expected '{expected}'")]
    WrongFamilyAtPosition {
        index: usize,
        expected: String,
        actual: String,
    },

    /// **Cause:** `local` - the transaction at the index was not signed by the block signer
    #[error(
        "Transaction at position {index} signed by {transaction_signer}, not {block_signer}"
    )]
    NotSignedByBlockSigner {
        index: usize,
        block_signer: String,
        transaction_signer: String,
    },
}
