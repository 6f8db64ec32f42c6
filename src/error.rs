//! Error types for ownership transfers and succession computations

use thiserror::Error;

/// Errors raised while valuing, transferring or taxing property
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SuccessionError {
    /// Fraction-sum or role-consistency invariant violated on an ownership
    #[error("invalid ownership of '{asset}': {reason}")]
    InvalidOwnership { asset: String, reason: String },

    /// Beneficiary clause is malformed or became malformed after a rewrite
    #[error("invalid clause on '{contract}': {reason}")]
    InvalidClause { contract: String, reason: String },

    /// Demembrement valuation requested on an undivided ownership
    #[error("trying to dismember an undismembered asset")]
    TryingToDismemberUnUndismemberedAsset,

    /// A person named in an ownership or clause is not a family member
    #[error("unknown family member '{0}'")]
    UnknownMember(String),
}

impl SuccessionError {
    pub(crate) fn invalid_ownership(asset: impl Into<String>, reason: impl Into<String>) -> Self {
        SuccessionError::InvalidOwnership {
            asset: asset.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_clause(contract: impl Into<String>, reason: impl Into<String>) -> Self {
        SuccessionError::InvalidClause {
            contract: contract.into(),
            reason: reason.into(),
        }
    }

    /// Attach the asset (or contract) name to an error raised without one
    pub(crate) fn on_asset(self, name: &str) -> Self {
        match self {
            SuccessionError::InvalidOwnership { asset, reason } if asset.is_empty() => {
                SuccessionError::InvalidOwnership { asset: name.to_string(), reason }
            }
            SuccessionError::InvalidClause { contract, reason } if contract.is_empty() => {
                SuccessionError::InvalidClause { contract: name.to_string(), reason }
            }
            other => other,
        }
    }
}

/// Result alias for succession computations
pub type Result<T> = std::result::Result<T, SuccessionError>;
