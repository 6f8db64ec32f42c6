//! Succession Engine - Property ownership transfer and inheritance tax engine for family estates
//!
//! This library provides:
//! - Full and dismembered ownership (usufruct / bare ownership) with fiscal valuation
//! - Ownership transfer on death, including life-insurance beneficiary clauses
//! - Legal and life-insurance successions with French inheritance taxes
//! - Rewriting of optional clauses so that children can pay their taxes
//! - Scenario runner with parallel what-if successions

pub mod error;
pub mod fiscal;
pub mod family;
pub mod ownership;
pub mod clause;
pub mod patrimoine;
pub mod transfer;
pub mod succession;
pub mod scenario;

#[cfg(test)]
mod fixtures;

// Re-export commonly used types
pub use error::{Result, SuccessionError};
pub use fiscal::{FiscalModel, SpouseFiscalOption};
pub use family::{Family, FamilyProvider, Person};
pub use ownership::{EvaluationContext, EvaluationMethod, Owners, Ownership};
pub use clause::Clause;
pub use patrimoine::{Asset, Liability, Ownable, Patrimoine};
pub use transfer::OwnershipManager;
pub use succession::{Succession, SuccessionConfig, SuccessionManager};
pub use scenario::{Scenario, ScenarioRunner};
