//! Legal and life-insurance successions
//!
//! A death opens two successions: the legal one over the decedent's estate,
//! and the life-insurance one over the capital its contracts pay out. The
//! [`SuccessionManager`] computes both, makes sure the children can pay
//! their taxes, then transfers the patrimony to the heirs.

mod cash;
mod legal;
mod life_insurance;
mod manager;
mod types;

pub use cash::{CashAndTaxes, HeirCashAndTax};
pub use legal::LegalSuccessionManager;
pub use life_insurance::LifeInsuranceSuccessionManager;
pub use manager::{DecedentSuccessions, SuccessionConfig, SuccessionManager, YearSuccessions};
pub use types::{CoupleUFNP, Inheritance, NamedValue, Succession, SuccessionKind};
