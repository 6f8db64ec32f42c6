//! Property ownership: owners, usufruct / bare-ownership split, valuation and transfer

mod demembrement;
mod owners;
mod ownership;
mod transfer;

pub use demembrement::DemembrementValues;
pub use owners::{Owner, Owners, FRACTION_TOLERANCE};
pub use ownership::{EvaluationContext, EvaluationMethod, Ownership};
pub use transfer::SpouseHeir;
