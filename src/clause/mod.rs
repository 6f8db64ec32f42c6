//! Life-insurance beneficiary clauses

mod beneficiary;
mod rebalance;

pub use beneficiary::{Beneficiaries, Clause};
pub use rebalance::{modify_clause, DEFAULT_CORRECTION_FACTOR};
