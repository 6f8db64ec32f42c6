//! Loans and debts

use serde::{Deserialize, Serialize};

use super::valuation::LiabilityKind;
use super::Ownable;
use crate::ownership::Ownership;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Liability {
    pub name: String,
    pub kind: LiabilityKind,
    /// Amount borrowed (positive)
    pub amount: f64,
    pub ownership: Ownership,
}

impl Liability {
    pub fn new(name: &str, kind: LiabilityKind, amount: f64, ownership: Ownership) -> Self {
        Self {
            name: name.to_string(),
            kind,
            amount,
            ownership,
        }
    }
}

impl Ownable for Liability {
    fn name(&self) -> &str {
        &self.name
    }

    /// Negative: what is still due at the end of `year`
    fn value(&self, year: i32) -> f64 {
        -self.kind.outstanding(self.amount, year)
    }

    fn ownership(&self) -> &Ownership {
        &self.ownership
    }

    fn ownership_mut(&mut self) -> &mut Ownership {
        &mut self.ownership
    }
}
