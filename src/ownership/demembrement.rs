//! Valuation of usufruct and bare ownership on a dismembered property

use std::collections::BTreeMap;

use super::ownership::{EvaluationContext, Ownership};
use crate::error::{Result, SuccessionError};

/// Value held by each usufructuary and each bare owner
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemembrementValues {
    pub usufruct: BTreeMap<String, f64>,
    pub bare: BTreeMap<String, f64>,
}

impl DemembrementValues {
    pub fn usufruct_value(&self) -> f64 {
        self.usufruct.values().sum()
    }

    pub fn bare_value(&self) -> f64 {
        self.bare.values().sum()
    }

    /// Usufruct plus bare ownership held by `name`
    pub fn value_of(&self, name: &str) -> f64 {
        self.usufruct.get(name).copied().unwrap_or(0.0) + self.bare.get(name).copied().unwrap_or(0.0)
    }
}

impl Ownership {
    /// Split `total_value` between usufructuaries (each at its own age) and bare owners
    pub fn demembrement(&self, total_value: f64, ctx: &EvaluationContext) -> Result<DemembrementValues> {
        let (usufruct, bare) = match self {
            Ownership::Full { .. } => return Err(SuccessionError::TryingToDismemberUnUndismemberedAsset),
            Ownership::Dismembered { usufruct, bare } => (usufruct, bare),
        };
        self.check_validity()?;

        let mut values = DemembrementValues::default();
        for owner in usufruct {
            let age = ctx.age_of(&owner.name)?;
            let share = total_value * owner.fraction / 100.0;
            let split = ctx.demembrement.demembrement(share, age);
            *values.usufruct.entry(owner.name.clone()).or_insert(0.0) += split.usufruct_value;
        }

        let bare_value = total_value - values.usufruct_value();
        for owner in bare {
            *values.bare.entry(owner.name.clone()).or_insert(0.0) += bare_value * owner.fraction / 100.0;
        }

        Ok(values)
    }
}
