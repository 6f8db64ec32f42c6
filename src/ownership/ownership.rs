//! Ownership of a property: full ownership or usufruct / bare ownership

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::owners::Owners;
use crate::error::{Result, SuccessionError};
use crate::family::FamilyProvider;
use crate::fiscal::DemembrementTable;

/// How a dismembered property is valued for each holder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMethod {
    /// Wealth tax: the usufructuary is taxed on the full value
    Ifi,
    /// Former wealth tax, same rule as IFI
    Isf,
    LegalSuccession,
    LifeInsuranceSuccession,
    /// Economic view of the patrimony
    Patrimoine,
}

impl EvaluationMethod {
    /// Usufructuaries hold the whole value, bare owners nothing
    pub fn taxes_usufructuary_on_full_value(&self) -> bool {
        matches!(self, EvaluationMethod::Ifi | EvaluationMethod::Isf)
    }
}

/// Everything a valuation needs besides the ownership itself
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Year at which ages are taken
    pub year: i32,
    pub method: EvaluationMethod,
    pub demembrement: &'a DemembrementTable,
    pub family: &'a dyn FamilyProvider,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        year: i32,
        method: EvaluationMethod,
        demembrement: &'a DemembrementTable,
        family: &'a dyn FamilyProvider,
    ) -> Self {
        Self {
            year,
            method,
            demembrement,
            family,
        }
    }

    /// Same context with another evaluation method
    pub fn with_method(&self, method: EvaluationMethod) -> Self {
        Self { method, ..*self }
    }

    pub fn age_of(&self, name: &str) -> Result<u32> {
        self.family
            .age_of(name, self.year)
            .ok_or_else(|| SuccessionError::UnknownMember(name.to_string()))
    }
}

/// Who holds a property and in which capacity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Ownership {
    Full { owners: Owners },
    Dismembered { usufruct: Owners, bare: Owners },
}

impl Ownership {
    pub fn full(owners: Owners) -> Self {
        Ownership::Full { owners }
    }

    pub fn sole(name: &str) -> Self {
        Ownership::Full {
            owners: Owners::sole(name),
        }
    }

    pub fn dismembered(usufruct: Owners, bare: Owners) -> Self {
        Ownership::Dismembered { usufruct, bare }
    }

    pub fn is_dismembered(&self) -> bool {
        matches!(self, Ownership::Dismembered { .. })
    }

    pub fn is_valid(&self) -> bool {
        self.check_validity().is_ok()
    }

    /// Every populated owner set must be valid; the error carries no asset name
    pub fn check_validity(&self) -> Result<()> {
        match self {
            Ownership::Full { owners } => check_owners(owners, "full owners"),
            Ownership::Dismembered { usufruct, bare } => {
                check_owners(usufruct, "usufruct owners")?;
                check_owners(bare, "bare owners")
            }
        }
    }

    pub fn has_a_full_owner(&self, name: &str) -> bool {
        matches!(self, Ownership::Full { owners } if owners.contains(name))
    }

    pub fn has_an_usufruct_owner(&self, name: &str) -> bool {
        matches!(self, Ownership::Dismembered { usufruct, .. } if usufruct.contains(name))
    }

    pub fn has_a_bare_owner(&self, name: &str) -> bool {
        matches!(self, Ownership::Dismembered { bare, .. } if bare.contains(name))
    }

    /// `name` holds 100% in full ownership
    pub fn has_a_unique_full_owner(&self, name: &str) -> bool {
        match self {
            Ownership::Full { owners } => {
                let grouped = owners.grouped();
                grouped.len() == 1 && grouped.contains(name)
            }
            Ownership::Dismembered { .. } => false,
        }
    }

    /// Full owners and usufructuaries collect the revenues
    pub fn provides_revenue_to(&self, name: &str) -> bool {
        self.has_a_full_owner(name) || self.has_an_usufruct_owner(name)
    }

    /// Holds the property in any capacity
    pub fn is_owned_by(&self, name: &str) -> bool {
        match self {
            Ownership::Full { owners } => owners.contains(name),
            Ownership::Dismembered { usufruct, bare } => {
                usufruct.contains(name) || bare.contains(name)
            }
        }
    }

    /// Every name appearing in the ownership, first appearance first
    pub fn owner_names(&self) -> Vec<String> {
        match self {
            Ownership::Full { owners } => owners.names(),
            Ownership::Dismembered { usufruct, bare } => {
                let mut names = usufruct.names();
                for name in bare.names() {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
                names
            }
        }
    }

    /// Value of the full-ownership share of `name` (0 on a dismembered property)
    pub fn full_owned_value(&self, name: &str, total_value: f64) -> f64 {
        match self {
            Ownership::Full { owners } => total_value * owners.fraction_of(name) / 100.0,
            Ownership::Dismembered { .. } => 0.0,
        }
    }

    /// Value of what `name` holds out of `total_value`
    pub fn owned_value(&self, name: &str, total_value: f64, ctx: &EvaluationContext) -> Result<f64> {
        match self {
            Ownership::Full { owners } => Ok(total_value * owners.fraction_of(name) / 100.0),
            Ownership::Dismembered { usufruct, .. } if ctx.method.taxes_usufructuary_on_full_value() => {
                Ok(total_value * usufruct.fraction_of(name) / 100.0)
            }
            Ownership::Dismembered { .. } => {
                let values = self.demembrement(total_value, ctx)?;
                Ok(values.value_of(name))
            }
        }
    }

    /// Value held by every owner; the values sum to `total_value`
    pub fn owned_values(&self, total_value: f64, ctx: &EvaluationContext) -> Result<BTreeMap<String, f64>> {
        let mut values = BTreeMap::new();
        match self {
            Ownership::Full { owners } => {
                for owner in owners {
                    *values.entry(owner.name.clone()).or_insert(0.0) +=
                        total_value * owner.fraction / 100.0;
                }
            }
            Ownership::Dismembered { usufruct, bare } if ctx.method.taxes_usufructuary_on_full_value() => {
                for owner in bare {
                    values.entry(owner.name.clone()).or_insert(0.0);
                }
                for owner in usufruct {
                    *values.entry(owner.name.clone()).or_insert(0.0) +=
                        total_value * owner.fraction / 100.0;
                }
            }
            Ownership::Dismembered { .. } => {
                let split = self.demembrement(total_value, ctx)?;
                for (name, value) in split.usufruct.iter().chain(split.bare.iter()) {
                    *values.entry(name.clone()).or_insert(0.0) += value;
                }
            }
        }
        Ok(values)
    }

    /// Merge duplicate owners and reunify usufruct with bare ownership
    /// when both are held by the same people in the same shares
    pub fn group_shares(&mut self) {
        match self {
            Ownership::Full { owners } => owners.group(),
            Ownership::Dismembered { usufruct, bare } => {
                usufruct.group();
                bare.group();
                if !usufruct.is_empty() && usufruct.same_shares(bare) {
                    *self = Ownership::Full {
                        owners: usufruct.clone(),
                    };
                }
            }
        }
    }
}

fn check_owners(owners: &Owners, role: &str) -> Result<()> {
    if owners.is_empty() {
        return Err(SuccessionError::invalid_ownership("", format!("no {}", role)));
    }
    if !owners.is_valid() {
        return Err(SuccessionError::invalid_ownership(
            "",
            format!("{} fractions sum to {:.4}%", role, owners.sum_of_fractions()),
        ));
    }
    Ok(())
}
