//! Taxes due and cash received per heir, across succession kinds

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::types::{Succession, SuccessionKind};
use crate::family::FamilyProvider;

/// Taxes and life-insurance cash of one heir
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeirCashAndTax {
    pub name: String,
    pub legal_tax: f64,
    pub life_insurance_tax: f64,
    /// Life-insurance capital received net of tax
    pub life_insurance_net_cash: f64,
}

impl HeirCashAndTax {
    pub fn total_tax(&self) -> f64 {
        self.legal_tax + self.life_insurance_tax
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CashAndTaxes {
    pub taxes_adults: Vec<HeirCashAndTax>,
    pub taxes_children: Vec<HeirCashAndTax>,
}

impl CashAndTaxes {
    /// Merge legal and life-insurance successions heir by heir
    pub fn from_successions(
        legal: &[Succession],
        life_insurance: &[Succession],
        family: &dyn FamilyProvider,
    ) -> Self {
        let mut per_heir: BTreeMap<String, HeirCashAndTax> = BTreeMap::new();

        for succession in legal.iter().chain(life_insurance.iter()) {
            for inheritance in &succession.inheritances {
                let heir = per_heir
                    .entry(inheritance.person_name.clone())
                    .or_insert_with(|| HeirCashAndTax {
                        name: inheritance.person_name.clone(),
                        ..Default::default()
                    });
                match succession.kind {
                    SuccessionKind::Legal => heir.legal_tax += inheritance.tax,
                    SuccessionKind::LifeInsurance => {
                        heir.life_insurance_tax += inheritance.tax;
                        heir.life_insurance_net_cash += inheritance.received_net;
                    }
                }
            }
        }

        let mut result = CashAndTaxes::default();
        for (name, heir) in per_heir {
            let is_child = family.member(&name).map(|p| p.is_child()).unwrap_or(false);
            if is_child {
                result.taxes_children.push(heir);
            } else {
                result.taxes_adults.push(heir);
            }
        }
        result
    }

    pub fn total_tax(&self) -> f64 {
        self.taxes_adults
            .iter()
            .chain(self.taxes_children.iter())
            .map(|heir| heir.total_tax())
            .sum()
    }

    /// Tax due by each child, both succession kinds together
    pub fn children_taxes(&self) -> BTreeMap<String, f64> {
        self.taxes_children
            .iter()
            .map(|heir| (heir.name.clone(), heir.total_tax()))
            .collect()
    }
}
