//! Assets of the family patrimony

use serde::{Deserialize, Serialize};

use super::valuation::Valuation;
use super::Ownable;
use crate::clause::Clause;
use crate::ownership::Ownership;

/// Envelope of a financial investment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InvestmentType {
    /// Life insurance, paid on death according to its clause
    LifeInsurance { clause: Clause },
    Pea,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssetKind {
    RealEstate {
        #[serde(default)]
        is_main_residence: bool,
    },
    /// Real-estate fund shares, sold net of a sale fee
    Scpi {
        /// 0.10 = 10% of the value lost on sale
        sale_fee_rate: f64,
    },
    FreeInvestment { investment_type: InvestmentType },
    PeriodicInvestment { investment_type: InvestmentType },
    SciShares,
}

/// An asset with its valuation and ownership
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub kind: AssetKind,
    pub valuation: Valuation,
    pub ownership: Ownership,
}

impl Asset {
    pub fn new(name: &str, kind: AssetKind, valuation: Valuation, ownership: Ownership) -> Self {
        Self {
            name: name.to_string(),
            kind,
            valuation,
            ownership,
        }
    }

    fn investment_type(&self) -> Option<&InvestmentType> {
        match &self.kind {
            AssetKind::FreeInvestment { investment_type } | AssetKind::PeriodicInvestment { investment_type } => {
                Some(investment_type)
            }
            _ => None,
        }
    }

    pub fn is_life_insurance(&self) -> bool {
        matches!(self.investment_type(), Some(InvestmentType::LifeInsurance { .. }))
    }

    pub fn clause(&self) -> Option<&Clause> {
        match self.investment_type() {
            Some(InvestmentType::LifeInsurance { clause }) => Some(clause),
            _ => None,
        }
    }

    pub fn clause_mut(&mut self) -> Option<&mut Clause> {
        match &mut self.kind {
            AssetKind::FreeInvestment {
                investment_type: InvestmentType::LifeInsurance { clause },
            }
            | AssetKind::PeriodicInvestment {
                investment_type: InvestmentType::LifeInsurance { clause },
            } => Some(clause),
            _ => None,
        }
    }

    /// Heirs can sell it quickly to pay their taxes
    pub fn is_sellable(&self) -> bool {
        match &self.kind {
            AssetKind::Scpi { .. } => true,
            AssetKind::FreeInvestment { investment_type } | AssetKind::PeriodicInvestment { investment_type } => {
                !matches!(investment_type, InvestmentType::LifeInsurance { .. })
            }
            AssetKind::RealEstate { .. } | AssetKind::SciShares => false,
        }
    }

    /// Value retained in the estate at the end of `year`
    pub fn estate_value(&self, year: i32, main_residence_discount: f64) -> f64 {
        let value = self.valuation.value(year);
        match self.kind {
            AssetKind::RealEstate {
                is_main_residence: true,
            } => value * (1.0 - main_residence_discount),
            AssetKind::Scpi { sale_fee_rate } => value * (1.0 - sale_fee_rate),
            _ => value,
        }
    }
}

impl Ownable for Asset {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self, year: i32) -> f64 {
        self.valuation.value(year)
    }

    fn ownership(&self) -> &Ownership {
        &self.ownership
    }

    fn ownership_mut(&mut self) -> &mut Ownership {
        &mut self.ownership
    }
}
