//! Taxation of life-insurance capital paid on death (art. 990 I CGI)

use serde::{Deserialize, Serialize};

use super::inheritance::{HeritageTax, ProgressiveSchedule, TaxBracket};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LifeInsuranceTaxSchedule {
    /// Allowance per beneficiary, across all contracts of the same insured
    pub abatement: f64,
    pub schedule: ProgressiveSchedule,
}

impl LifeInsuranceTaxSchedule {
    pub fn france() -> Self {
        let brackets = vec![
            TaxBracket { floor: 0.0, rate: 0.20 },
            TaxBracket { floor: 700_000.0, rate: 0.3125 },
        ];
        Self {
            abatement: 152_500.0,
            schedule: ProgressiveSchedule::from_sorted(brackets),
        }
    }

    /// Tax the capital received by a child (or any non-spouse beneficiary)
    pub fn heritage_of_child(&self, capital: f64, abat_frac: f64) -> HeritageTax {
        let taxable = (capital - self.abatement * abat_frac).max(0.0);
        let tax = self.schedule.tax(taxable);
        HeritageTax {
            taxable,
            tax,
            net_amount: capital - tax,
        }
    }

    /// The surviving spouse is exempt
    pub fn heritage_of_spouse(&self, capital: f64) -> HeritageTax {
        HeritageTax {
            taxable: 0.0,
            tax: 0.0,
            net_amount: capital,
        }
    }
}
