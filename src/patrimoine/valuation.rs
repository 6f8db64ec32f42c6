//! Yearly valuation of assets and liabilities

use serde::{Deserialize, Serialize};

/// Value known at a base year, growing at a constant annual rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub base_year: i32,
    pub base_value: f64,
    /// Annual growth (0.02 = 2%)
    #[serde(default)]
    pub annual_rate: f64,
}

impl Valuation {
    pub fn constant(base_year: i32, base_value: f64) -> Self {
        Self {
            base_year,
            base_value,
            annual_rate: 0.0,
        }
    }

    /// Value at the end of `year`
    pub fn value(&self, year: i32) -> f64 {
        self.base_value * (1.0 + self.annual_rate).powi(year - self.base_year)
    }
}

/// Kind of liability and its repayment profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LiabilityKind {
    /// Amortized in equal yearly installments from `first_year` to `last_year`
    Loan { first_year: i32, last_year: i32 },
    /// Repaid in one go, outstanding until then
    Debt,
}

impl LiabilityKind {
    /// Capital still due at the end of `year` out of `amount` borrowed
    pub fn outstanding(&self, amount: f64, year: i32) -> f64 {
        match *self {
            LiabilityKind::Loan { first_year, last_year } => {
                if year < first_year || year >= last_year {
                    return 0.0;
                }
                let duration = (last_year - first_year + 1) as f64;
                amount * (last_year - year) as f64 / duration
            }
            LiabilityKind::Debt => amount,
        }
    }
}
