//! Family patrimony: assets and liabilities, each with its own ownership

mod asset;
mod liability;
mod valuation;

pub use asset::{Asset, AssetKind, InvestmentType};
pub use liability::Liability;
pub use valuation::{LiabilityKind, Valuation};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ownership::{EvaluationContext, Ownership};

/// Anything with a yearly value shared between owners
pub trait Ownable {
    fn name(&self) -> &str;

    /// Value at the end of `year` (negative for liabilities)
    fn value(&self, year: i32) -> f64;

    fn ownership(&self) -> &Ownership;

    fn ownership_mut(&mut self) -> &mut Ownership;

    /// Value held by `owner` at the end of `year`
    fn owned_value(&self, owner: &str, year: i32, ctx: &EvaluationContext) -> Result<f64> {
        self.ownership()
            .owned_value(owner, self.value(year), ctx)
            .map_err(|err| err.on_asset(self.name()))
    }

    fn is_owned_by(&self, owner: &str) -> bool {
        self.ownership().is_owned_by(owner)
    }
}

/// Flat collection of assets and liabilities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Patrimoine {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub liabilities: Vec<Liability>,
}

impl Patrimoine {
    pub fn new(assets: Vec<Asset>, liabilities: Vec<Liability>) -> Self {
        Self { assets, liabilities }
    }

    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.name == name)
    }

    pub fn life_insurances(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter().filter(|asset| asset.is_life_insurance())
    }

    /// Report the first invalid ownership or clause
    pub fn check_validity(&self) -> Result<()> {
        for asset in &self.assets {
            asset
                .ownership
                .check_validity()
                .map_err(|err| err.on_asset(&asset.name))?;
            if let Some(clause) = asset.clause() {
                clause.check_validity().map_err(|err| err.on_asset(&asset.name))?;
            }
        }
        for liability in &self.liabilities {
            liability
                .ownership
                .check_validity()
                .map_err(|err| err.on_asset(&liability.name))?;
        }
        Ok(())
    }

    /// Sum of the values of everything held by `owner`
    pub fn net_owned_value(&self, owner: &str, year: i32, ctx: &EvaluationContext) -> Result<f64> {
        let mut total = 0.0;
        for asset in &self.assets {
            total += asset.owned_value(owner, year, ctx)?;
        }
        for liability in &self.liabilities {
            total += liability.owned_value(owner, year, ctx)?;
        }
        Ok(total)
    }
}
