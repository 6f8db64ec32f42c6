//! Legal succession: estate of the decedent and its split between heirs

use log::info;

use super::types::{Inheritance, Succession, SuccessionKind};
use crate::error::{Result, SuccessionError};
use crate::family::FamilyProvider;
use crate::fiscal::FiscalModel;
use crate::ownership::{EvaluationContext, EvaluationMethod, SpouseHeir};
use crate::patrimoine::{Ownable, Patrimoine};
use crate::transfer::Heirs;

pub struct LegalSuccessionManager<'a> {
    fiscal: &'a FiscalModel,
    family: &'a dyn FamilyProvider,
    /// Year of death; the estate is valued at the end of the previous year
    year: i32,
}

impl<'a> LegalSuccessionManager<'a> {
    pub fn new(fiscal: &'a FiscalModel, family: &'a dyn FamilyProvider, year: i32) -> Self {
        Self { fiscal, family, year }
    }

    fn context(&self) -> EvaluationContext<'a> {
        EvaluationContext::new(
            self.year,
            EvaluationMethod::LegalSuccession,
            &self.fiscal.demembrement,
            self.family,
        )
    }

    /// Net estate of the decedent, life insurance excluded
    pub fn masse_successorale(&self, patrimoine: &Patrimoine, decedent: &str) -> Result<f64> {
        let ctx = self.context();
        let valuation_year = self.year - 1;

        let mut masse = 0.0;
        for asset in patrimoine.assets.iter().filter(|asset| !asset.is_life_insurance()) {
            let value = asset.estate_value(valuation_year, self.fiscal.main_residence_discount);
            masse += asset
                .ownership
                .owned_value(decedent, value, &ctx)
                .map_err(|err| err.on_asset(&asset.name))?;
        }
        for liability in &patrimoine.liabilities {
            masse += liability.owned_value(decedent, valuation_year, &ctx)?;
        }

        Ok(masse)
    }

    /// Each child receives `share` of the estate with its full allowance
    pub fn children_inheritance(&self, share: f64, masse: f64, children: &[String]) -> Vec<Inheritance> {
        children
            .iter()
            .map(|child| {
                let brut = masse * share;
                let heritage = self.fiscal.inheritance.heritage_of_child(brut, 1.0);
                Inheritance {
                    person_name: child.clone(),
                    percent_fiscal: share * 100.0,
                    brut_fiscal: brut,
                    abat_frac: 1.0,
                    net_fiscal: heritage.net_amount,
                    tax: heritage.tax,
                    received: brut,
                    received_net: heritage.net_amount,
                }
            })
            .collect()
    }

    /// Spouse share from its fiscal option, tax free; the rest to the children
    pub fn spouse_and_children_inheritance(
        &self,
        masse: f64,
        spouse: &SpouseHeir,
        children: &[String],
    ) -> Result<Vec<Inheritance>> {
        let age = self
            .family
            .age_of(&spouse.name, self.year)
            .ok_or_else(|| SuccessionError::UnknownMember(spouse.name.clone()))?;
        let shares = spouse
            .fiscal_option
            .shares(children.len(), age, &self.fiscal.demembrement);

        let brut = masse * shares.for_spouse;
        let heritage = self.fiscal.inheritance.heritage_of_spouse(brut);
        let mut inheritances = vec![Inheritance {
            person_name: spouse.name.clone(),
            percent_fiscal: shares.for_spouse * 100.0,
            brut_fiscal: brut,
            abat_frac: 1.0,
            net_fiscal: heritage.net_amount,
            tax: heritage.tax,
            received: brut,
            received_net: heritage.net_amount,
        }];
        inheritances.extend(self.children_inheritance(shares.for_each_child, masse, children));

        Ok(inheritances)
    }

    pub fn succession(&self, decedent: &str, patrimoine: &Patrimoine) -> Result<Succession> {
        let heirs = Heirs::of(self.family, decedent, self.year)?;
        let masse = self.masse_successorale(patrimoine, decedent)?;

        let inheritances = match &heirs.spouse {
            Some(spouse) => self.spouse_and_children_inheritance(masse, spouse, &heirs.children)?,
            None if !heirs.children.is_empty() => {
                self.children_inheritance(1.0 / heirs.children.len() as f64, masse, &heirs.children)
            }
            None => Vec::new(),
        };

        let succession = Succession {
            kind: SuccessionKind::Legal,
            year_of_death: self.year,
            decedent_name: decedent.to_string(),
            taxable_value: masse,
            inheritances,
        };
        info!(
            "legal succession of {} in {}: estate {:.2}, taxes {:.2}",
            decedent,
            self.year,
            masse,
            succession.tax()
        );
        Ok(succession)
    }
}
