//! Orchestration of the successions opened during a year

use std::collections::BTreeMap;
use std::slice;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::cash::CashAndTaxes;
use super::legal::LegalSuccessionManager;
use super::life_insurance::LifeInsuranceSuccessionManager;
use super::types::Succession;
use crate::clause::DEFAULT_CORRECTION_FACTOR;
use crate::error::Result;
use crate::family::FamilyProvider;
use crate::fiscal::FiscalModel;
use crate::patrimoine::{Ownable, Patrimoine};
use crate::transfer::{Heirs, OwnershipManager};

/// Configuration for succession computations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessionConfig {
    /// Inflates the children's missing capital when rewriting clauses
    pub clause_correction_factor: f64,

    /// Rewrite optional clauses when children cannot pay their taxes
    pub rebalance_optional_clauses: bool,
}

impl Default for SuccessionConfig {
    fn default() -> Self {
        Self {
            clause_correction_factor: DEFAULT_CORRECTION_FACTOR,
            rebalance_optional_clauses: true,
        }
    }
}

/// Both successions opened by one death
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecedentSuccessions {
    pub legal: Succession,
    pub life_insurance: Succession,
    /// Optional clauses were rewritten before the transfer
    pub clauses_modified: bool,
}

/// Every succession opened during a year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearSuccessions {
    pub legal: Vec<Succession>,
    pub life_insurance: Vec<Succession>,
}

impl YearSuccessions {
    pub fn is_empty(&self) -> bool {
        self.legal.is_empty() && self.life_insurance.is_empty()
    }
}

pub struct SuccessionManager<'a> {
    fiscal: &'a FiscalModel,
    family: &'a dyn FamilyProvider,
    year: i32,
    run: u64,
    config: SuccessionConfig,
}

impl<'a> SuccessionManager<'a> {
    pub fn new(fiscal: &'a FiscalModel, family: &'a dyn FamilyProvider, year: i32, run: u64) -> Self {
        Self::with_config(fiscal, family, year, run, SuccessionConfig::default())
    }

    pub fn with_config(
        fiscal: &'a FiscalModel,
        family: &'a dyn FamilyProvider,
        year: i32,
        run: u64,
        config: SuccessionConfig,
    ) -> Self {
        Self {
            fiscal,
            family,
            year,
            run,
            config,
        }
    }

    pub fn config(&self) -> &SuccessionConfig {
        &self.config
    }

    fn legal_manager(&self) -> LegalSuccessionManager<'a> {
        LegalSuccessionManager::new(self.fiscal, self.family, self.year)
    }

    fn life_insurance_manager(&self) -> LifeInsuranceSuccessionManager<'a> {
        LifeInsuranceSuccessionManager::new(self.fiscal, self.family, self.year)
    }

    fn ownership_manager(&self) -> OwnershipManager<'a> {
        OwnershipManager::new(self.fiscal, self.family, self.year, self.run)
    }

    pub fn compute_cash_and_taxes_per_person(
        &self,
        legal: &[Succession],
        life_insurance: &[Succession],
    ) -> CashAndTaxes {
        CashAndTaxes::from_successions(legal, life_insurance, self.family)
    }

    /// Total tax due by each child across both succession kinds
    pub fn total_children_inheritance_taxe(
        &self,
        legal: &[Succession],
        life_insurance: &[Succession],
    ) -> BTreeMap<String, f64> {
        self.compute_cash_and_taxes_per_person(legal, life_insurance)
            .children_taxes()
    }

    /// Check on a copy of the patrimony that each child can pay its taxes
    /// with what it may sell plus its life-insurance cash; otherwise rewrite
    /// the decedent's optional clauses in `patrimoine`.
    ///
    /// Returns whether a clause changed.
    pub fn make_sure_children_can_pay_succession_taxes(
        &self,
        patrimoine: &mut Patrimoine,
        decedent: &str,
        legal: &Succession,
        life_insurance: &Succession,
    ) -> Result<bool> {
        let taxes = self.total_children_inheritance_taxe(slice::from_ref(legal), slice::from_ref(life_insurance));
        if taxes.is_empty() {
            return Ok(false);
        }

        let ownership_manager = self.ownership_manager();
        let mut after_transfer = patrimoine.clone();
        ownership_manager.transfer_ownership_of(&mut after_transfer, decedent)?;

        let valuation_year = self.year - 1;
        let mut missing_capital = BTreeMap::new();
        for (child, tax) in &taxes {
            let sellable: f64 = after_transfer
                .assets
                .iter()
                .filter(|asset| asset.is_sellable())
                .map(|asset| asset.ownership.full_owned_value(child, asset.value(valuation_year)))
                .sum();
            let cash = life_insurance
                .inheritance_of(child)
                .map(|inheritance| inheritance.received_net)
                .unwrap_or(0.0);

            let missing = tax - sellable - cash;
            debug!(
                "run {}: {} owes {:.2}, can sell {:.2}, receives {:.2}",
                self.run, child, tax, sellable, cash
            );
            if missing > 0.0 {
                missing_capital.insert(child.clone(), missing);
            }
        }

        if missing_capital.is_empty() {
            return Ok(false);
        }
        if !self.config.rebalance_optional_clauses {
            warn!("run {}: children of {} cannot pay their taxes", self.run, decedent);
            return Ok(false);
        }

        let conjoint = Heirs::of(self.family, decedent, self.year)?.spouse.map(|spouse| spouse.name);
        let changed = ownership_manager.modify_life_insurance_clause_if_necessary_and_possible(
            patrimoine,
            decedent,
            conjoint.as_deref(),
            &mut missing_capital,
            self.config.clause_correction_factor,
        )?;

        if missing_capital.values().any(|missing| *missing > 0.0) {
            warn!(
                "run {}: children of {} still miss {:.2} to pay their taxes",
                self.run,
                decedent,
                missing_capital.values().sum::<f64>()
            );
        }
        Ok(changed)
    }

    /// Compute both successions of a decedent, rebalance optional clauses if
    /// needed, then transfer its patrimony. `patrimoine` is only updated on success.
    ///
    /// Members dying the same year are neither heirs nor beneficiaries: the
    /// clauses naming them are rewritten before anything is computed.
    pub fn manage_succession(&self, patrimoine: &mut Patrimoine, decedent: &str) -> Result<DecedentSuccessions> {
        let heirs = Heirs::of(self.family, decedent, self.year)?;
        let legal_manager = self.legal_manager();
        let life_insurance_manager = self.life_insurance_manager();
        let ownership_manager = self.ownership_manager();

        let mut updated = patrimoine.clone();
        for other in self.family.deceased_names(self.year) {
            if other != decedent {
                ownership_manager.rewrite_clauses_naming(&mut updated, &other)?;
            }
        }
        let legal = legal_manager.succession(decedent, &updated)?;
        let mut life_insurance = life_insurance_manager.succession(decedent, &updated, heirs.spouse_name())?;

        let clauses_modified =
            self.make_sure_children_can_pay_succession_taxes(&mut updated, decedent, &legal, &life_insurance)?;
        if clauses_modified {
            info!("run {}: clauses of {} rewritten, recomputing", self.run, decedent);
            life_insurance = life_insurance_manager.succession(decedent, &updated, heirs.spouse_name())?;
        }

        ownership_manager.transfer_ownership_of(&mut updated, decedent)?;
        *patrimoine = updated;

        Ok(DecedentSuccessions {
            legal,
            life_insurance,
            clauses_modified,
        })
    }

    /// Successions of every member dying during the year, in family order
    pub fn manage_successions(&self, patrimoine: &mut Patrimoine) -> Result<YearSuccessions> {
        let mut successions = YearSuccessions::default();
        for decedent in self.family.deceased_names(self.year) {
            let outcome = self.manage_succession(patrimoine, &decedent)?;
            successions.legal.push(outcome.legal);
            successions.life_insurance.push(outcome.life_insurance);
        }
        Ok(successions)
    }
}
