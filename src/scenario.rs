//! Scenario runner for successions
//!
//! Loads the fiscal model once, then computes the successions of any number
//! of family scenarios without re-reading CSV files.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Datelike;
use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::SuccessionError;
use crate::family::{Family, FamilyProvider};
use crate::fiscal::{FiscalModel, FiscalModelError};
use crate::patrimoine::Patrimoine;
use crate::succession::{CashAndTaxes, DecedentSuccessions, SuccessionConfig, SuccessionManager, YearSuccessions};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Fiscal(#[from] FiscalModelError),

    #[error(transparent)]
    Succession(#[from] SuccessionError),
}

/// A family, its patrimony and the year to simulate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Year of death; the current year when omitted
    #[serde(default = "current_year")]
    pub year: i32,
    pub family: Family,
    pub patrimoine: Patrimoine,
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

impl Scenario {
    /// Parse a scenario and check its ownerships and clauses
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = serde_json::from_str(json)?;
        scenario.patrimoine.check_validity()?;
        Ok(scenario)
    }

    pub fn from_json_path(path: &Path) -> Result<Self, ScenarioError> {
        let json = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Successions of the year and the patrimony once transferred
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub successions: YearSuccessions,
    pub cash_and_taxes: CashAndTaxes,
    pub patrimoine: Patrimoine,
}

/// Successions that would follow the death of one adult
#[derive(Debug, Clone, Serialize)]
pub struct WhatIfOutcome {
    pub decedent: String,
    pub successions: DecedentSuccessions,
    pub cash_and_taxes: CashAndTaxes,
}

/// Pre-loaded runner for succession scenarios
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
/// let scenario = Scenario::from_json_path(Path::new("data/scenarios/michaud.json"))?;
/// let outcome = runner.run(&scenario)?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    fiscal: FiscalModel,
    config: SuccessionConfig,
}

impl ScenarioRunner {
    /// Create runner with the in-memory French fiscal model
    pub fn new() -> Self {
        Self::with_fiscal_model(FiscalModel::default_france())
    }

    /// Create runner by loading fiscal tables from data/fiscal
    pub fn from_csv() -> Result<Self, ScenarioError> {
        Ok(Self::with_fiscal_model(FiscalModel::from_csv()?))
    }

    /// Create runner from a specific fiscal tables directory
    pub fn from_csv_path(path: &Path) -> Result<Self, ScenarioError> {
        Ok(Self::with_fiscal_model(FiscalModel::from_csv_path(path)?))
    }

    pub fn with_fiscal_model(fiscal: FiscalModel) -> Self {
        Self {
            fiscal,
            config: SuccessionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SuccessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn fiscal_model(&self) -> &FiscalModel {
        &self.fiscal
    }

    pub fn config(&self) -> &SuccessionConfig {
        &self.config
    }

    fn manager<'a>(&'a self, family: &'a Family, year: i32, run: u64) -> SuccessionManager<'a> {
        SuccessionManager::with_config(&self.fiscal, family, year, run, self.config.clone())
    }

    /// Successions of every member dying during the scenario year
    pub fn run(&self, scenario: &Scenario) -> Result<ScenarioOutcome, ScenarioError> {
        let manager = self.manager(&scenario.family, scenario.year, 0);
        let mut patrimoine = scenario.patrimoine.clone();

        let successions = manager.manage_successions(&mut patrimoine)?;
        let cash_and_taxes = manager.compute_cash_and_taxes_per_person(&successions.legal, &successions.life_insurance);

        Ok(ScenarioOutcome {
            successions,
            cash_and_taxes,
            patrimoine,
        })
    }

    /// Successions of one adult assumed to die during the scenario year
    pub fn what_if(&self, scenario: &Scenario, decedent: &str, run: u64) -> Result<WhatIfOutcome, ScenarioError> {
        let mut family = scenario.family.clone();
        if !family.set_death_year(decedent, scenario.year) {
            return Err(SuccessionError::UnknownMember(decedent.to_string()).into());
        }
        let mut patrimoine = scenario.patrimoine.clone();

        let manager = self.manager(&family, scenario.year, run);
        let successions = manager.manage_succession(&mut patrimoine, decedent)?;
        let cash_and_taxes = manager.compute_cash_and_taxes_per_person(
            std::slice::from_ref(&successions.legal),
            std::slice::from_ref(&successions.life_insurance),
        );

        Ok(WhatIfOutcome {
            decedent: decedent.to_string(),
            successions,
            cash_and_taxes,
        })
    }

    /// What-if successions for every adult alive in the scenario year,
    /// each computed in parallel on its own copy of the family and patrimony
    pub fn what_if_successions(&self, scenario: &Scenario) -> Result<Vec<WhatIfOutcome>, ScenarioError> {
        let adults = scenario.family.adults_alive_names(scenario.year);
        info!("what-if successions of {} adults in {}", adults.len(), scenario.year);

        adults
            .par_iter()
            .enumerate()
            .map(|(run, adult)| self.what_if(scenario, adult, run as u64 + 1))
            .collect()
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::ownership::{Owners, Ownership};
    use crate::patrimoine::Ownable;
    use approx::assert_abs_diff_eq;

    fn michaud_scenario() -> Scenario {
        Scenario {
            year: YEAR,
            family: michaud_family(),
            patrimoine: michaud_patrimoine(),
        }
    }

    #[test]
    fn test_run_michaud_scenario() {
        let runner = ScenarioRunner::new();
        let scenario = michaud_scenario();

        let outcome = runner.run(&scenario).unwrap();
        assert_eq!(outcome.successions.legal.len(), 1);
        assert_abs_diff_eq!(outcome.successions.legal[0].taxable_value, 505_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(outcome.cash_and_taxes.children_taxes()[ARTHUR], 3_444.35, epsilon = 1e-6);
        assert!(outcome.patrimoine.assets.iter().all(|asset| !asset.is_owned_by(LIONEL)));

        // The scenario itself is left untouched
        assert_eq!(scenario.patrimoine, michaud_patrimoine());
    }

    #[test]
    fn test_what_if_successions() {
        let runner = ScenarioRunner::default();
        let mut scenario = michaud_scenario();
        scenario.family.members[0].death_year = None;

        let outcomes = runner.what_if_successions(&scenario).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].decedent, LIONEL);
        assert_eq!(outcomes[1].decedent, VANESSA);

        // Same estates as when the death is part of the scenario
        assert_abs_diff_eq!(outcomes[0].successions.legal.taxable_value, 505_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(outcomes[1].successions.legal.taxable_value, 145_000.0, epsilon = 1e-6);
        assert_eq!(outcomes[1].successions.legal.inheritance_of(LIONEL).unwrap().tax, 0.0);
    }

    #[test]
    fn test_what_if_unknown_member() {
        let runner = ScenarioRunner::new();
        let err = runner.what_if(&michaud_scenario(), "Nobody", 1).unwrap_err();
        assert!(matches!(err, ScenarioError::Succession(SuccessionError::UnknownMember(_))));
    }

    #[test]
    fn test_load_michaud_scenario() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/scenarios/michaud.json");
        let scenario = Scenario::from_json_path(&path).unwrap();

        assert_eq!(scenario, michaud_scenario());
    }

    #[test]
    fn test_year_defaults_to_current_year() {
        let scenario = Scenario::from_json(r#"{"family": {"members": []}, "patrimoine": {}}"#).unwrap();
        assert_eq!(scenario.year, current_year());
        assert!(scenario.patrimoine.assets.is_empty());
    }

    #[test]
    fn test_invalid_scenario_is_rejected() {
        let mut scenario = michaud_scenario();
        scenario.patrimoine.liabilities[1].ownership = Ownership::full(Owners::from_shares([(LIONEL, 60.0)]));
        let json = serde_json::to_string(&scenario).unwrap();

        let err = Scenario::from_json(&json).unwrap_err();
        assert!(matches!(err, ScenarioError::Succession(SuccessionError::InvalidOwnership { .. })));
    }
}
