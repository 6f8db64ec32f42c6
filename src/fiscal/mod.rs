//! Fiscal model: demembrement barème, inheritance and life-insurance schedules

mod demembrement;
mod inheritance;
mod life_insurance;
pub mod loader;

pub use demembrement::{DemembrementSplit, DemembrementTable};
pub use inheritance::{
    HeritageTax, InheritanceTaxSchedule, ProgressiveSchedule, SharedValues, SpouseFiscalOption,
    TaxBracket,
};
pub use life_insurance::LifeInsuranceTaxSchedule;
pub use loader::{FiscalModelError, LoadedFiscalTables};

use std::path::Path;

/// Container for all fiscal tables used by a succession computation
#[derive(Debug, Clone)]
pub struct FiscalModel {
    pub demembrement: DemembrementTable,
    pub inheritance: InheritanceTaxSchedule,
    pub life_insurance: LifeInsuranceTaxSchedule,
    /// Discount applied to the main residence in the estate (0.20 = 20%)
    pub main_residence_discount: f64,
}

impl FiscalModel {
    /// French rules in force, held in memory
    pub fn default_france() -> Self {
        Self {
            demembrement: DemembrementTable::article_669(),
            inheritance: InheritanceTaxSchedule::france(),
            life_insurance: LifeInsuranceTaxSchedule::france(),
            main_residence_discount: 0.20,
        }
    }

    /// Load fiscal tables from CSV files in the default location (data/fiscal/)
    pub fn from_csv() -> Result<Self, FiscalModelError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_FISCAL_PATH))
    }

    /// Load fiscal tables from CSV files in a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self, FiscalModelError> {
        let loaded = LoadedFiscalTables::load_from(path)?;
        Self::from_loaded(loaded)
    }

    pub fn from_loaded(loaded: LoadedFiscalTables) -> Result<Self, FiscalModelError> {
        let discount = loaded.constant("main_residence_discount")?;
        if !(0.0..1.0).contains(&discount) {
            return Err(FiscalModelError::InvalidTable {
                table: "fiscal_constants",
                reason: format!("main_residence_discount {} out of [0, 1)", discount),
            });
        }

        let child_abatement = loaded.constant("child_abatement")?;
        let life_insurance_abatement = loaded.constant("life_insurance_abatement")?;

        Ok(Self {
            demembrement: DemembrementTable::new(loaded.demembrement)?,
            inheritance: InheritanceTaxSchedule {
                child_abatement,
                child_schedule: ProgressiveSchedule::new(
                    loaded.child_brackets,
                    "inheritance_child_brackets",
                )?,
            },
            life_insurance: LifeInsuranceTaxSchedule {
                abatement: life_insurance_abatement,
                schedule: ProgressiveSchedule::new(
                    loaded.life_insurance_brackets,
                    "life_insurance_brackets",
                )?,
            },
            main_residence_discount: discount,
        })
    }
}

impl Default for FiscalModel {
    fn default() -> Self {
        Self::default_france()
    }
}
