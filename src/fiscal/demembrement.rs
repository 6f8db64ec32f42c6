//! Age-banded usufruct / bare-ownership valuation table (art. 669 CGI)

use serde::{Deserialize, Serialize};

use super::loader::FiscalModelError;

/// Value of a dismembered property split between its usufruct and bare ownership
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemembrementSplit {
    pub usufruct_value: f64,
    pub bare_value: f64,
}

/// Usufruct percentage by floor age of the usufructuary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemembrementTable {
    /// (floor age, usufruct % in 0..=100), ascending floor ages starting at 0
    bands: Vec<(u32, f64)>,
}

impl DemembrementTable {
    /// Build a table from (floor age, usufruct %) bands
    pub fn new(mut bands: Vec<(u32, f64)>) -> Result<Self, FiscalModelError> {
        bands.sort_by_key(|(age, _)| *age);

        match bands.first() {
            None => {
                return Err(FiscalModelError::InvalidTable {
                    table: "demembrement",
                    reason: "no age band".to_string(),
                })
            }
            Some((first_age, _)) if *first_age != 0 => {
                return Err(FiscalModelError::InvalidTable {
                    table: "demembrement",
                    reason: format!("first band starts at age {} instead of 0", first_age),
                })
            }
            _ => {}
        }

        for window in bands.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(FiscalModelError::InvalidTable {
                    table: "demembrement",
                    reason: format!("duplicate band for age {}", window[0].0),
                });
            }
        }

        if let Some((age, pct)) = bands.iter().find(|(_, pct)| !(0.0..=100.0).contains(pct)) {
            return Err(FiscalModelError::InvalidTable {
                table: "demembrement",
                reason: format!("usufruct {}% out of range at age {}", pct, age),
            });
        }

        Ok(Self { bands })
    }

    /// French barème of art. 669 CGI
    pub fn article_669() -> Self {
        Self {
            bands: vec![
                (0, 90.0),
                (21, 80.0),
                (31, 70.0),
                (41, 60.0),
                (51, 50.0),
                (61, 40.0),
                (71, 30.0),
                (81, 20.0),
                (91, 10.0),
            ],
        }
    }

    /// Usufruct share (0..=1) of the full-ownership value at a given age
    pub fn usufruct_rate(&self, usufructuary_age: u32) -> f64 {
        self.bands
            .iter()
            .take_while(|(floor, _)| *floor <= usufructuary_age)
            .last()
            .map(|(_, pct)| pct / 100.0)
            .unwrap_or(0.0)
    }

    /// Split a full-ownership value according to the usufructuary's age
    pub fn demembrement(&self, value: f64, usufructuary_age: u32) -> DemembrementSplit {
        let usufruct_value = value * self.usufruct_rate(usufructuary_age);
        DemembrementSplit {
            usufruct_value,
            bare_value: value - usufruct_value,
        }
    }

    pub fn bands(&self) -> &[(u32, f64)] {
        &self.bands
    }
}

impl Default for DemembrementTable {
    fn default() -> Self {
        Self::article_669()
    }
}
