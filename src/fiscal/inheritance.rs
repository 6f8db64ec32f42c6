//! Inheritance tax schedule in direct line and the surviving spouse's options

use serde::{Deserialize, Serialize};

use super::demembrement::DemembrementTable;
use super::loader::FiscalModelError;

/// One slice of a progressive schedule: `rate` applies above `floor`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub floor: f64,
    pub rate: f64,
}

/// Bases below this are rounding noise and owe nothing
const NEGLIGIBLE_BASE: f64 = 1e-6;

/// Progressive tax schedule applied to a taxable base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressiveSchedule {
    brackets: Vec<TaxBracket>,
}

impl ProgressiveSchedule {
    pub fn new(mut brackets: Vec<TaxBracket>, table: &'static str) -> Result<Self, FiscalModelError> {
        brackets.sort_by(|a, b| a.floor.total_cmp(&b.floor));

        match brackets.first() {
            Some(first) if first.floor == 0.0 => {}
            _ => {
                return Err(FiscalModelError::InvalidTable {
                    table,
                    reason: "schedule must start at 0".to_string(),
                })
            }
        }
        if let Some(pair) = brackets.windows(2).find(|pair| pair[0].floor == pair[1].floor) {
            return Err(FiscalModelError::InvalidTable {
                table,
                reason: format!("duplicate bracket at {}", pair[0].floor),
            });
        }
        if let Some(b) = brackets.iter().find(|b| !(0.0..=1.0).contains(&b.rate)) {
            return Err(FiscalModelError::InvalidTable {
                table,
                reason: format!("rate {} out of range above {}", b.rate, b.floor),
            });
        }

        Ok(Self { brackets })
    }

    /// Build from brackets already sorted and starting at 0
    pub(crate) fn from_sorted(brackets: Vec<TaxBracket>) -> Self {
        Self { brackets }
    }

    /// Tax due on a taxable base
    pub fn tax(&self, taxable: f64) -> f64 {
        if taxable <= NEGLIGIBLE_BASE {
            return 0.0;
        }
        let mut tax = 0.0;
        for (i, bracket) in self.brackets.iter().enumerate() {
            if taxable <= bracket.floor {
                break;
            }
            let ceiling = self
                .brackets
                .get(i + 1)
                .map(|next| next.floor)
                .unwrap_or(f64::INFINITY);
            tax += (taxable.min(ceiling) - bracket.floor) * bracket.rate;
        }
        tax
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}

/// Outcome of taxing one heir's share
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeritageTax {
    /// Base remaining after the personal allowance
    pub taxable: f64,
    /// Tax due
    pub tax: f64,
    /// Share received net of tax
    pub net_amount: f64,
}

/// Direct-line (parent to child) inheritance tax
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InheritanceTaxSchedule {
    /// Personal allowance per child
    pub child_abatement: f64,
    pub child_schedule: ProgressiveSchedule,
}

impl InheritanceTaxSchedule {
    /// Barème of art. 777 CGI with the 100 000 € allowance of art. 779
    pub fn france() -> Self {
        let brackets = [
            (0.0, 0.05),
            (8_072.0, 0.10),
            (12_109.0, 0.15),
            (15_932.0, 0.20),
            (552_324.0, 0.30),
            (902_838.0, 0.40),
            (1_805_677.0, 0.45),
        ]
        .iter()
        .map(|&(floor, rate)| TaxBracket { floor, rate })
        .collect();

        Self {
            child_abatement: 100_000.0,
            child_schedule: ProgressiveSchedule::from_sorted(brackets),
        }
    }

    /// Tax a child's gross share, with `abat_frac` of the personal allowance
    pub fn heritage_of_child(&self, part_succession: f64, abat_frac: f64) -> HeritageTax {
        let taxable = (part_succession - self.child_abatement * abat_frac).max(0.0);
        let tax = self.child_schedule.tax(taxable);
        HeritageTax {
            taxable,
            tax,
            net_amount: part_succession - tax,
        }
    }

    /// The surviving spouse is exempt (art. 796-0 bis CGI)
    pub fn heritage_of_spouse(&self, part_succession: f64) -> HeritageTax {
        HeritageTax {
            taxable: 0.0,
            tax: 0.0,
            net_amount: part_succession,
        }
    }
}

/// Election of the surviving spouse over the estate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpouseFiscalOption {
    /// Usufruct of the whole estate
    #[default]
    FullUsufruct,
    /// Quotité disponible in full ownership
    QuotiteDisponible,
    /// 1/4 in full ownership and 3/4 in usufruct
    UsufructPlusBare,
}

/// Valued shares of the estate (fractions of 1) for the spouse and for each child
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedValues {
    pub for_spouse: f64,
    pub for_each_child: f64,
}

impl SpouseFiscalOption {
    /// Quotité disponible for the spouse given the number of children
    pub fn quotite_disponible(nb_children: usize) -> f64 {
        match nb_children {
            0 => 1.0,
            1 => 1.0 / 2.0,
            2 => 1.0 / 3.0,
            _ => 1.0 / 4.0,
        }
    }

    /// Economic value of the spouse's and of each child's share
    pub fn shares(
        &self,
        nb_children: usize,
        spouse_age: u32,
        demembrement: &DemembrementTable,
    ) -> SharedValues {
        if nb_children == 0 {
            return SharedValues {
                for_spouse: 1.0,
                for_each_child: 0.0,
            };
        }

        let n = nb_children as f64;
        let usufruct = demembrement.usufruct_rate(spouse_age);
        let for_spouse = match self {
            SpouseFiscalOption::FullUsufruct => usufruct,
            SpouseFiscalOption::QuotiteDisponible => Self::quotite_disponible(nb_children),
            SpouseFiscalOption::UsufructPlusBare => 0.25 + 0.75 * usufruct,
        };

        SharedValues {
            for_spouse,
            for_each_child: (1.0 - for_spouse) / n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_progressive_schedule() {
        let schedule = InheritanceTaxSchedule::france();

        assert_eq!(schedule.child_schedule.tax(0.0), 0.0);
        assert_abs_diff_eq!(schedule.child_schedule.tax(8_072.0), 403.6, epsilon = 1e-9);

        // 8072*5% + (12109-8072)*10% + (15932-12109)*15% + (100000-15932)*20%
        let expected = 403.6 + 403.7 + 573.45 + 16_813.6;
        assert_abs_diff_eq!(schedule.child_schedule.tax(100_000.0), expected, epsilon = 1e-6);
    }

    #[test]
    fn test_schedule_rejects_duplicate_floors() {
        let bracket = |floor, rate| TaxBracket { floor, rate };
        let brackets = vec![bracket(0.0, 0.05), bracket(8_072.0, 0.10), bracket(8_072.0, 0.15)];

        let err = ProgressiveSchedule::new(brackets, "inheritance_child_brackets").unwrap_err();
        assert!(matches!(err, FiscalModelError::InvalidTable { .. }));
        assert!(ProgressiveSchedule::new(vec![bracket(0.0, 0.05), bracket(8_072.0, 0.10)], "x").is_ok());
    }

    #[test]
    fn test_rounding_noise_is_not_taxed() {
        let schedule = InheritanceTaxSchedule::france();

        // 300 000 x 2/3 / 2 lands a hair above the allowance
        let share = 300_000.0 * (2.0 / 3.0) / 2.0;
        assert_eq!(schedule.heritage_of_child(share, 1.0).tax, 0.0);
        assert_eq!(schedule.heritage_of_child(100_000.0 + 1e-9, 1.0).tax, 0.0);
        assert!(schedule.heritage_of_child(100_001.0, 1.0).tax > 0.0);
    }

    #[test]
    fn test_heritage_of_child_allowance() {
        let schedule = InheritanceTaxSchedule::france();

        let below = schedule.heritage_of_child(80_000.0, 1.0);
        assert_eq!(below.tax, 0.0);
        assert_eq!(below.net_amount, 80_000.0);

        let above = schedule.heritage_of_child(200_000.0, 1.0);
        assert_abs_diff_eq!(above.taxable, 100_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(above.net_amount, 200_000.0 - above.tax, epsilon = 1e-9);

        // Half allowance doubles part of the base
        let half = schedule.heritage_of_child(200_000.0, 0.5);
        assert_abs_diff_eq!(half.taxable, 150_000.0, epsilon = 1e-9);
        assert!(half.tax > above.tax);
    }

    #[test]
    fn test_spouse_option_shares() {
        let table = DemembrementTable::article_669();

        let usufruct = SpouseFiscalOption::FullUsufruct.shares(2, 55, &table);
        assert_abs_diff_eq!(usufruct.for_spouse, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(usufruct.for_each_child, 0.25, epsilon = 1e-12);

        let quotite = SpouseFiscalOption::QuotiteDisponible.shares(3, 55, &table);
        assert_abs_diff_eq!(quotite.for_spouse, 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(quotite.for_each_child, 0.25, epsilon = 1e-12);

        let mixed = SpouseFiscalOption::UsufructPlusBare.shares(1, 65, &table);
        assert_abs_diff_eq!(mixed.for_spouse, 0.25 + 0.75 * 0.4, epsilon = 1e-12);

        let alone = SpouseFiscalOption::QuotiteDisponible.shares(0, 65, &table);
        assert_eq!(alone.for_spouse, 1.0);
    }
}
