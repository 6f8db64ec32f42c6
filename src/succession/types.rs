//! Result types of succession computations

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessionKind {
    /// Estate devolved by law
    Legal,
    /// Capital paid by life-insurance contracts
    LifeInsurance,
}

/// What one heir receives from one succession
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inheritance {
    pub person_name: String,

    /// Share of the taxable value, in %
    pub percent_fiscal: f64,

    /// Gross taxable share
    pub brut_fiscal: f64,

    /// Fraction of the personal allowance used (0..=1)
    pub abat_frac: f64,

    /// Taxable share net of tax
    pub net_fiscal: f64,

    pub tax: f64,

    /// Value actually received
    pub received: f64,

    /// Value received net of tax
    pub received_net: f64,
}

/// Outcome of one succession: one decedent, one kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Succession {
    pub kind: SuccessionKind,
    pub year_of_death: i32,
    pub decedent_name: String,
    /// Estate (legal) or total capital paid (life insurance)
    pub taxable_value: f64,
    pub inheritances: Vec<Inheritance>,
}

impl Succession {
    pub fn tax(&self) -> f64 {
        self.inheritances.iter().map(|i| i.tax).sum()
    }

    pub fn received_net(&self) -> f64 {
        self.inheritances.iter().map(|i| i.received_net).sum()
    }

    pub fn inheritance_of(&self, name: &str) -> Option<&Inheritance> {
        self.inheritances.iter().find(|i| i.person_name == name)
    }

    pub fn heir_names(&self) -> Vec<String> {
        self.inheritances.iter().map(|i| i.person_name.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

impl NamedValue {
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

/// Usufruct / bare-ownership pair sharing one life-insurance allowance;
/// values are each side's weight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoupleUFNP {
    #[serde(rename = "UF")]
    pub uf: NamedValue,
    #[serde(rename = "NP")]
    pub np: NamedValue,
}
