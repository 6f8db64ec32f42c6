//! Life-insurance succession: capital paid on death and its taxation (art. 990 I)

use std::collections::BTreeMap;

use log::info;

use super::types::{CoupleUFNP, Inheritance, NamedValue, Succession, SuccessionKind};
use crate::clause::Beneficiaries;
use crate::error::{Result, SuccessionError};
use crate::family::FamilyProvider;
use crate::fiscal::FiscalModel;
use crate::ownership::Ownership;
use crate::patrimoine::{Asset, Ownable, Patrimoine};

pub struct LifeInsuranceSuccessionManager<'a> {
    fiscal: &'a FiscalModel,
    family: &'a dyn FamilyProvider,
    /// Year of death; capital is valued at the end of the previous year
    year: i32,
}

impl<'a> LifeInsuranceSuccessionManager<'a> {
    pub fn new(fiscal: &'a FiscalModel, family: &'a dyn FamilyProvider, year: i32) -> Self {
        Self { fiscal, family, year }
    }

    /// Usufruct share (0..=1) of a usufructuary's value, at its age in the year of death
    fn usufruct_rate(&self, usufructuary: &str) -> Result<f64> {
        let age = self
            .family
            .age_of(usufructuary, self.year)
            .ok_or_else(|| SuccessionError::UnknownMember(usufructuary.to_string()))?;
        Ok(self.fiscal.demembrement.usufruct_rate(age))
    }

    /// UF / NP pairs created by the decedent's death on one contract.
    ///
    /// A contract held by the decedent with a dismembered clause pairs the
    /// usufruct recipient with each bare recipient. A dismembered contract
    /// whose usufruct the decedent held pairs the decedent with each bare owner.
    pub fn abattements_par_assurance(&self, contract: &Asset, decedent: &str) -> Result<Vec<CoupleUFNP>> {
        let mut couples = Vec::new();

        match (&contract.ownership, contract.clause()) {
            (Ownership::Full { owners }, Some(clause)) if owners.contains(decedent) => {
                if let Beneficiaries::Dismembered {
                    usufruct_recipient,
                    bare_recipients,
                } = &clause.beneficiaries
                {
                    let rate = self.usufruct_rate(usufruct_recipient)?;
                    for bare_recipient in bare_recipients {
                        couples.push(CoupleUFNP {
                            uf: NamedValue::new(usufruct_recipient, rate),
                            np: NamedValue::new(bare_recipient, 1.0 - rate),
                        });
                    }
                }
            }
            (Ownership::Dismembered { usufruct, bare }, Some(_)) if usufruct.contains(decedent) => {
                let rate = self.usufruct_rate(decedent)?;
                for bare_owner in bare.names() {
                    couples.push(CoupleUFNP {
                        uf: NamedValue::new(decedent, rate),
                        np: NamedValue::new(&bare_owner, 1.0 - rate),
                    });
                }
            }
            _ => {}
        }

        Ok(couples)
    }

    /// Couples across all the decedent's contracts
    pub fn abattements_par_couple(&self, patrimoine: &Patrimoine, decedent: &str) -> Result<Vec<CoupleUFNP>> {
        let mut couples = Vec::new();
        for contract in patrimoine.life_insurances() {
            couples.extend(self.abattements_par_assurance(contract, decedent)?);
        }
        Ok(couples)
    }

    /// Fraction of the allowance each beneficiary is entitled to.
    ///
    /// Full recipients and the spouse get the whole allowance; members of
    /// UF / NP couples get the sum of their weights, capped at 1.
    pub fn abattements_par_personne(
        &self,
        patrimoine: &Patrimoine,
        decedent: &str,
        spouse: Option<&str>,
    ) -> Result<BTreeMap<String, f64>> {
        let mut fractions: BTreeMap<String, f64> = BTreeMap::new();

        for couple in self.abattements_par_couple(patrimoine, decedent)? {
            for side in [&couple.uf, &couple.np] {
                if side.name != decedent {
                    *fractions.entry(side.name.clone()).or_insert(0.0) += side.value;
                }
            }
        }

        for contract in patrimoine.life_insurances() {
            if !contract.ownership.has_a_full_owner(decedent) {
                continue;
            }
            if let Some(Beneficiaries::Full { recipients }) = contract.clause().map(|c| &c.beneficiaries) {
                // A full recipient is entitled to the whole allowance whatever its couples weigh
                for name in recipients.names() {
                    let fraction = fractions.entry(name).or_insert(0.0);
                    *fraction = fraction.max(1.0);
                }
            }
        }

        if let Some(spouse) = spouse {
            if fractions.contains_key(spouse) {
                fractions.insert(spouse.to_string(), 1.0);
            }
        }

        for fraction in fractions.values_mut() {
            *fraction = fraction.min(1.0);
        }
        Ok(fractions)
    }

    /// Gross capital received by each beneficiary
    pub fn capitaux_par_personne(&self, patrimoine: &Patrimoine, decedent: &str) -> Result<BTreeMap<String, f64>> {
        let mut capitals: BTreeMap<String, f64> = BTreeMap::new();
        let mut credit = |name: &str, amount: f64| {
            *capitals.entry(name.to_string()).or_insert(0.0) += amount;
        };

        for contract in patrimoine.life_insurances() {
            let value = contract.value(self.year - 1);
            match (&contract.ownership, contract.clause()) {
                (Ownership::Full { owners }, Some(clause)) if owners.contains(decedent) => {
                    let capital = value * owners.fraction_of(decedent) / 100.0;
                    match &clause.beneficiaries {
                        Beneficiaries::Full { recipients } => {
                            for recipient in recipients {
                                credit(&recipient.name, capital * recipient.fraction / 100.0);
                            }
                        }
                        Beneficiaries::Dismembered {
                            usufruct_recipient,
                            bare_recipients,
                        } => {
                            let rate = self.usufruct_rate(usufruct_recipient)?;
                            credit(usufruct_recipient, capital * rate);
                            let per_bare = capital * (1.0 - rate) / bare_recipients.len() as f64;
                            for bare_recipient in bare_recipients {
                                credit(bare_recipient, per_bare);
                            }
                        }
                    }
                }
                (Ownership::Dismembered { usufruct, bare }, Some(_)) if usufruct.contains(decedent) => {
                    let capital = value * usufruct.fraction_of(decedent) / 100.0;
                    for owner in bare {
                        credit(&owner.name, capital * owner.fraction / 100.0);
                    }
                }
                _ => {}
            }
        }

        Ok(capitals)
    }

    pub fn succession(&self, decedent: &str, patrimoine: &Patrimoine, spouse: Option<&str>) -> Result<Succession> {
        let capitals = self.capitaux_par_personne(patrimoine, decedent)?;
        let abattements = self.abattements_par_personne(patrimoine, decedent, spouse)?;
        let total: f64 = capitals.values().sum();

        let inheritances = capitals
            .iter()
            .map(|(name, &capital)| {
                let abat_frac = abattements.get(name).copied().unwrap_or(1.0);
                let heritage = if Some(name.as_str()) == spouse {
                    self.fiscal.life_insurance.heritage_of_spouse(capital)
                } else {
                    self.fiscal.life_insurance.heritage_of_child(capital, abat_frac)
                };
                Inheritance {
                    person_name: name.clone(),
                    percent_fiscal: if total > 0.0 { capital / total * 100.0 } else { 0.0 },
                    brut_fiscal: capital,
                    abat_frac,
                    net_fiscal: heritage.net_amount,
                    tax: heritage.tax,
                    received: capital,
                    received_net: heritage.net_amount,
                }
            })
            .collect();

        let succession = Succession {
            kind: SuccessionKind::LifeInsurance,
            year_of_death: self.year,
            decedent_name: decedent.to_string(),
            taxable_value: total,
            inheritances,
        };
        info!(
            "life-insurance succession of {} in {}: capital {:.2}, taxes {:.2}",
            decedent,
            self.year,
            total,
            succession.tax()
        );
        Ok(succession)
    }
}
