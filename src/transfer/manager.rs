//! Transfer of a decedent's whole patrimony to its heirs

use std::collections::BTreeMap;

use log::{debug, warn};

use super::life_insurance::transfer_life_insurance;
use crate::clause::modify_clause;
use crate::error::{Result, SuccessionError};
use crate::family::FamilyProvider;
use crate::fiscal::FiscalModel;
use crate::ownership::{EvaluationContext, EvaluationMethod, Ownership, SpouseHeir};
use crate::patrimoine::{Ownable, Patrimoine};

/// Legal heirs of a decedent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Heirs {
    pub children: Vec<String>,
    pub spouse: Option<SpouseHeir>,
}

impl Heirs {
    /// Surviving spouse and children of an adult dying in `year`; a deceased child has none
    pub fn of(family: &dyn FamilyProvider, decedent: &str, year: i32) -> Result<Self> {
        let person = family
            .member(decedent)
            .ok_or_else(|| SuccessionError::UnknownMember(decedent.to_string()))?;
        if !person.is_adult() {
            return Ok(Heirs::default());
        }

        let spouse = family
            .spouse_name_of(decedent, year)
            .and_then(|name| family.member(&name))
            .map(|spouse| SpouseHeir::new(&spouse.name, spouse.fiscal_option().unwrap_or_default()));

        Ok(Heirs {
            children: family.children_alive_names(year),
            spouse,
        })
    }

    pub fn spouse_name(&self) -> Option<&str> {
        self.spouse.as_ref().map(|spouse| spouse.name.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.spouse.is_none()
    }
}

/// Applies the ownership consequences of a death to a patrimony
pub struct OwnershipManager<'a> {
    fiscal: &'a FiscalModel,
    family: &'a dyn FamilyProvider,
    /// Year of death
    year: i32,
    /// Simulation run, for traces only
    run: u64,
}

impl<'a> OwnershipManager<'a> {
    pub fn new(fiscal: &'a FiscalModel, family: &'a dyn FamilyProvider, year: i32, run: u64) -> Self {
        Self {
            fiscal,
            family,
            year,
            run,
        }
    }

    pub fn context(&self, method: EvaluationMethod) -> EvaluationContext<'a> {
        EvaluationContext::new(self.year, method, &self.fiscal.demembrement, self.family)
    }

    pub fn heirs_of(&self, decedent: &str) -> Result<Heirs> {
        Heirs::of(self.family, decedent, self.year)
    }

    /// Transfer every asset and liability held by the decedent and rewrite
    /// the clauses naming it. The patrimony is only replaced on success.
    pub fn transfer_ownership_of(&self, patrimoine: &mut Patrimoine, decedent: &str) -> Result<()> {
        let heirs = self.heirs_of(decedent)?;
        if heirs.is_empty() {
            warn!("run {}: {} leaves no heir, ownerships unchanged", self.run, decedent);
        }
        let spouse = heirs.spouse.as_ref();

        let mut updated = patrimoine.clone();
        self.rewrite_clauses_naming(&mut updated, decedent)?;
        for asset in updated.assets.iter_mut() {
            let name = asset.name.clone();
            if !asset.is_owned_by(decedent) {
                continue;
            }
            if asset.is_life_insurance() {
                transfer_life_insurance(asset, decedent, &heirs.children, spouse)?;
            } else {
                asset
                    .ownership
                    .transfer_ownership_of(decedent, &heirs.children, spouse)
                    .map_err(|err| err.on_asset(&name))?;
            }
            debug!("run {}: '{}' transferred from {}", self.run, name, decedent);
        }

        for liability in updated.liabilities.iter_mut() {
            if liability.is_owned_by(decedent) {
                liability
                    .ownership
                    .transfer_ownership_of(decedent, &heirs.children, spouse)
                    .map_err(|err| err.on_asset(&liability.name))?;
            }
        }

        *patrimoine = updated;
        Ok(())
    }

    /// Rewrite every clause naming a recipient who died during the year.
    ///
    /// Its share goes to the co-recipients, else to the surviving children,
    /// else back to the other holders of the contract. The patrimony is only
    /// replaced on success.
    pub fn rewrite_clauses_naming(&self, patrimoine: &mut Patrimoine, decedent: &str) -> Result<()> {
        let children = self.family.children_alive_names(self.year);

        let mut updated = patrimoine.clone();
        for asset in updated.assets.iter_mut() {
            let holders: Vec<String> = match &asset.ownership {
                Ownership::Full { owners } => owners.names(),
                Ownership::Dismembered { usufruct, .. } => usufruct.names(),
            }
            .into_iter()
            .filter(|name| name != decedent)
            .collect();

            let name = asset.name.clone();
            if let Some(clause) = asset.clause_mut() {
                if clause.names_recipient(decedent) {
                    clause
                        .manage_recipient_death(decedent, &children, &holders)
                        .map_err(|err| err.on_asset(&name))?;
                    debug!("run {}: clause of '{}' no longer names {}", self.run, name, decedent);
                }
            }
        }

        *patrimoine = updated;
        Ok(())
    }

    /// Rewrite optional clauses of the decedent's contracts, smallest first,
    /// until no child is missing capital. Returns whether a clause changed.
    pub fn modify_life_insurance_clause_if_necessary_and_possible(
        &self,
        patrimoine: &mut Patrimoine,
        decedent: &str,
        conjoint: Option<&str>,
        missing_capital: &mut BTreeMap<String, f64>,
        correction_factor: f64,
    ) -> Result<bool> {
        let ctx = self.context(EvaluationMethod::LifeInsuranceSuccession);

        let mut candidates = Vec::new();
        for (index, asset) in patrimoine.assets.iter().enumerate() {
            if asset.is_life_insurance() && asset.ownership.has_a_full_owner(decedent) {
                candidates.push((index, asset.owned_value(decedent, self.year - 1, &ctx)?));
            }
        }
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut changed = false;
        for (index, _) in candidates {
            if missing_capital.values().all(|missing| *missing <= 0.0) {
                break;
            }
            changed |= modify_clause(
                &mut patrimoine.assets[index],
                missing_capital,
                decedent,
                conjoint,
                &ctx,
                correction_factor,
            )?;
        }

        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Beneficiaries, Clause};
    use crate::fixtures::*;
    use crate::fiscal::SpouseFiscalOption;
    use crate::family::{Family, Person};
    use crate::ownership::Owners;
    use crate::patrimoine::{Asset, AssetKind, InvestmentType, Valuation};

    #[test]
    fn test_heirs_of() {
        let fiscal = FiscalModel::default_france();
        let family = michaud_family();
        let manager = OwnershipManager::new(&fiscal, &family, YEAR, 0);

        let heirs = manager.heirs_of(LIONEL).unwrap();
        assert_eq!(heirs.children, vec![ARTHUR.to_string(), LOU_ANN.to_string()]);
        assert_eq!(
            heirs.spouse,
            Some(SpouseHeir::new(VANESSA, SpouseFiscalOption::FullUsufruct))
        );

        assert!(manager.heirs_of(ARTHUR).unwrap().is_empty());
        assert!(matches!(manager.heirs_of("Nobody"), Err(SuccessionError::UnknownMember(_))));
    }

    #[test]
    fn test_transfer_of_michaud_patrimoine() {
        let fiscal = FiscalModel::default_france();
        let family = michaud_family();
        let manager = OwnershipManager::new(&fiscal, &family, YEAR, 0);
        let mut patrimoine = michaud_patrimoine();

        manager.transfer_ownership_of(&mut patrimoine, LIONEL).unwrap();

        assert!(patrimoine.check_validity().is_ok());
        for asset in &patrimoine.assets {
            assert!(!asset.is_owned_by(LIONEL), "{} still owned", asset.name);
            if let Some(clause) = asset.clause() {
                assert!(!clause.names_recipient(LIONEL), "{} still names the decedent", asset.name);
            }
        }
        assert!(patrimoine.liabilities.iter().all(|l| !l.is_owned_by(LIONEL)));

        // Vanessa's contract now benefits the children
        let av = patrimoine.asset(AV_VANESSA).unwrap();
        assert_eq!(
            av.clause().unwrap().beneficiaries,
            Beneficiaries::Full {
                recipients: Owners::from_shares([(ARTHUR, 50.0), (LOU_ANN, 50.0)])
            }
        );

        // Generali paid in usufruct to Vanessa, bare ownership to the children
        let generali = patrimoine.asset(AV_GENERALI).unwrap();
        assert_eq!(
            generali.ownership,
            Ownership::dismembered(Owners::sole(VANESSA), Owners::from_shares([(ARTHUR, 50.0), (LOU_ANN, 50.0)]))
        );
    }

    #[test]
    fn test_failed_transfer_leaves_patrimoine_unchanged() {
        let fiscal = FiscalModel::default_france();
        let family = michaud_family();
        let manager = OwnershipManager::new(&fiscal, &family, YEAR, 0);

        let mut patrimoine = michaud_patrimoine();
        patrimoine.assets.push(Asset::new(
            "Compte joint",
            AssetKind::FreeInvestment {
                investment_type: InvestmentType::Other,
            },
            Valuation::constant(YEAR, 1_000.0),
            Ownership::full(Owners::from_shares([(LIONEL, 50.0), (VANESSA, 40.0)])),
        ));
        let original = patrimoine.clone();

        let err = manager.transfer_ownership_of(&mut patrimoine, LIONEL).unwrap_err();
        assert!(matches!(err, SuccessionError::InvalidOwnership { ref asset, .. } if asset == "Compte joint"));
        assert_eq!(patrimoine, original);
    }

    fn contract_to_arthur() -> Patrimoine {
        Patrimoine::new(
            vec![Asset::new(
                "AV Lionel",
                AssetKind::FreeInvestment {
                    investment_type: InvestmentType::LifeInsurance {
                        clause: Clause::full(Owners::sole(ARTHUR)),
                    },
                },
                Valuation::constant(YEAR - 1, 100_000.0),
                Ownership::sole(LIONEL),
            )],
            vec![],
        )
    }

    #[test]
    fn test_death_of_a_child_recipient() {
        let fiscal = FiscalModel::default_france();
        let family = Family::new(vec![
            Person::adult(LIONEL, 1965, SpouseFiscalOption::FullUsufruct),
            Person::child(ARTHUR, 1996).dying_in(YEAR),
            Person::child(LOU_ANN, 1998),
        ]);
        let manager = OwnershipManager::new(&fiscal, &family, YEAR, 0);

        let mut patrimoine = contract_to_arthur();
        manager.transfer_ownership_of(&mut patrimoine, ARTHUR).unwrap();
        assert_eq!(
            patrimoine.asset("AV Lionel").unwrap().clause().unwrap().beneficiaries,
            Beneficiaries::Full {
                recipients: Owners::sole(LOU_ANN)
            }
        );

        // Only child: the capital reverts to the insured
        let family = Family::new(vec![
            Person::adult(LIONEL, 1965, SpouseFiscalOption::FullUsufruct),
            Person::child(ARTHUR, 1996).dying_in(YEAR),
        ]);
        let manager = OwnershipManager::new(&fiscal, &family, YEAR, 0);
        let mut patrimoine = contract_to_arthur();
        manager.transfer_ownership_of(&mut patrimoine, ARTHUR).unwrap();
        let contract = patrimoine.asset("AV Lionel").unwrap();
        assert_eq!(
            contract.clause().unwrap().beneficiaries,
            Beneficiaries::Full {
                recipients: Owners::sole(LIONEL)
            }
        );
        assert_eq!(contract.ownership, Ownership::sole(LIONEL));
    }

    #[test]
    fn test_smallest_contracts_rewritten_first() {
        let fiscal = FiscalModel::default_france();
        let family = michaud_family();
        let manager = OwnershipManager::new(&fiscal, &family, YEAR, 0);

        let contract = |name: &str, value: f64| {
            Asset::new(
                name,
                AssetKind::FreeInvestment {
                    investment_type: InvestmentType::LifeInsurance {
                        clause: Clause::full(Owners::sole(VANESSA)).optional(),
                    },
                },
                Valuation::constant(YEAR - 1, value),
                Ownership::sole(LIONEL),
            )
        };
        let mut patrimoine = Patrimoine::new(
            vec![contract("Big", 500_000.0), contract("Small", 20_000.0), contract("Medium", 60_000.0)],
            vec![],
        );
        let mut missing = BTreeMap::from([(ARTHUR.to_string(), 30_000.0), (LOU_ANN.to_string(), 0.0)]);

        let changed = manager
            .modify_life_insurance_clause_if_necessary_and_possible(
                &mut patrimoine,
                LIONEL,
                Some(VANESSA),
                &mut missing,
                1.3,
            )
            .unwrap();

        // Small covers 20 000, Medium the remaining 10 000; Big keeps its clause
        assert!(changed);
        assert!(missing.values().all(|m| *m == 0.0));
        assert!(!patrimoine.asset("Small").unwrap().clause().unwrap().is_optional);
        assert!(!patrimoine.asset("Medium").unwrap().clause().unwrap().is_optional);
        assert!(patrimoine.asset("Big").unwrap().clause().unwrap().is_optional);
    }
}
