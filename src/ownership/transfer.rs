//! Transfer of a decedent's shares to the surviving spouse and children

use log::debug;

use super::owners::Owners;
use super::ownership::Ownership;
use crate::error::{Result, SuccessionError};
use crate::fiscal::SpouseFiscalOption;

/// Surviving spouse inheriting alongside the children
#[derive(Debug, Clone, PartialEq)]
pub struct SpouseHeir {
    pub name: String,
    pub fiscal_option: SpouseFiscalOption,
}

impl SpouseHeir {
    pub fn new(name: &str, fiscal_option: SpouseFiscalOption) -> Self {
        Self {
            name: name.to_string(),
            fiscal_option,
        }
    }
}

impl Ownership {
    /// Pass the decedent's shares to its heirs.
    ///
    /// The ownership is only replaced once the result is valid and no longer
    /// names the decedent; on error it is left untouched.
    pub fn transfer_ownership_of(
        &mut self,
        decedent: &str,
        children: &[String],
        spouse: Option<&SpouseHeir>,
    ) -> Result<()> {
        if spouse.is_none() && children.is_empty() {
            debug!("no heir for {}, ownership unchanged", decedent);
            return Ok(());
        }
        if !self.is_owned_by(decedent) {
            return Ok(());
        }
        self.check_validity()?;

        let mut updated = match self {
            Ownership::Full { owners } => transfer_full_ownership(owners, decedent, children, spouse),
            Ownership::Dismembered { usufruct, bare } => {
                let mut usufruct = usufruct.clone();
                let mut bare = bare.clone();
                let u = usufruct.remove(decedent);
                let b = bare.remove(decedent);
                match spouse {
                    Some(spouse) => {
                        transfer_usufruct_and_bare_ownership(&mut usufruct, &mut bare, u, b, children, spouse)
                    }
                    None => {
                        bare.add_equally(children, b);
                        transfer_usufruct(&mut usufruct, &bare, u);
                    }
                }
                Ownership::Dismembered { usufruct, bare }
            }
        };
        updated.group_shares();

        updated.check_validity()?;
        if updated.is_owned_by(decedent) {
            return Err(SuccessionError::invalid_ownership(
                "",
                format!("{} still holds shares after the transfer", decedent),
            ));
        }

        *self = updated;
        Ok(())
    }
}

/// Share `s` of a fully owned property
fn transfer_full_ownership(
    owners: &Owners,
    decedent: &str,
    children: &[String],
    spouse: Option<&SpouseHeir>,
) -> Ownership {
    let mut others = owners.clone();
    let s = others.remove(decedent);

    match spouse {
        None => {
            others.add_equally(children, s);
            Ownership::Full { owners: others }
        }
        Some(spouse) => {
            let mut usufruct = others.clone();
            let mut bare = others;
            pass_full_ownership(&mut usufruct, &mut bare, s, children, spouse);
            Ownership::Dismembered { usufruct, bare }
        }
    }
}

/// The decedent held `u` in usufruct and `b` in bare ownership
fn transfer_usufruct_and_bare_ownership(
    usufruct: &mut Owners,
    bare: &mut Owners,
    u: f64,
    b: f64,
    children: &[String],
    spouse: &SpouseHeir,
) {
    // Holding both roles on the same fraction is full ownership
    let p = u.min(b);
    pass_full_ownership(usufruct, bare, p, children, spouse);
    transfer_bare_ownership(bare, b - p, children, spouse);
    transfer_usufruct(usufruct, bare, u - p);
}

/// Give a full-ownership fraction `p` to the heirs, in both owner sets
fn pass_full_ownership(usufruct: &mut Owners, bare: &mut Owners, p: f64, children: &[String], spouse: &SpouseHeir) {
    if children.is_empty() {
        usufruct.add(&spouse.name, p);
        bare.add(&spouse.name, p);
        return;
    }

    match spouse.fiscal_option {
        SpouseFiscalOption::FullUsufruct => {
            usufruct.add(&spouse.name, p);
            bare.add_equally(children, p);
        }
        SpouseFiscalOption::QuotiteDisponible => {
            let q = SpouseFiscalOption::quotite_disponible(children.len());
            for owners in [usufruct, bare] {
                owners.add(&spouse.name, p * q);
                owners.add_equally(children, p * (1.0 - q));
            }
        }
        SpouseFiscalOption::UsufructPlusBare => {
            usufruct.add(&spouse.name, p);
            bare.add(&spouse.name, p / 4.0);
            bare.add_equally(children, p * 3.0 / 4.0);
        }
    }
}

/// Bare-ownership fraction `b` passes as bare ownership
fn transfer_bare_ownership(bare: &mut Owners, b: f64, children: &[String], spouse: &SpouseHeir) {
    if children.is_empty() {
        bare.add(&spouse.name, b);
        return;
    }

    match spouse.fiscal_option {
        SpouseFiscalOption::FullUsufruct => bare.add_equally(children, b),
        SpouseFiscalOption::QuotiteDisponible => {
            let q = SpouseFiscalOption::quotite_disponible(children.len());
            bare.add(&spouse.name, b * q);
            bare.add_equally(children, b * (1.0 - q));
        }
        SpouseFiscalOption::UsufructPlusBare => {
            bare.add(&spouse.name, b / 4.0);
            bare.add_equally(children, b * 3.0 / 4.0);
        }
    }
}

/// Usufruct fraction `u` dies with its holder and joins the bare owners
fn transfer_usufruct(usufruct: &mut Owners, bare: &Owners, u: f64) {
    for owner in bare.grouped().iter() {
        usufruct.add(&owner.name, u * owner.fraction / 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use approx::assert_abs_diff_eq;

    fn children() -> Vec<String> {
        vec![ARTHUR.to_string(), LOU_ANN.to_string()]
    }

    fn spouse(option: SpouseFiscalOption) -> SpouseHeir {
        SpouseHeir::new(VANESSA, option)
    }

    fn split(ownership: &Ownership) -> (&Owners, &Owners) {
        match ownership {
            Ownership::Dismembered { usufruct, bare } => (usufruct, bare),
            other => panic!("expected a dismembered ownership, got {:?}", other),
        }
    }

    fn owners(ownership: &Ownership) -> &Owners {
        match ownership {
            Ownership::Full { owners } => owners,
            other => panic!("expected a full ownership, got {:?}", other),
        }
    }

    #[test]
    fn test_full_ownership_to_spouse_in_usufruct() {
        let mut ownership = Ownership::full(Owners::from_shares([(LIONEL, 50.0), (VANESSA, 50.0)]));
        ownership
            .transfer_ownership_of(LIONEL, &children(), Some(&spouse(SpouseFiscalOption::FullUsufruct)))
            .unwrap();

        let (usufruct, bare) = split(&ownership);
        assert_eq!(usufruct.fraction_of(VANESSA), 100.0);
        assert_eq!(bare.fraction_of(VANESSA), 50.0);
        assert_eq!(bare.fraction_of(ARTHUR), 25.0);
        assert_eq!(bare.fraction_of(LOU_ANN), 25.0);
    }

    #[test]
    fn test_full_ownership_with_quotite_disponible() {
        let mut ownership = Ownership::sole(LIONEL);
        ownership
            .transfer_ownership_of(LIONEL, &children(), Some(&spouse(SpouseFiscalOption::QuotiteDisponible)))
            .unwrap();

        let owners = owners(&ownership);
        assert_abs_diff_eq!(owners.fraction_of(VANESSA), 100.0 / 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(owners.fraction_of(ARTHUR), 100.0 / 3.0, epsilon = 1e-9);
        assert!(ownership.is_valid());
    }

    #[test]
    fn test_full_ownership_with_quarter_and_usufruct() {
        let mut ownership = Ownership::sole(LIONEL);
        ownership
            .transfer_ownership_of(LIONEL, &children(), Some(&spouse(SpouseFiscalOption::UsufructPlusBare)))
            .unwrap();

        let (usufruct, bare) = split(&ownership);
        assert_eq!(usufruct.fraction_of(VANESSA), 100.0);
        assert_eq!(bare.fraction_of(VANESSA), 25.0);
        assert_eq!(bare.fraction_of(ARTHUR), 37.5);
        assert_eq!(bare.fraction_of(LOU_ANN), 37.5);
    }

    #[test]
    fn test_full_ownership_without_spouse() {
        let mut ownership = Ownership::full(Owners::from_shares([(LIONEL, 60.0), (ARTHUR, 40.0)]));
        ownership.transfer_ownership_of(LIONEL, &children(), None).unwrap();

        let owners = owners(&ownership);
        assert_eq!(owners.len(), 2);
        assert_eq!(owners.fraction_of(ARTHUR), 70.0);
        assert_eq!(owners.fraction_of(LOU_ANN), 30.0);
    }

    #[test]
    fn test_spouse_alone_inherits_everything() {
        let mut ownership = Ownership::sole(LIONEL);
        ownership
            .transfer_ownership_of(LIONEL, &[], Some(&spouse(SpouseFiscalOption::FullUsufruct)))
            .unwrap();
        assert!(ownership.has_a_unique_full_owner(VANESSA));
    }

    #[test]
    fn test_usufruct_extinguished_on_death() {
        let mut ownership = Ownership::dismembered(
            Owners::from_shares([(LIONEL, 50.0), (VANESSA, 50.0)]),
            Owners::from_shares([(ARTHUR, 50.0), (LOU_ANN, 50.0)]),
        );
        ownership
            .transfer_ownership_of(LIONEL, &children(), Some(&spouse(SpouseFiscalOption::FullUsufruct)))
            .unwrap();

        let (usufruct, bare) = split(&ownership);
        assert_eq!(usufruct.fraction_of(VANESSA), 50.0);
        assert_eq!(usufruct.fraction_of(ARTHUR), 25.0);
        assert_eq!(bare.fraction_of(ARTHUR), 50.0);
    }

    #[test]
    fn test_sole_usufructuary_death_reunifies() {
        let mut ownership = Ownership::dismembered(
            Owners::sole(LIONEL),
            Owners::from_shares([(ARTHUR, 50.0), (LOU_ANN, 50.0)]),
        );
        ownership.transfer_ownership_of(LIONEL, &children(), None).unwrap();

        let owners = owners(&ownership);
        assert_eq!(owners.fraction_of(ARTHUR), 50.0);
        assert_eq!(owners.fraction_of(LOU_ANN), 50.0);
    }

    #[test]
    fn test_bare_ownership_passes_as_bare() {
        let mut ownership = Ownership::dismembered(
            Owners::sole(VANESSA),
            Owners::from_shares([(LIONEL, 50.0), (ARTHUR, 50.0)]),
        );
        ownership
            .transfer_ownership_of(LIONEL, &children(), Some(&spouse(SpouseFiscalOption::UsufructPlusBare)))
            .unwrap();

        let (usufruct, bare) = split(&ownership);
        assert_eq!(usufruct.fraction_of(VANESSA), 100.0);
        assert_eq!(bare.fraction_of(VANESSA), 12.5);
        assert_eq!(bare.fraction_of(ARTHUR), 50.0 + 18.75);
        assert_eq!(bare.fraction_of(LOU_ANN), 18.75);
    }

    #[test]
    fn test_decedent_holding_both_roles() {
        // 40% in full ownership plus 20% residual usufruct
        let mut ownership = Ownership::dismembered(
            Owners::from_shares([(LIONEL, 60.0), (ARTHUR, 40.0)]),
            Owners::from_shares([(LIONEL, 40.0), (LOU_ANN, 60.0)]),
        );
        ownership
            .transfer_ownership_of(LIONEL, &children(), Some(&spouse(SpouseFiscalOption::FullUsufruct)))
            .unwrap();

        let (usufruct, bare) = split(&ownership);
        assert!(usufruct.is_valid() && bare.is_valid());
        assert_abs_diff_eq!(usufruct.fraction_of(VANESSA), 40.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bare.fraction_of(ARTHUR), 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bare.fraction_of(LOU_ANN), 80.0, epsilon = 1e-9);
        // The residual 20% usufruct goes pro rata to the bare owners
        assert_abs_diff_eq!(usufruct.fraction_of(ARTHUR), 40.0 + 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(usufruct.fraction_of(LOU_ANN), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn test_transfer_completeness() {
        let cases = [
            Ownership::sole(LIONEL),
            Ownership::full(Owners::from_shares([(LIONEL, 50.0), (VANESSA, 50.0)])),
            Ownership::dismembered(Owners::sole(LIONEL), Owners::sole(ARTHUR)),
            Ownership::dismembered(Owners::sole(VANESSA), Owners::from_shares([(LIONEL, 30.0), (LOU_ANN, 70.0)])),
            Ownership::dismembered(
                Owners::from_shares([(LIONEL, 10.0), (VANESSA, 90.0)]),
                Owners::from_shares([(LIONEL, 90.0), (ARTHUR, 10.0)]),
            ),
        ];
        let options = [
            Some(spouse(SpouseFiscalOption::FullUsufruct)),
            Some(spouse(SpouseFiscalOption::QuotiteDisponible)),
            Some(spouse(SpouseFiscalOption::UsufructPlusBare)),
            None,
        ];

        for case in &cases {
            for option in &options {
                let mut ownership = case.clone();
                ownership
                    .transfer_ownership_of(LIONEL, &children(), option.as_ref())
                    .unwrap();
                assert!(!ownership.is_owned_by(LIONEL), "{:?} with {:?}", case, option);
                assert!(ownership.is_valid());
            }
        }
    }

    #[test]
    fn test_no_heir_is_a_no_op() {
        let original = Ownership::dismembered(Owners::sole(LIONEL), Owners::sole(ARTHUR));
        let mut ownership = original.clone();
        ownership.transfer_ownership_of(LIONEL, &[], None).unwrap();
        assert_eq!(ownership, original);
    }

    #[test]
    fn test_invalid_ownership_left_unchanged() {
        let original = Ownership::full(Owners::from_shares([(LIONEL, 50.0), (VANESSA, 20.0)]));
        let mut ownership = original.clone();
        let result = ownership.transfer_ownership_of(LIONEL, &children(), None);

        assert!(matches!(result, Err(SuccessionError::InvalidOwnership { .. })));
        assert_eq!(ownership, original);
    }
}
