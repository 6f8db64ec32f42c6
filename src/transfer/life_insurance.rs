//! Payment of a life-insurance contract on the insured's death

use log::debug;

use crate::clause::Beneficiaries;
use crate::error::{Result, SuccessionError};
use crate::ownership::{Ownership, SpouseHeir};
use crate::patrimoine::Asset;

/// Transfer a contract held by the decedent.
///
/// The decedent's full-ownership share goes to the clause's beneficiaries;
/// a dismembered contract follows the ordinary transfer rules. The contract
/// is left untouched on error.
pub fn transfer_life_insurance(
    contract: &mut Asset,
    decedent: &str,
    children: &[String],
    spouse: Option<&SpouseHeir>,
) -> Result<()> {
    let owners = match (&contract.ownership, contract.clause()) {
        (Ownership::Full { owners }, Some(_)) if owners.contains(decedent) => owners.clone(),
        _ => {
            return contract
                .ownership
                .transfer_ownership_of(decedent, children, spouse)
                .map_err(|err| err.on_asset(&contract.name))
        }
    };

    let clause = match contract.clause() {
        Some(clause) => clause,
        None => return Err(SuccessionError::invalid_clause(contract.name.clone(), "no clause")),
    };
    clause.check_validity().map_err(|err| err.on_asset(&contract.name))?;

    let mut others = owners;
    let share = others.remove(decedent);
    let mut updated = match &clause.beneficiaries {
        Beneficiaries::Full { recipients } => {
            for recipient in recipients {
                others.add(&recipient.name, share * recipient.fraction / 100.0);
            }
            Ownership::Full { owners: others }
        }
        Beneficiaries::Dismembered {
            usufruct_recipient,
            bare_recipients,
        } => {
            let mut usufruct = others.clone();
            let mut bare = others;
            usufruct.add(usufruct_recipient, share);
            bare.add_equally(bare_recipients, share);
            Ownership::Dismembered { usufruct, bare }
        }
    };
    updated.group_shares();

    updated
        .check_validity()
        .map_err(|err| err.on_asset(&contract.name))?;
    if updated.is_owned_by(decedent) {
        return Err(SuccessionError::invalid_clause(
            contract.name.clone(),
            format!("{} is a beneficiary of its own contract", decedent),
        ));
    }

    debug!("'{}': {:.2}% paid to the beneficiaries of {}", contract.name, share, decedent);
    contract.ownership = updated;
    Ok(())
}
