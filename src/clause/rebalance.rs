//! Rewriting optional clauses so that children can pay their inheritance taxes

use std::collections::BTreeMap;

use log::debug;

use super::beneficiary::Clause;
use crate::error::{Result, SuccessionError};
use crate::ownership::{EvaluationContext, Owners};
use crate::patrimoine::{Asset, Ownable};

/// Multiplier on the missing capital, as the capital redirected is itself taxed
pub const DEFAULT_CORRECTION_FACTOR: f64 = 1.3;

/// Redirect the decedent's share of an optional life-insurance contract
/// towards the children still missing capital.
///
/// Returns false when the contract is not eligible. Each child's entry in
/// `missing_capital` is reduced by what it receives, floored at 0.
pub fn modify_clause(
    contract: &mut Asset,
    missing_capital: &mut BTreeMap<String, f64>,
    decedent: &str,
    conjoint: Option<&str>,
    ctx: &EvaluationContext,
    correction_factor: f64,
) -> Result<bool> {
    let is_optional = contract.clause().map(|clause| clause.is_optional).unwrap_or(false);
    if !is_optional || !contract.ownership.has_a_full_owner(decedent) {
        return Ok(false);
    }

    let owned_value = contract.owned_value(decedent, ctx.year - 1, ctx)?;
    let children: Vec<String> = missing_capital
        .iter()
        .filter(|(_, missing)| **missing > 0.0)
        .map(|(child, _)| child.clone())
        .collect();
    if owned_value <= 0.0 || children.is_empty() {
        return Ok(false);
    }

    let total_missing: f64 = missing_capital.values().sum();
    let to_children = owned_value.min(total_missing * correction_factor);
    let per_child = to_children / children.len() as f64;
    let remainder = owned_value - to_children;

    let mut recipients = Owners::new();
    recipients.add_equally(&children, to_children / owned_value * 100.0);
    match conjoint {
        Some(conjoint) => recipients.add(conjoint, remainder / owned_value * 100.0),
        None => recipients.add_equally(&children, remainder / owned_value * 100.0),
    }
    recipients.group();

    let clause = Clause::full(recipients);
    clause
        .check_validity()
        .map_err(|err| err.on_asset(&contract.name))?;

    match contract.clause_mut() {
        Some(current) => *current = clause,
        None => {
            return Err(SuccessionError::invalid_clause(
                contract.name.clone(),
                "contract lost its clause",
            ))
        }
    }

    for child in &children {
        if let Some(missing) = missing_capital.get_mut(child) {
            *missing = (*missing - per_child).max(0.0);
        }
    }
    debug!(
        "clause of '{}' rewritten: {:.2} to children, {:.2} to {}",
        contract.name,
        to_children,
        remainder,
        conjoint.unwrap_or("children")
    );

    Ok(true)
}
