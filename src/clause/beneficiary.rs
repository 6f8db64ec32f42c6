//! Beneficiary clause of a life-insurance contract

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SuccessionError};
use crate::ownership::Owners;

/// Who receives the capital on the insured's death
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Beneficiaries {
    /// Capital paid in full ownership, in the given shares
    Full { recipients: Owners },
    /// Usufruct of the capital to one person, bare ownership shared equally
    Dismembered {
        usufruct_recipient: String,
        bare_recipients: Vec<String>,
    },
}

/// Beneficiary clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    /// The beneficiaries may be rewritten to help the heirs pay their taxes
    #[serde(default)]
    pub is_optional: bool,
    pub beneficiaries: Beneficiaries,
}

impl Clause {
    pub fn full(recipients: Owners) -> Self {
        Self {
            is_optional: false,
            beneficiaries: Beneficiaries::Full { recipients },
        }
    }

    pub fn dismembered(usufruct_recipient: &str, bare_recipients: &[&str]) -> Self {
        Self {
            is_optional: false,
            beneficiaries: Beneficiaries::Dismembered {
                usufruct_recipient: usufruct_recipient.to_string(),
                bare_recipients: bare_recipients.iter().map(|name| name.to_string()).collect(),
            },
        }
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn is_dismembered(&self) -> bool {
        matches!(self.beneficiaries, Beneficiaries::Dismembered { .. })
    }

    pub fn is_valid(&self) -> bool {
        self.check_validity().is_ok()
    }

    /// Structural check; the error carries no contract name
    pub fn check_validity(&self) -> Result<()> {
        match &self.beneficiaries {
            Beneficiaries::Full { recipients } => {
                if recipients.is_valid() {
                    Ok(())
                } else {
                    Err(SuccessionError::invalid_clause(
                        "",
                        format!("recipient shares sum to {:.4}%", recipients.sum_of_fractions()),
                    ))
                }
            }
            Beneficiaries::Dismembered {
                usufruct_recipient,
                bare_recipients,
            } => {
                if usufruct_recipient.is_empty() {
                    return Err(SuccessionError::invalid_clause("", "no usufruct recipient"));
                }
                if bare_recipients.is_empty() {
                    return Err(SuccessionError::invalid_clause("", "no bare recipient"));
                }
                if bare_recipients.iter().any(|name| name == usufruct_recipient) {
                    return Err(SuccessionError::invalid_clause(
                        "",
                        format!("{} is both usufruct and bare recipient", usufruct_recipient),
                    ));
                }
                Ok(())
            }
        }
    }

    /// Named as a recipient in any capacity
    pub fn names_recipient(&self, name: &str) -> bool {
        match &self.beneficiaries {
            Beneficiaries::Full { recipients } => recipients.contains(name),
            Beneficiaries::Dismembered {
                usufruct_recipient,
                bare_recipients,
            } => usufruct_recipient == name || bare_recipients.iter().any(|n| n == name),
        }
    }

    /// Rewrite the clause after one of its recipients died before the insured.
    ///
    /// `children` are the surviving children, used when the decedent was the
    /// only recipient of its kind. Without any, a full share reverts to
    /// `holders`, the surviving holders of the contract. The clause is left
    /// untouched on error.
    pub fn manage_recipient_death(&mut self, decedent: &str, children: &[String], holders: &[String]) -> Result<()> {
        if !self.names_recipient(decedent) {
            return Ok(());
        }

        let beneficiaries = match &self.beneficiaries {
            Beneficiaries::Dismembered {
                usufruct_recipient,
                bare_recipients,
            } => {
                if usufruct_recipient == decedent {
                    Beneficiaries::Full {
                        recipients: Owners::equally(bare_recipients),
                    }
                } else if bare_recipients.len() > 1 {
                    Beneficiaries::Dismembered {
                        usufruct_recipient: usufruct_recipient.clone(),
                        bare_recipients: bare_recipients
                            .iter()
                            .filter(|name| *name != decedent)
                            .cloned()
                            .collect(),
                    }
                } else {
                    let heirs: Vec<String> = children
                        .iter()
                        .filter(|name| *name != usufruct_recipient)
                        .cloned()
                        .collect();
                    if heirs.is_empty() {
                        Beneficiaries::Full {
                            recipients: Owners::sole(usufruct_recipient),
                        }
                    } else {
                        Beneficiaries::Dismembered {
                            usufruct_recipient: usufruct_recipient.clone(),
                            bare_recipients: heirs,
                        }
                    }
                }
            }
            Beneficiaries::Full { recipients } => {
                let mut recipients = recipients.clone();
                let share = recipients.remove(decedent);
                if recipients.is_empty() {
                    let successors = if children.is_empty() { holders } else { children };
                    if successors.is_empty() {
                        return Err(SuccessionError::invalid_clause(
                            "",
                            format!("nobody left to receive the share of {}", decedent),
                        ));
                    }
                    recipients.add_equally(successors, share);
                } else {
                    let co_recipients = recipients.names();
                    recipients.add_equally(&co_recipients, share);
                    recipients.group();
                }
                Beneficiaries::Full { recipients }
            }
        };

        let updated = Clause {
            is_optional: self.is_optional,
            beneficiaries,
        };
        updated.check_validity()?;
        debug!("clause rewritten after the death of recipient {}", decedent);
        *self = updated;
        Ok(())
    }
}
