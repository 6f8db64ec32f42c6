//! Family members as seen by the succession engine

use serde::{Deserialize, Serialize};

use crate::fiscal::SpouseFiscalOption;

/// Role of a member within the household
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberRole {
    /// Parent of the household; elects a fiscal option if widowed
    Adult {
        #[serde(default)]
        fiscal_option: SpouseFiscalOption,
    },
    Child,
}

/// A single family member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique name, used as identifier in ownerships and clauses
    pub name: String,

    pub birth_year: i32,

    /// Year during which the person dies (None = alive over the horizon)
    #[serde(default)]
    pub death_year: Option<i32>,

    pub role: MemberRole,
}

impl Person {
    pub fn adult(name: &str, birth_year: i32, fiscal_option: SpouseFiscalOption) -> Self {
        Self {
            name: name.to_string(),
            birth_year,
            death_year: None,
            role: MemberRole::Adult { fiscal_option },
        }
    }

    pub fn child(name: &str, birth_year: i32) -> Self {
        Self {
            name: name.to_string(),
            birth_year,
            death_year: None,
            role: MemberRole::Child,
        }
    }

    /// Set the year of death
    pub fn dying_in(mut self, year: i32) -> Self {
        self.death_year = Some(year);
        self
    }

    /// Age reached during `year`
    pub fn age(&self, year: i32) -> u32 {
        (year - self.birth_year).max(0) as u32
    }

    /// Alive at the end of `year` (a person dying during `year` is not)
    pub fn is_alive(&self, year: i32) -> bool {
        match self.death_year {
            Some(death) => year < death,
            None => true,
        }
    }

    pub fn is_adult(&self) -> bool {
        matches!(self.role, MemberRole::Adult { .. })
    }

    pub fn is_child(&self) -> bool {
        matches!(self.role, MemberRole::Child)
    }

    /// Option elected when this person survives its spouse
    pub fn fiscal_option(&self) -> Option<SpouseFiscalOption> {
        match self.role {
            MemberRole::Adult { fiscal_option } => Some(fiscal_option),
            MemberRole::Child => None,
        }
    }
}
