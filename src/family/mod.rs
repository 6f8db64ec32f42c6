//! Family queries consumed by the valuation, transfer and succession engines

mod person;

pub use person::{MemberRole, Person};

use serde::{Deserialize, Serialize};

/// Family and demographic queries supplied to the engines
///
/// Implemented by [`Family`]; any other demographic module can plug in by
/// implementing this trait.
pub trait FamilyProvider {
    /// Member lookup by name
    fn member(&self, name: &str) -> Option<&Person>;

    /// Age reached during `year`
    fn age_of(&self, name: &str, year: i32) -> Option<u32> {
        self.member(name).map(|person| person.age(year))
    }

    /// Alive at the end of `year`
    fn is_alive(&self, name: &str, year: i32) -> bool {
        self.member(name).map(|person| person.is_alive(year)).unwrap_or(false)
    }

    /// Spouse of `name` still alive at the end of `year`
    fn spouse_name_of(&self, name: &str, year: i32) -> Option<String>;

    /// Children alive at the end of `year`
    fn children_alive_names(&self, year: i32) -> Vec<String>;

    /// Adults alive at the end of `year`
    fn adults_alive_names(&self, year: i32) -> Vec<String>;

    /// Members dying during `year`
    fn deceased_names(&self, year: i32) -> Vec<String>;
}

/// A household: two adults at most and their common children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Family {
    pub members: Vec<Person>,
}

impl Family {
    pub fn new(members: Vec<Person>) -> Self {
        Self { members }
    }

    pub fn add_member(&mut self, person: Person) {
        self.members.push(person);
    }

    /// Remove a member, returning it if present
    pub fn remove_member(&mut self, name: &str) -> Option<Person> {
        let index = self.members.iter().position(|p| p.name == name)?;
        Some(self.members.remove(index))
    }

    /// Set the year of death of a member; returns false if unknown
    pub fn set_death_year(&mut self, name: &str, year: i32) -> bool {
        match self.members.iter_mut().find(|p| p.name == name) {
            Some(person) => {
                person.death_year = Some(year);
                true
            }
            None => false,
        }
    }
}

impl FamilyProvider for Family {
    fn member(&self, name: &str) -> Option<&Person> {
        self.members.iter().find(|p| p.name == name)
    }

    fn spouse_name_of(&self, name: &str, year: i32) -> Option<String> {
        if !self.member(name)?.is_adult() {
            return None;
        }
        self.members
            .iter()
            .find(|p| p.is_adult() && p.name != name && p.is_alive(year))
            .map(|p| p.name.clone())
    }

    fn children_alive_names(&self, year: i32) -> Vec<String> {
        self.members
            .iter()
            .filter(|p| p.is_child() && p.is_alive(year))
            .map(|p| p.name.clone())
            .collect()
    }

    fn adults_alive_names(&self, year: i32) -> Vec<String> {
        self.members
            .iter()
            .filter(|p| p.is_adult() && p.is_alive(year))
            .map(|p| p.name.clone())
            .collect()
    }

    fn deceased_names(&self, year: i32) -> Vec<String> {
        self.members
            .iter()
            .filter(|p| p.death_year == Some(year))
            .map(|p| p.name.clone())
            .collect()
    }
}
