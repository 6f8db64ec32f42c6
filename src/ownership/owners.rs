//! Owners and their fractional shares

use serde::{Deserialize, Serialize};

/// Tolerance on fraction sums and share comparisons (fractions are in %)
pub const FRACTION_TOLERANCE: f64 = 1e-4;

/// Fractions below this are considered gone after a transfer
const NEGLIGIBLE_FRACTION: f64 = 1e-9;

/// One person's share of a property, in percent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    /// Share in percent (0..=100)
    pub fraction: f64,
}

impl Owner {
    pub fn new(name: impl Into<String>, fraction: f64) -> Self {
        Self {
            name: name.into(),
            fraction,
        }
    }
}

/// Ordered list of owners; valid when non-empty and summing to 100
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Owners(Vec<Owner>);

impl Owners {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// A single owner holding 100%
    pub fn sole(name: &str) -> Self {
        Self(vec![Owner::new(name, 100.0)])
    }

    /// Build from (name, fraction) pairs
    pub fn from_shares<S: Into<String>>(shares: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self(
            shares
                .into_iter()
                .map(|(name, fraction)| Owner::new(name, fraction))
                .collect(),
        )
    }

    /// Equal shares between the given names
    pub fn equally(names: &[String]) -> Self {
        let fraction = 100.0 / names.len() as f64;
        Self::from_shares(names.iter().map(|name| (name.clone(), fraction)))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Owner> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn sum_of_fractions(&self) -> f64 {
        self.0.iter().map(|owner| owner.fraction).sum()
    }

    /// Non-empty, no negative share, and fractions summing to 100
    pub fn is_valid(&self) -> bool {
        !self.is_empty()
            && self.0.iter().all(|owner| owner.fraction >= 0.0 && !owner.name.is_empty())
            && (self.sum_of_fractions() - 100.0).abs() < FRACTION_TOLERANCE
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|owner| owner.name == name)
    }

    /// Total share of `name`, summing duplicate entries
    pub fn fraction_of(&self, name: &str) -> f64 {
        self.0
            .iter()
            .filter(|owner| owner.name == name)
            .map(|owner| owner.fraction)
            .sum()
    }

    /// Distinct names in first-appearance order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.0.len());
        for owner in &self.0 {
            if !names.contains(&owner.name) {
                names.push(owner.name.clone());
            }
        }
        names
    }

    /// Append a share; negligible shares are ignored
    pub fn add(&mut self, name: &str, fraction: f64) {
        if fraction > NEGLIGIBLE_FRACTION {
            self.0.push(Owner::new(name, fraction));
        }
    }

    /// Give `fraction` split equally between `names`
    pub fn add_equally(&mut self, names: &[String], fraction: f64) {
        if names.is_empty() {
            return;
        }
        let each = fraction / names.len() as f64;
        for name in names {
            self.add(name, each);
        }
    }

    /// Remove every entry of `name`, returning its total share
    pub fn remove(&mut self, name: &str) -> f64 {
        let fraction = self.fraction_of(name);
        self.0.retain(|owner| owner.name != name);
        fraction
    }

    /// Sum duplicate names and drop negligible shares
    pub fn grouped(&self) -> Owners {
        let mut grouped: Vec<Owner> = Vec::with_capacity(self.0.len());
        for owner in &self.0 {
            match grouped.iter_mut().find(|g| g.name == owner.name) {
                Some(existing) => existing.fraction += owner.fraction,
                None => grouped.push(owner.clone()),
            }
        }
        grouped.retain(|owner| owner.fraction > NEGLIGIBLE_FRACTION);
        Owners(grouped)
    }

    pub fn group(&mut self) {
        *self = self.grouped();
    }

    /// Same people holding the same shares, whatever the order
    pub fn same_shares(&self, other: &Owners) -> bool {
        let mine = self.grouped();
        let theirs = other.grouped();
        mine.len() == theirs.len()
            && mine.iter().all(|owner| {
                theirs
                    .iter()
                    .any(|o| o.name == owner.name && (o.fraction - owner.fraction).abs() < FRACTION_TOLERANCE)
            })
    }
}

impl FromIterator<Owner> for Owners {
    fn from_iter<I: IntoIterator<Item = Owner>>(iter: I) -> Self {
        Owners(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Owners {
    type Item = &'a Owner;
    type IntoIter = std::slice::Iter<'a, Owner>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(!Owners::new().is_valid());
        assert!(Owners::sole("A").is_valid());
        assert!(Owners::from_shares([("A", 60.0), ("B", 40.0)]).is_valid());
        assert!(Owners::from_shares([("A", 60.0), ("B", 40.00001)]).is_valid());
        assert!(!Owners::from_shares([("A", 60.0), ("B", 30.0)]).is_valid());
        assert!(!Owners::from_shares([("A", 120.0), ("B", -20.0)]).is_valid());

        let thirds = Owners::equally(&["A".to_string(), "B".to_string(), "C".to_string()]);
        assert!(thirds.is_valid());
    }

    #[test]
    fn test_grouping() {
        let owners = Owners::from_shares([("A", 25.0), ("B", 50.0), ("A", 25.0), ("C", 0.0)]);
        let grouped = owners.grouped();

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped.names(), vec!["A".to_string(), "B".to_string()]);
        assert_eq!(grouped.fraction_of("A"), 50.0);
        assert_eq!(grouped.grouped(), grouped);
    }

    #[test]
    fn test_remove_and_add() {
        let mut owners = Owners::from_shares([("A", 25.0), ("B", 50.0), ("A", 25.0)]);

        assert_eq!(owners.remove("A"), 50.0);
        assert!(!owners.contains("A"));
        assert_eq!(owners.remove("Z"), 0.0);

        owners.add_equally(&["C".to_string(), "D".to_string()], 50.0);
        owners.add("E", 0.0);
        assert!(owners.is_valid());
        assert_eq!(owners.len(), 3);
        assert_eq!(owners.fraction_of("D"), 25.0);
    }

    #[test]
    fn test_same_shares_ignores_order() {
        let a = Owners::from_shares([("A", 50.0), ("B", 50.0)]);
        let b = Owners::from_shares([("B", 25.0), ("A", 50.0), ("B", 25.0)]);
        let c = Owners::from_shares([("A", 40.0), ("B", 60.0)]);

        assert!(a.same_shares(&b));
        assert!(!a.same_shares(&c));
    }
}
