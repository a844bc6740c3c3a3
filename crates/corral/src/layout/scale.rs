//! Ordinal scale mapping groups to x-coordinates.

use indexmap::IndexMap;

use crate::{entity::Group, error::CorralError};

/// A mapping from a small discrete domain of groups to fixed coordinates.
///
/// Unlike a permissive scale, a lookup outside the domain yields `None`
/// instead of implicitly extending the domain; callers surface that as a
/// [`CorralError::Lookup`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinalScale {
    mapping: IndexMap<Group, f64>,
}

impl OrdinalScale {
    /// Builds a scale from parallel domain and range lists.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::Config`] if the lists differ in length or the
    /// domain repeats a group.
    pub fn new(domain: &[Group], range: &[f64]) -> Result<Self, CorralError> {
        if domain.len() != range.len() {
            return Err(CorralError::Config(format!(
                "ordinal scale domain has {} entries but range has {}",
                domain.len(),
                range.len()
            )));
        }

        let mut mapping = IndexMap::with_capacity(domain.len());
        for (&group, &x) in domain.iter().zip(range) {
            if mapping.insert(group, x).is_some() {
                return Err(CorralError::Config(format!(
                    "group {group} appears more than once in the ordinal domain"
                )));
            }
        }

        Ok(Self { mapping })
    }

    /// Returns the coordinate assigned to `group`, if it is in the domain.
    pub fn get(&self, group: Group) -> Option<f64> {
        self.mapping.get(&group).copied()
    }

    /// Returns the domain in declaration order
    pub fn domain(&self) -> impl Iterator<Item = Group> + '_ {
        self.mapping.keys().copied()
    }
}
