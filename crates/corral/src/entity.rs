//! Input records for the layout.
//!
//! An [`Entity`] is one circle to place: a categorical [`Group`], a radius, and
//! any number of passthrough attributes the layout never reads but the
//! renderer may (e.g. a boolean flag choosing the fill color).
//!
//! [`EntityRecord`] is the loosely typed, deserializable form. Converting a
//! batch of records with [`Entity::from_records`] is all-or-nothing: the first
//! malformed record fails the whole batch.

use std::fmt;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::CorralError;

/// A categorical group identifier, e.g. `1..=K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(transparent)]
pub struct Group(i64);

impl Group {
    pub fn new(key: i64) -> Self {
        Self(key)
    }

    /// Returns the raw group key
    pub fn key(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Group {
    fn from(key: i64) -> Self {
        Self(key)
    }
}

/// A passthrough attribute value carried for the renderer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// Interprets the value as a flag.
    ///
    /// Integers follow the `0`/`1` convention of exported datasets, so
    /// `advantage = 1` and `advantage = true` are equivalent.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Integer(value) => Some(*value != 0),
            Self::Float(_) | Self::Text(_) => None,
        }
    }
}

/// An immutable input record: group membership, radius and passthrough data.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    group: Group,
    radius: f64,
    attributes: IndexMap<String, AttributeValue>,
}

impl Entity {
    /// Creates an entity without passthrough attributes.
    ///
    /// The radius is checked when the entity is handed to a
    /// [`Simulation`](crate::simulation::Simulation), not here.
    pub fn new(group: impl Into<Group>, radius: f64) -> Self {
        Self {
            group: group.into(),
            radius,
            attributes: IndexMap::new(),
        }
    }

    /// Adds (or replaces) a passthrough attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Returns the entity's group
    pub fn group(&self) -> Group {
        self.group
    }

    /// Returns the entity's radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns all passthrough attributes in declaration order
    pub fn attributes(&self) -> &IndexMap<String, AttributeValue> {
        &self.attributes
    }

    /// Returns a single passthrough attribute
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    /// Returns `true` only if the named attribute exists and reads as a set flag.
    pub fn flag(&self, name: &str) -> bool {
        self.attribute(name)
            .and_then(AttributeValue::as_flag)
            .unwrap_or(false)
    }

    /// Sets a boolean passthrough attribute.
    ///
    /// Only data-generation helpers call this; the simulation never mutates
    /// entities.
    pub(crate) fn set_flag(&mut self, name: &str, value: bool) {
        self.attributes
            .insert(name.to_string(), AttributeValue::Bool(value));
    }

    /// Checks the invariants a node needs: a positive, finite radius.
    pub(crate) fn validate(&self, index: usize) -> Result<(), CorralError> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(CorralError::validation(
                index,
                format!(
                    "radius must be a positive finite number, got {}",
                    self.radius
                ),
            ));
        }
        Ok(())
    }

    /// Converts deserialized records into entities.
    ///
    /// # Errors
    ///
    /// Returns [`CorralError::Validation`] naming the first record that is
    /// missing its group or radius, or whose radius is not positive and finite.
    /// No entities are returned in that case.
    pub fn from_records(
        records: impl IntoIterator<Item = EntityRecord>,
    ) -> Result<Vec<Self>, CorralError> {
        records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                let entity = record.into_entity(index)?;
                entity.validate(index)?;
                Ok(entity)
            })
            .collect()
    }
}

/// The deserializable form of an [`Entity`].
///
/// Every key other than `group` and `radius` is kept as a passthrough
/// attribute, preserving declaration order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntityRecord {
    #[serde(default)]
    group: Option<Group>,

    #[serde(default)]
    radius: Option<f64>,

    #[serde(flatten)]
    attributes: IndexMap<String, AttributeValue>,
}

impl EntityRecord {
    fn into_entity(self, index: usize) -> Result<Entity, CorralError> {
        let group = self
            .group
            .ok_or_else(|| CorralError::validation(index, "missing `group`"))?;
        let radius = self
            .radius
            .ok_or_else(|| CorralError::validation(index, "missing `radius`"))?;

        Ok(Entity {
            group,
            radius,
            attributes: self.attributes,
        })
    }
}
