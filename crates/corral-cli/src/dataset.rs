//! Dataset loading for the CLI
//!
//! A dataset is a TOML file with an `[[entities]]` array. Each table needs a
//! `group` and a `radius`; any other key is kept as a passthrough attribute:
//!
//! ```toml
//! [[entities]]
//! group = 1
//! radius = 29.0
//! advantage = true
//! ```

use std::{fs, io, path::Path};

use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use corral::{
    CorralError,
    entity::{Entity, EntityRecord},
};

/// Dataset-related errors for CLI
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to parse TOML dataset: {0}")]
    Parse(String),
}

impl From<DatasetError> for CorralError {
    fn from(err: DatasetError) -> Self {
        CorralError::Io(io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
    }
}

#[derive(Debug, Default, Deserialize)]
struct Dataset {
    #[serde(default)]
    entities: Vec<EntityRecord>,
}

/// Load entities from a TOML dataset file
///
/// # Errors
///
/// Returns error if the file cannot be read, is not valid TOML, or contains a
/// malformed entity.
pub fn load_entities(path: impl AsRef<Path>) -> Result<Vec<Entity>, CorralError> {
    let path = path.as_ref();
    info!(path = path.display().to_string(); "Loading dataset");

    let content = fs::read_to_string(path)?;
    parse_entities(&content)
}

fn parse_entities(content: &str) -> Result<Vec<Entity>, CorralError> {
    let dataset: Dataset =
        toml::from_str(content).map_err(|e| DatasetError::Parse(e.to_string()))?;
    let entities = Entity::from_records(dataset.entities)?;

    debug!(entities = entities.len(); "Dataset parsed");
    Ok(entities)
}
