//! Error types for Corral operations.
//!
//! This module provides the main error type [`CorralError`]. Every layout
//! failure is fatal to the run that raised it: the simulation performs no
//! retries and no silent defaulting, so the error carries enough context
//! (entity index, force name, step) to fix the input or the configuration.

use std::io;

use thiserror::Error;

use crate::{entity::Group, simulation::SimulationState};

/// The main error type for Corral operations.
#[derive(Debug, Error)]
pub enum CorralError {
    /// A malformed input entity, rejected before any node is created.
    #[error("Validation error: entity #{index}: {reason}")]
    Validation { index: usize, reason: String },

    /// An entity's group is not part of the configured ordinal domain.
    #[error("Lookup error: entity #{index} has group {group}, which is not in the domain of force `{force}`")]
    Lookup {
        index: usize,
        group: Group,
        force: String,
    },

    /// A force produced a NaN or infinite velocity delta.
    #[error("Numeric instability: force `{force}` produced a non-finite value for entity #{index} at step {step}")]
    NumericInstability {
        index: usize,
        force: String,
        step: usize,
    },

    /// An operation was attempted in a state that does not allow it.
    #[error("Invalid state: cannot {operation} while the simulation is {state}")]
    InvalidState {
        operation: &'static str,
        state: SimulationState,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Export error: {0}")]
    Export(String),
}

impl CorralError {
    /// Create a new `Validation` error for the entity at `index`.
    pub fn validation(index: usize, reason: impl Into<String>) -> Self {
        Self::Validation {
            index,
            reason: reason.into(),
        }
    }
}
