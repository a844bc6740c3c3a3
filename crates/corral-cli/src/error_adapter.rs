//! Error adapter for converting CorralError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error type
//! and miette's rich diagnostic formatting used in the CLI. Layout errors
//! carry no source spans, so each error becomes a single diagnostic with a
//! stable code and a hint on how to fix the input.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan};

use corral::CorralError;

/// Adapter for [`CorralError`].
pub struct ErrorAdapter<'a>(pub &'a CorralError);

impl ErrorAdapter<'_> {
    fn code_str(&self) -> &'static str {
        match self.0 {
            CorralError::Validation { .. } => "corral::validation",
            CorralError::Lookup { .. } => "corral::lookup",
            CorralError::NumericInstability { .. } => "corral::numeric",
            CorralError::InvalidState { .. } => "corral::state",
            CorralError::Config(_) => "corral::config",
            CorralError::Io(_) => "corral::io",
            CorralError::Export(_) => "corral::export",
        }
    }

    fn help_str(&self) -> Option<&'static str> {
        let help = match self.0 {
            CorralError::Validation { .. } => {
                "every entity needs an integer `group` and a positive, finite `radius`"
            }
            CorralError::Lookup { .. } => {
                "add the group to `layout.group_domain` with a matching `layout.group_range` entry"
            }
            CorralError::NumericInstability { .. } => {
                "lower the force strengths or raise `layout.velocity_decay`"
            }
            CorralError::InvalidState { .. } => {
                "create a new simulation instead of reusing a converged one"
            }
            CorralError::Config(_) => "check the configuration file; omitted keys use defaults",
            CorralError::Io(_) => "check that the input exists and the output is writable",
            CorralError::Export(_) => return None,
        };
        Some(help)
    }
}

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code_str()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_str().map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        None
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use corral::{entity::Group, simulation::SimulationState};

    use super::*;

    fn code(err: &CorralError) -> String {
        ErrorAdapter(err).code().unwrap().to_string()
    }

    #[test]
    fn test_codes() {
        assert_eq!(code(&CorralError::validation(0, "bad")), "corral::validation");
        assert_eq!(
            code(&CorralError::Lookup {
                index: 0,
                group: Group::new(4),
                force: "x".to_string(),
            }),
            "corral::lookup"
        );
        assert_eq!(
            code(&CorralError::NumericInstability {
                index: 0,
                force: "charge".to_string(),
                step: 3,
            }),
            "corral::numeric"
        );
        assert_eq!(
            code(&CorralError::InvalidState {
                operation: "run",
                state: SimulationState::Converged,
            }),
            "corral::state"
        );
        assert_eq!(code(&CorralError::Config("x".to_string())), "corral::config");
        assert_eq!(code(&CorralError::Export("x".to_string())), "corral::export");
    }

    #[test]
    fn test_message_and_help() {
        let err = CorralError::Lookup {
            index: 2,
            group: Group::new(4),
            force: "x".to_string(),
        };
        let adapter = ErrorAdapter(&err);

        assert_eq!(adapter.to_string(), err.to_string());
        assert!(adapter.help().unwrap().to_string().contains("group_domain"));
        assert!(adapter.labels().is_none());
    }

    #[test]
    fn test_export_has_no_help() {
        let err = CorralError::Export("x".to_string());
        assert!(ErrorAdapter(&err).help().is_none());
    }

    #[test]
    fn test_io_source_is_preserved() {
        let err = CorralError::Io(std::io::Error::other("disk"));
        let adapter = ErrorAdapter(&err);
        assert!(std::error::Error::source(&adapter).is_some());
    }
}
