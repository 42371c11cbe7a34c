#![forbid(unsafe_code)]

//! Error types for tour construction and step validation.

use std::error::Error;
use std::fmt;

/// Rejected tour configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A tour needs at least one step.
    EmptySteps,
    /// The configured start index does not name a step.
    StartIndexOutOfRange { index: usize, len: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySteps => write!(f, "tour has no steps"),
            Self::StartIndexOutOfRange { index, len } => {
                write!(f, "start index {index} out of range for {len} step(s)")
            }
        }
    }
}

impl Error for ConfigError {}

/// Why a step failed validation when it came up for display.
///
/// Invalid steps are not construction errors: whether a step can be shown
/// depends on its position directive, so the check happens at run time and
/// the reaction (abort or skip) is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidStepReason {
    /// A floating step needs content to show.
    MissingContent,
    /// A relatively positioned step needs a highlight target.
    MissingTarget,
}

impl fmt::Display for InvalidStepReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingContent => write!(f, "step has no content"),
            Self::MissingTarget => write!(f, "step has no highlight target"),
        }
    }
}

impl Error for InvalidStepReason {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(ConfigError::EmptySteps.to_string(), "tour has no steps");
        assert_eq!(
            ConfigError::StartIndexOutOfRange { index: 3, len: 2 }.to_string(),
            "start index 3 out of range for 2 step(s)"
        );
        assert_eq!(
            InvalidStepReason::MissingTarget.to_string(),
            "step has no highlight target"
        );
    }
}
