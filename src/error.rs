//! Error types.
//!
//! Domain conditions a caller can recover from are returned as
//! [`StaffingError`]. The engine restores the recital to its pre-call state
//! before returning one, so the caller may retry (for example after training
//! someone). Broken invariants are bugs and panic instead.

use thiserror::Error;

use crate::models::RoleKind;
use crate::validation::ValidationError;

/// Recoverable staffing failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StaffingError {
    /// No eligible performer with capacity left can cover a role.
    #[error("no performer available for {role} in song '{song}'")]
    NoPerformerAvailable { song: String, role: RoleKind },

    /// Training was requested for a performer who is already booked.
    #[error("performer '{performer}' cannot be trained: {reason}")]
    PerformerNotTrainable { performer: String, reason: String },
}

pub type StaffingResult<T> = Result<T, StaffingError>;

/// Unknown role label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role: '{0}'")]
pub struct ParseRoleError(pub String);

/// Unknown recital type label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown recital type: '{0}'")]
pub struct ParseRecitalTypeError(pub String);

/// Failure to rebuild a recital from a snapshot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("song '{song}' references unknown performer '{performer}'")]
    UnknownPerformer { song: String, performer: String },

    #[error("snapshot is inconsistent: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),

    /// The stored cost policy is unusable.
    #[error("snapshot {0}")]
    Policy(ConfigError),
}

/// Failure to build a recital from configuration entries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("recital has no name")]
    UnnamedRecital,

    #[error("artist entry #{0} has no name")]
    UnnamedArtist(usize),

    #[error("base artist '{0}' has no entry in the artist list")]
    MissingBaseArtist(String),

    #[error(transparent)]
    Role(#[from] ParseRoleError),

    #[error(transparent)]
    RecitalType(#[from] ParseRecitalTypeError),

    #[error("invalid cost policy: {field} = {value}")]
    InvalidPolicy { field: &'static str, value: f64 },

    #[error("configuration is inconsistent: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_messages_name_context() {
        let err = StaffingError::NoPerformerAvailable {
            song: "Under Pressure".into(),
            role: RoleKind::Bass,
        };
        assert_eq!(
            err.to_string(),
            "no performer available for bass in song 'Under Pressure'"
        );

        let err = StaffingError::PerformerNotTrainable {
            performer: "Elton John".into(),
            reason: "already booked".into(),
        };
        assert!(err.to_string().contains("Elton John"));
    }

    #[test]
    fn test_invalid_lists_every_problem() {
        let err = SnapshotError::Invalid(vec![
            ValidationError::new(ValidationErrorKind::DuplicateName, "dup 'A'"),
            ValidationError::new(ValidationErrorKind::CapacityExceeded, "over cap 'B'"),
        ]);
        assert_eq!(
            err.to_string(),
            "snapshot is inconsistent: dup 'A'; over cap 'B'"
        );
    }
}
