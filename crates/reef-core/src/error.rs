use crate::entity::EntityKind;
use crate::point::Point;

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur when building or querying a world.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A collision-checked insertion targeted a cell that already holds an entity.
    #[error("position occupied: {0}")]
    Occupied(Point),

    /// A collision-checked insertion targeted a cell outside the grid.
    #[error("position out of bounds: {0}")]
    OutOfBounds(Point),

    /// A description line had the wrong number of fields for its kind.
    #[error("{key} expects {expected} fields, found {found}")]
    FieldCount {
        /// The description key (first field of the line).
        key: String,
        /// The number of fields the key requires.
        expected: usize,
        /// The number of fields actually present.
        found: usize,
    },

    /// A numeric field could not be parsed.
    #[error("invalid {field}: \"{value}\"")]
    InvalidNumber {
        /// Name of the field being parsed.
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
    },

    /// The first field of a description line did not name a known kind.
    #[error("unknown key: \"{0}\"")]
    UnknownKey(String),

    /// Animation timing was requested for a kind that never animates.
    #[error("animation period not supported for {0}")]
    UnsupportedAnimation(EntityKind),
}

impl CoreError {
    /// Returns true if a world loader may skip the offending line and continue.
    ///
    /// Collisions are authoring errors and abort loading; everything else is
    /// a malformed line.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Occupied(_) | Self::UnsupportedAnimation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collisions_are_fatal() {
        assert!(!CoreError::Occupied(Point::new(1, 1)).is_recoverable());
    }

    #[test]
    fn malformed_lines_are_recoverable() {
        assert!(CoreError::OutOfBounds(Point::new(-3, 0)).is_recoverable());
        assert!(CoreError::UnknownKey("kelp".into()).is_recoverable());
        assert!(
            CoreError::FieldCount {
                key: "fish".into(),
                expected: 5,
                found: 3
            }
            .is_recoverable()
        );
    }

    #[test]
    fn error_messages_name_the_problem() {
        let err = CoreError::InvalidNumber {
            field: "col",
            value: "x".into(),
        };
        assert_eq!(err.to_string(), "invalid col: \"x\"");
        assert_eq!(
            CoreError::UnsupportedAnimation(EntityKind::Fish).to_string(),
            "animation period not supported for fish"
        );
    }
}
