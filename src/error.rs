//! Error types for rolling, parsing, content loading and generation.
//!
//! Each layer has its own enum; higher layers wrap lower ones via `#[from]`
//! so `?` propagates without manual mapping.

use thiserror::Error;

/// Errors raised by the dice roller when asked for an impossible roll.
///
/// # Examples
///
/// ```rust
/// use grimdice::DiceError;
///
/// let err = DiceError::InvalidSides { sides: 1 };
/// assert_eq!(err.to_string(), "Die must have at least 2 sides, got 1");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiceError {
    /// A die needs at least two faces.
    #[error("Die must have at least 2 sides, got {sides}")]
    InvalidSides { sides: u32 },

    /// Dice count outside `1..=MAX_DICE`.
    #[error("Dice count must be between 1 and {max}, got {count}", max = crate::roller::MAX_DICE)]
    InvalidCount { count: u32 },

    /// The lowest or highest possible total does not fit in an `i64`.
    #[error("Dice {count}d{sides} with modifier {modifier} overflow the total")]
    Overflow {
        count: u32,
        sides: u32,
        modifier: i64,
    },
}

/// Errors raised by the strict notation parser.
///
/// The lenient entry points never surface these; they fall back to zero.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// The notation was empty or whitespace only.
    #[error("Empty dice notation")]
    Empty,

    /// The notation matched neither a dice term nor an integer constant.
    #[error("Malformed dice notation: {0:?}")]
    Malformed(String),

    /// The notation was well formed but describes an impossible roll.
    #[error("Invalid dice in notation: {0}")]
    Dice(#[from] DiceError),
}

/// Errors raised while loading or merging game content.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The content document was not valid JSON for the content schema.
    #[error("Invalid content document: {0}")]
    Json(#[from] serde_json::Error),

    /// A class formula failed to parse under the strict notation policy.
    #[error("Class {class_id} has an invalid {field} formula: {source}")]
    InvalidNotation {
        class_id: String,
        field: &'static str,
        #[source]
        source: NotationError,
    },

    /// A custom content document carried nothing to merge.
    #[error("Content document has no classes or tables")]
    EmptyContent,
}

/// Errors raised by the stat generator.
///
/// # Examples
///
/// ```rust
/// use grimdice::GeneratorError;
///
/// let err = GeneratorError::ClassNotFound("gutterborn".to_string());
/// assert!(err.to_string().contains("gutterborn"));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// No class with this id exists in the content repository.
    #[error("Class {0} not found")]
    ClassNotFound(String),

    /// A roll requested by the generator was impossible.
    #[error(transparent)]
    Dice(#[from] DiceError),

    /// A random table had too few entries for the requested pick.
    #[error("Random table {table} needs at least {needed} entries, has {found}")]
    TableTooShort {
        table: &'static str,
        needed: usize,
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dice_error_display() {
        let err = DiceError::InvalidCount { count: 0 };
        let display = err.to_string();
        assert!(display.contains("between 1 and"));
        assert!(display.contains("got 0"));
    }

    #[test]
    fn test_overflow_display_names_the_dice() {
        let err = DiceError::Overflow {
            count: 1,
            sides: 6,
            modifier: i64::MAX,
        };
        assert!(err.to_string().starts_with("Dice 1d6 with modifier 9223372036854775807"));
    }

    #[test]
    fn test_notation_error_wraps_dice_error() {
        let err: NotationError = DiceError::InvalidSides { sides: 0 }.into();
        assert_eq!(err, NotationError::Dice(DiceError::InvalidSides { sides: 0 }));
        assert!(err.to_string().contains("at least 2 sides"));
    }

    #[test]
    fn test_content_error_names_class_and_field() {
        let err = ContentError::InvalidNotation {
            class_id: "fanged-deserter".to_string(),
            field: "hitDie",
            source: NotationError::Malformed("d".to_string()),
        };
        let display = err.to_string();
        assert!(display.contains("fanged-deserter"));
        assert!(display.contains("hitDie"));
    }

    #[test]
    fn test_generator_error_transparent_dice() {
        let err: GeneratorError = DiceError::InvalidSides { sides: 1 }.into();
        assert_eq!(err.to_string(), "Die must have at least 2 sides, got 1");
    }
}
