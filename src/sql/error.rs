//! Parse error types.

use thiserror::Error;

/// Errors raised while parsing a filter expression.
///
/// Positions are byte offsets into the input as given.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,

    #[error("unterminated quoted string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("missing closing parenthesis for '(' at position {position}, found {found}")]
    UnclosedParen { position: usize, found: String },

    #[error("expected field name at position {position}, found {found}")]
    ExpectedField { position: usize, found: String },

    #[error("expected operator after '{field}' at position {position}, found {found}")]
    ExpectedOperator {
        field: String,
        position: usize,
        found: String,
    },

    #[error("expected value at position {position}, found {found}")]
    ExpectedValue { position: usize, found: String },

    #[error("expected {expected} at position {position}, found {found}")]
    ExpectedToken {
        expected: &'static str,
        position: usize,
        found: String,
    },

    #[error("BETWEEN requires AND at position {position}, found {found}")]
    BetweenWithoutAnd { position: usize, found: String },

    #[error("{operator} pattern must be a string at position {position}")]
    PatternNotString {
        operator: &'static str,
        position: usize,
    },

    #[error("unexpected input at position {position}: {found}")]
    UnexpectedInput { position: usize, found: String },
}

impl ParseError {
    /// Byte offset the error refers to, if any
    pub fn position(&self) -> Option<usize> {
        match self {
            ParseError::Empty => None,
            ParseError::UnterminatedString { position }
            | ParseError::UnclosedParen { position, .. }
            | ParseError::ExpectedField { position, .. }
            | ParseError::ExpectedOperator { position, .. }
            | ParseError::ExpectedValue { position, .. }
            | ParseError::ExpectedToken { position, .. }
            | ParseError::BetweenWithoutAnd { position, .. }
            | ParseError::PatternNotString { position, .. }
            | ParseError::UnexpectedInput { position, .. } => Some(*position),
        }
    }
}

/// Result type for parsing
pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(ParseError::Empty.to_string(), "empty expression");
        assert_eq!(
            ParseError::ExpectedValue {
                position: 5,
                found: "end of input".to_string()
            }
            .to_string(),
            "expected value at position 5, found end of input"
        );
        assert_eq!(
            ParseError::PatternNotString {
                operator: "LIKE",
                position: 10
            }
            .to_string(),
            "LIKE pattern must be a string at position 10"
        );
    }

    #[test]
    fn test_position() {
        assert_eq!(ParseError::Empty.position(), None);
        assert_eq!(
            ParseError::UnterminatedString { position: 5 }.position(),
            Some(5)
        );
        assert_eq!(
            ParseError::UnexpectedInput {
                position: 12,
                found: "'x'".to_string()
            }
            .position(),
            Some(12)
        );
    }
}
