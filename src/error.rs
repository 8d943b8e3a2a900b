use crate::{lexer::Position, parser::ParseError};

/// Convenience result type used by the compiler.
pub type CompileResult<T> = Result<T, CompileError>;

/// Compile-time failures.
///
/// Every variant carries the source offset it refers to. None of them are
/// retryable: translating the same input again fails the same way.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// The source text does not parse.
    #[error("Syntax error: {0}")]
    Syntax(#[from] ParseError),

    /// Unknown call target, NOT over a composite condition, malformed call
    /// shape, or an operator/literal the field type does not support.
    #[error("Unsupported {what} at offset {offset}")]
    UnsupportedConstruct {
        what: String,
        offset: Position,
        options: Option<Vec<String>>,
    },

    /// Chained comparison such as `a == b == c`.
    #[error("Invalid number of comparators: {count} at offset {offset}")]
    InvalidComparatorCount { count: usize, offset: Position },

    /// Schema-aware mode only.
    #[error("Field not found: {field} at offset {offset}")]
    FieldNotFound {
        field: String,
        offset: Position,
        suggestions: Vec<String>,
    },

    /// The right-hand side of a comparison is a field reference rather than
    /// a literal. Compare falls back to field-to-field translation on this.
    #[error("Right-hand side at offset {offset} is a field reference, not a literal")]
    OperatorMismatch { offset: Position },
}

impl CompileError {
    pub fn unsupported(what: impl Into<String>, offset: Position) -> Self {
        CompileError::UnsupportedConstruct {
            what: what.into(),
            offset,
            options: None,
        }
    }

    pub fn unsupported_with_options<I, S>(what: impl Into<String>, offset: Position, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CompileError::UnsupportedConstruct {
            what: what.into(),
            offset,
            options: Some(options.into_iter().map(Into::into).collect()),
        }
    }

    /// Source offset the error points at.
    pub fn offset(&self) -> Position {
        match self {
            CompileError::Syntax(e) => e.offset(),
            CompileError::UnsupportedConstruct { offset, .. }
            | CompileError::InvalidComparatorCount { offset, .. }
            | CompileError::FieldNotFound { offset, .. }
            | CompileError::OperatorMismatch { offset } => *offset,
        }
    }

    /// Alternatives worth suggesting to the user, if any.
    pub fn options(&self) -> Option<&[String]> {
        match self {
            CompileError::UnsupportedConstruct { options, .. } => options.as_deref(),
            CompileError::FieldNotFound { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}
