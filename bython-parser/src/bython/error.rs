//! Errors and warnings produced by a translation

use serde::Serialize;
use std::fmt;

/// The four ways a source can be structurally malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StructuralErrorKind {
    /// A `}` with no matching `{`
    UnbalancedCloser,
    /// A string literal or block comment that never closes
    UnterminatedLiteral,
    /// An indentation change that matches no enclosing block
    InconsistentIndentation,
    /// End of input with blocks still open
    UnterminatedBlock,
}

impl fmt::Display for StructuralErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructuralErrorKind::UnbalancedCloser => "unbalanced closer",
            StructuralErrorKind::UnterminatedLiteral => "unterminated literal",
            StructuralErrorKind::InconsistentIndentation => "inconsistent indentation",
            StructuralErrorKind::UnterminatedBlock => "unterminated block",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("line {line}: {kind}: {message}")]
pub struct StructuralError {
    /// 1-based line in the input
    pub line: usize,
    pub kind: StructuralErrorKind,
    pub message: String,
    /// Output produced before the error was detected, when any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partial_output: Option<String>,
}

impl StructuralError {
    pub fn new(kind: StructuralErrorKind, line: usize, message: impl Into<String>) -> Self {
        StructuralError {
            line,
            kind,
            message: message.into(),
            partial_output: None,
        }
    }

    pub fn with_partial_output(mut self, output: String) -> Self {
        self.partial_output = Some(output);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// An import that names no file in the module index
    UnresolvedImport,
    /// A block opener with no preceding statement to attach to
    DetachedBlock,
    /// Python code that spells a Bython comment marker, such as floor division `//`
    CommentMarkerInCode,
}

/// Non-fatal finding. The translation still succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub line: usize,
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, line: usize, message: impl Into<String>) -> Self {
        Warning {
            line,
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TranslationError {
    pub fn as_structural(&self) -> Option<&StructuralError> {
        match self {
            TranslationError::Structural(err) => Some(err),
            TranslationError::InvalidConfig(_) => None,
        }
    }

    pub fn line(&self) -> Option<usize> {
        self.as_structural().map(|err| err.line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_display() {
        let err = StructuralError::new(
            StructuralErrorKind::UnbalancedCloser,
            3,
            "closing brace has no matching opening brace",
        );
        assert_eq!(
            err.to_string(),
            "line 3: unbalanced closer: closing brace has no matching opening brace"
        );
    }

    #[test]
    fn test_translation_error_line() {
        let err: TranslationError =
            StructuralError::new(StructuralErrorKind::UnterminatedBlock, 7, "block never closed")
                .into();
        assert_eq!(err.line(), Some(7));
        assert_eq!(TranslationError::InvalidConfig("x".into()).line(), None);
    }
}
