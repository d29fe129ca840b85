//! Scanner states

/// Quote that opened a string literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Single,
    Double,
    TripleSingle,
    TripleDouble,
}

impl Delimiter {
    pub fn as_str(self) -> &'static str {
        match self {
            Delimiter::Single => "'",
            Delimiter::Double => "\"",
            Delimiter::TripleSingle => "'''",
            Delimiter::TripleDouble => "\"\"\"",
        }
    }

    pub fn len(self) -> usize {
        self.as_str().len()
    }

    pub fn is_triple(self) -> bool {
        matches!(self, Delimiter::TripleSingle | Delimiter::TripleDouble)
    }

    /// Delimiter starting `text`, triple quotes first.
    pub fn at(text: &str) -> Option<Self> {
        [
            Delimiter::TripleDouble,
            Delimiter::TripleSingle,
            Delimiter::Double,
            Delimiter::Single,
        ]
        .into_iter()
        .find(|d| text.starts_with(d.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    #[default]
    Code,
    /// Until end of line
    LineComment,
    BlockComment {
        opened_at: usize,
    },
    StringLiteral {
        delimiter: Delimiter,
        /// A single-quoted literal only spans lines through a trailing backslash
        multiline: bool,
        opened_at: usize,
    },
}

impl ScanState {
    pub fn is_code(&self) -> bool {
        matches!(self, ScanState::Code)
    }
}
