//! Scanned line representation

/// How a line begins relative to the scanner state left by the previous line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStart {
    Fresh,
    /// Inside an open bracket, expression brace, or after a trailing backslash
    Continuation,
    InsideString,
    InsideComment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Code(String),
    /// Structural `{`
    Open,
    /// Structural `}`
    Close,
    /// Literal text including its quotes. A piece may hold only part of a multi-line literal.
    Literal(String),
    LineComment {
        marker: String,
        body: String,
    },
    /// Part of a block comment on this line, without the markers
    BlockComment {
        opens: bool,
        closes: bool,
        body: String,
    },
}

impl Piece {
    pub fn is_run(&self) -> bool {
        matches!(self, Piece::Code(_) | Piece::Literal(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Piece::Code(code) if code.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLine {
    pub number: usize,
    pub start: LineStart,
    /// Leading whitespace, empty when the line starts inside a literal or comment
    pub indent: String,
    pub pieces: Vec<Piece>,
}

impl ScannedLine {
    pub fn is_blank(&self) -> bool {
        self.pieces.iter().all(Piece::is_blank)
    }
}
