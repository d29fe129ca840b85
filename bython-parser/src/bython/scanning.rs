//! Scanning
//!
//!     The scanner is the only stage that looks at raw characters. It walks every line with a
//!     small state machine ([`ScanState`]) and splits the line into [`Piece`]s: code runs,
//!     string literals, comments and, in the brace dialect, block openers and closers.
//!
//!     Later stages never look inside a literal or a comment. A brace inside `"a { b"` is part
//!     of a `Literal` piece and can not change the block structure.
//!
//! Expression Braces
//!
//!     Python uses `{}` for dict and set literals. When enabled, a `{` that sits in expression
//!     position (after `=`, `(`, `,`, an operator, `return`, ...) or inside brackets is a plain
//!     character, and so is its matching `}`. Everything else is a block marker.
//!
//! Line Starts
//!
//!     Each scanned line records how it began ([`LineStart`]): fresh, as a continuation of an
//!     open bracket or trailing backslash, inside a multi-line string or inside a block
//!     comment. The depth trackers and emitters use this to leave such lines alone.

pub mod line;
pub mod scanner;
pub mod state;

pub use line::{LineStart, Piece, ScannedLine};
pub use scanner::LiteralScanner;
pub use state::{Delimiter, ScanState};
