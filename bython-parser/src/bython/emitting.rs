//! Emitting
//!
//!     Emitters consume [`LineEvents`](crate::bython::depth::LineEvents) and produce the
//!     output text. Each input line yields at most a few output lines; content is indented
//!     from the event depth, never from the input's whitespace.
//!
//!     The [`IndentEmitter`] writes Python. A block opener becomes a `:` at the end of the
//!     header, and an empty block gets a `pass` statement. The [`BraceEmitter`] writes Bython.
//!     A block opener becomes ` {` at the end of the header, and each closer becomes a `}` line
//!     right after the last code line of the block, ahead of any trailing blank or comment
//!     lines.

pub mod forward;
pub mod line;
pub mod reverse;

pub use forward::IndentEmitter;
pub use line::OutputLine;
pub use reverse::BraceEmitter;

/// Join rendered lines, ending the text with a newline when there is any.
pub fn join_lines(lines: &[OutputLine]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.render());
        out.push('\n');
    }
    out
}

/// Depth of a continuation line. Lines that start by closing a bracket line up with the
/// statement they continue.
pub fn continuation_depth(depth: usize, payload: &str) -> usize {
    match payload.trim_start().chars().next() {
        Some(')' | ']' | '}') => depth,
        _ => depth + 1,
    }
}
