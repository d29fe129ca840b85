//! Depth tracking
//!
//!     The depth trackers turn rewritten lines into [`RewriteEvent`]s that carry an absolute
//!     block depth. Both directions share the [`DepthStack`]:
//!
//!         - Forward, the [`BraceTracker`] pushes on `{` and pops on `}`. A `}` with an empty
//!           stack is an unbalanced closer, and blocks still open at the end of the input are
//!           unterminated.
//!         - Reverse, the [`IndentTracker`] measures the leading whitespace of each code line.
//!           A deeper line opens a block, a shallower one closes blocks until a block of the
//!           same width is on top, or fails when none is.
//!
//!     Events come out grouped per input line ([`LineEvents`]) so emitters can keep the line
//!     structure of the input.

pub mod event;
pub mod forward;
pub mod reverse;

pub use event::{EventKind, Layout, LineEvents, RewriteEvent};
pub use forward::BraceTracker;
pub use reverse::IndentTracker;

/// A block that has been opened but not closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenBlock {
    /// Line of the opener
    pub line: usize,
    /// Indentation width of the block's lines, for indentation-delimited input
    pub width: Option<usize>,
    /// At least one statement sits directly in the block
    pub has_body: bool,
}

impl OpenBlock {
    pub fn braced(line: usize) -> Self {
        OpenBlock {
            line,
            width: None,
            has_body: false,
        }
    }

    pub fn indented(line: usize, width: usize) -> Self {
        OpenBlock {
            line,
            width: Some(width),
            has_body: true,
        }
    }
}

/// The current depth is the number of open blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthStack {
    blocks: Vec<OpenBlock>,
}

impl DepthStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.blocks.len()
    }

    pub fn push(&mut self, block: OpenBlock) {
        self.blocks.push(block);
    }

    pub fn pop(&mut self) -> Option<OpenBlock> {
        self.blocks.pop()
    }

    pub fn top(&self) -> Option<&OpenBlock> {
        self.blocks.last()
    }

    /// Width of the innermost block, 0 at top level.
    pub fn top_width(&self) -> usize {
        self.top().and_then(|b| b.width).unwrap_or(0)
    }

    pub fn mark_body(&mut self) {
        if let Some(block) = self.blocks.last_mut() {
            block.has_body = true;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &OpenBlock> {
        self.blocks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_depth_and_widths() {
        let mut stack = DepthStack::new();
        assert_eq!(stack.top_width(), 0);
        stack.push(OpenBlock::indented(1, 4));
        stack.push(OpenBlock::indented(2, 8));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top_width(), 8);
        assert_eq!(stack.pop().map(|b| b.line), Some(2));
        assert_eq!(stack.top_width(), 4);
    }

    #[test]
    fn test_mark_body_touches_innermost_block() {
        let mut stack = DepthStack::new();
        stack.push(OpenBlock::braced(1));
        stack.push(OpenBlock::braced(2));
        stack.mark_body();
        let bodies: Vec<bool> = stack.iter().map(|b| b.has_body).collect();
        assert_eq!(bodies, vec![false, true]);
    }
}
