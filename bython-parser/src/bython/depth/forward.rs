//! Brace depth tracking for the forward direction

use super::event::{EventKind, Layout, LineEvents, RewriteEvent};
use super::{DepthStack, OpenBlock};
use crate::bython::error::{StructuralError, StructuralErrorKind};
use crate::bython::rewriting::{Fragment, RewrittenLine};

#[derive(Debug, Clone, Default)]
pub struct BraceTracker {
    stack: DepthStack,
}

impl BraceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn track(&mut self, line: &RewrittenLine) -> Result<LineEvents, StructuralError> {
        let mut events = Vec::with_capacity(line.fragments.len());
        for fragment in &line.fragments {
            match fragment {
                Fragment::Text { text, kind } => {
                    if line.verbatim || !text.trim().is_empty() {
                        self.stack.mark_body();
                    }
                    events.push(RewriteEvent::new(
                        line.number,
                        self.depth(),
                        text.as_str(),
                        (*kind).into(),
                    ));
                }
                Fragment::Comment(comment) => events.push(RewriteEvent::new(
                    line.number,
                    self.depth(),
                    comment.as_str(),
                    EventKind::Comment,
                )),
                Fragment::Open => {
                    self.stack.push(OpenBlock::braced(line.number));
                    events.push(RewriteEvent::marker(
                        line.number,
                        self.depth(),
                        EventKind::BlockOpen,
                    ));
                }
                Fragment::Close => {
                    let Some(block) = self.stack.pop() else {
                        return Err(StructuralError::new(
                            StructuralErrorKind::UnbalancedCloser,
                            line.number,
                            "closing brace has no matching opening brace",
                        ));
                    };
                    events.push(RewriteEvent::marker(
                        line.number,
                        self.depth(),
                        EventKind::BlockClose {
                            empty: !block.has_body,
                        },
                    ));
                }
            }
        }
        Ok(LineEvents {
            line: line.number,
            layout: Layout::of(line),
            events,
        })
    }

    /// Fails when blocks are still open at the end of the input.
    pub fn finish(&self, last_line: usize) -> Result<(), StructuralError> {
        match self.stack.top() {
            None => Ok(()),
            Some(block) => Err(StructuralError::new(
                StructuralErrorKind::UnterminatedBlock,
                last_line.max(1),
                format!(
                    "end of input with {} open block(s); innermost opened at line {}",
                    self.depth(),
                    block.line
                ),
            )),
        }
    }
}
