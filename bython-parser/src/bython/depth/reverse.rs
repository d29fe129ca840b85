//! Indentation depth tracking for the reverse direction
//!
//!     Only fresh code lines move the depth. Blank lines, comment-only lines, continuation
//!     lines and lines inside multi-line strings keep the depth of the statement around them.
//!     Comment-only lines are placed at the depth of the deepest open block their indentation
//!     reaches, so a comment written after a block sits outside it.
//!
//!     Without a tab width, a file must indent with either tabs or spaces, and no line may mix
//!     both. With a tab width, tabs advance to the next multiple of it.

use super::event::{EventKind, Layout, LineEvents, RewriteEvent};
use super::{DepthStack, OpenBlock};
use crate::bython::error::{StructuralError, StructuralErrorKind};
use crate::bython::rewriting::{Fragment, RewrittenLine};
use crate::bython::scanning::LineStart;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndentStyle {
    Spaces,
    Tabs,
}

impl IndentStyle {
    fn name(self) -> &'static str {
        match self {
            IndentStyle::Spaces => "spaces",
            IndentStyle::Tabs => "tabs",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndentTracker {
    stack: DepthStack,
    tab_width: Option<usize>,
    style: Option<IndentStyle>,
    seen_code: bool,
}

impl IndentTracker {
    pub fn new(tab_width: Option<usize>) -> Self {
        IndentTracker {
            tab_width,
            ..Self::default()
        }
    }

    pub fn depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn track(&mut self, line: &RewrittenLine) -> Result<LineEvents, StructuralError> {
        let layout = Layout::of(line);
        let mut events = Vec::new();
        let mut depth = self.depth();
        if layout == Layout::Statement && line.start == LineStart::Fresh {
            if line.has_code() {
                let width = self.measure(&line.indent, line.number)?;
                self.align(width, line.number, &mut events)?;
                self.seen_code = true;
                depth = self.depth();
            } else {
                depth = self.comment_depth(&line.indent);
            }
        }

        for fragment in &line.fragments {
            match fragment {
                Fragment::Text { text, kind } => events.push(RewriteEvent::new(
                    line.number,
                    depth,
                    text.as_str(),
                    (*kind).into(),
                )),
                Fragment::Comment(comment) => events.push(RewriteEvent::new(
                    line.number,
                    depth,
                    comment.as_str(),
                    EventKind::Comment,
                )),
                // Indentation-delimited input has no block markers
                Fragment::Open | Fragment::Close => {}
            }
        }
        Ok(LineEvents {
            line: line.number,
            layout,
            events,
        })
    }

    /// Close every block still open at the end of the input.
    pub fn finish(&mut self, last_line: usize) -> LineEvents {
        let mut events = Vec::new();
        while self.stack.pop().is_some() {
            events.push(RewriteEvent::marker(
                last_line,
                self.depth(),
                EventKind::BlockClose { empty: false },
            ));
        }
        LineEvents {
            line: last_line,
            layout: Layout::Statement,
            events,
        }
    }

    fn align(
        &mut self,
        width: usize,
        line: usize,
        events: &mut Vec<RewriteEvent>,
    ) -> Result<(), StructuralError> {
        let current = self.stack.top_width();
        if width > current {
            if !self.seen_code {
                return Err(StructuralError::new(
                    StructuralErrorKind::InconsistentIndentation,
                    line,
                    "unexpected indentation before the first statement",
                ));
            }
            self.stack.push(OpenBlock::indented(line, width));
            events.push(RewriteEvent::marker(line, self.depth(), EventKind::BlockOpen));
        } else if width < current {
            while self.stack.top_width() > width {
                self.stack.pop();
                events.push(RewriteEvent::marker(
                    line,
                    self.depth(),
                    EventKind::BlockClose { empty: false },
                ));
            }
            if self.stack.top_width() != width {
                return Err(StructuralError::new(
                    StructuralErrorKind::InconsistentIndentation,
                    line,
                    format!(
                        "dedent to column {width} does not match any enclosing block (expected {})",
                        self.stack.top_width()
                    ),
                ));
            }
        }
        Ok(())
    }

    fn measure(&mut self, indent: &str, line: usize) -> Result<usize, StructuralError> {
        if let Some(tab) = self.tab_width {
            return Ok(expand(indent, tab));
        }
        let has_tabs = indent.contains('\t');
        let has_spaces = indent.contains(' ');
        if has_tabs && has_spaces {
            return Err(StructuralError::new(
                StructuralErrorKind::InconsistentIndentation,
                line,
                "indentation mixes tabs and spaces",
            ));
        }
        let style = match (has_tabs, has_spaces) {
            (true, _) => Some(IndentStyle::Tabs),
            (_, true) => Some(IndentStyle::Spaces),
            _ => None,
        };
        if let Some(style) = style {
            match self.style {
                Some(previous) if previous != style => {
                    return Err(StructuralError::new(
                        StructuralErrorKind::InconsistentIndentation,
                        line,
                        format!(
                            "indented with {} but earlier lines use {}",
                            style.name(),
                            previous.name()
                        ),
                    ));
                }
                _ => self.style = Some(style),
            }
        }
        Ok(indent.chars().count())
    }

    fn comment_depth(&self, indent: &str) -> usize {
        let width = expand(indent, self.tab_width.unwrap_or(1));
        self.stack
            .iter()
            .take_while(|b| b.width.unwrap_or(0) <= width)
            .count()
    }
}

/// Width of `indent` with tab stops every `tab` columns.
fn expand(indent: &str, tab: usize) -> usize {
    indent.chars().fold(0, |width, c| {
        if c == '\t' {
            (width / tab + 1) * tab
        } else {
            width + 1
        }
    })
}
