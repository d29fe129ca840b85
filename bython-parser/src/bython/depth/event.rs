//! Rewrite events

use crate::bython::rewriting::{ContentKind, RewrittenLine};
use crate::bython::scanning::LineStart;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    Declaration,
    Comment,
    Import,
    Plain,
    BlockOpen,
    /// `empty` is set when the block closed without any statement in it
    BlockClose { empty: bool },
}

impl EventKind {
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            EventKind::Declaration | EventKind::Import | EventKind::Plain
        )
    }
}

impl From<ContentKind> for EventKind {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Plain => EventKind::Plain,
            ContentKind::Declaration => EventKind::Declaration,
            ContentKind::Import => EventKind::Import,
        }
    }
}

/// A unit of translated content at an absolute depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewriteEvent {
    pub line: usize,
    pub depth: usize,
    pub payload: String,
    pub kind: EventKind,
}

impl RewriteEvent {
    pub fn new(line: usize, depth: usize, payload: impl Into<String>, kind: EventKind) -> Self {
        RewriteEvent {
            line,
            depth,
            payload: payload.into(),
            kind,
        }
    }

    pub fn marker(line: usize, depth: usize, kind: EventKind) -> Self {
        Self::new(line, depth, String::new(), kind)
    }
}

/// How an input line's content is laid out in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Indented to the event depth
    Statement,
    /// One level deeper than the statement it continues
    Continuation,
    /// First event is copied unchanged
    Verbatim,
    Blank,
}

impl Layout {
    pub fn of(line: &RewrittenLine) -> Layout {
        if line.verbatim {
            Layout::Verbatim
        } else if line.is_blank() {
            Layout::Blank
        } else if line.start == LineStart::Continuation {
            Layout::Continuation
        } else {
            Layout::Statement
        }
    }
}

/// Events of one input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineEvents {
    pub line: usize,
    pub layout: Layout,
    pub events: Vec<RewriteEvent>,
}
