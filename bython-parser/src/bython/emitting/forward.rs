//! Python emitter

use super::line::OutputLine;
use crate::bython::depth::{EventKind, Layout, LineEvents};
use crate::bython::error::{Warning, WarningKind};

pub struct IndentEmitter<'a> {
    indent_unit: &'a str,
    lines: Vec<OutputLine>,
    /// Index of the last line holding code
    last_code: Option<usize>,
    warnings: Vec<Warning>,
}

impl<'a> IndentEmitter<'a> {
    pub fn new(indent_unit: &'a str) -> Self {
        IndentEmitter {
            indent_unit,
            lines: Vec::new(),
            last_code: None,
            warnings: Vec::new(),
        }
    }

    pub fn emit(&mut self, group: &LineEvents) {
        if group.layout == Layout::Blank {
            self.lines.push(OutputLine::blank());
            return;
        }
        let mut current: Option<OutputLine> = None;
        // Set once a header has taken its colon; further code starts a new line
        let mut sealed = false;

        for (idx, event) in group.events.iter().enumerate() {
            let first = idx == 0;
            match event.kind {
                EventKind::Plain | EventKind::Declaration | EventKind::Import => {
                    if let Some(line) = current.as_mut().filter(|_| !sealed) {
                        line.push_code(&event.payload);
                        continue;
                    }
                    let verbatim = first && group.layout == Layout::Verbatim;
                    if event.payload.trim().is_empty() && !verbatim {
                        continue;
                    }
                    self.flush(current.take());
                    sealed = false;
                    current = Some(match group.layout {
                        Layout::Verbatim if first => OutputLine::verbatim(&event.payload),
                        Layout::Continuation if first => {
                            let depth = super::continuation_depth(event.depth, &event.payload);
                            OutputLine::code(self.indent(depth), &event.payload)
                        }
                        _ => OutputLine::code(self.indent(event.depth), &event.payload),
                    });
                }
                EventKind::Comment => match current.as_mut() {
                    Some(line) => line.push_comment(&event.payload),
                    None => {
                        current = Some(OutputLine::comment(self.indent(event.depth), &event.payload))
                    }
                },
                EventKind::BlockOpen => {
                    match current.as_mut().filter(|l| l.has_code() && !sealed) {
                        Some(header) => header.terminate(":"),
                        None => self.attach_to_previous(event.line),
                    }
                    sealed = true;
                }
                EventKind::BlockClose { empty } => {
                    self.flush(current.take());
                    sealed = false;
                    if empty {
                        let pass = OutputLine::code(self.indent(event.depth + 1), "pass");
                        self.flush(Some(pass));
                    }
                }
            }
        }
        self.flush(current);
    }

    /// A `{` on a line of its own belongs to the statement above it.
    fn attach_to_previous(&mut self, line: usize) {
        match self.last_code {
            Some(idx) => self.lines[idx].terminate(":"),
            None => self.warnings.push(Warning::new(
                WarningKind::DetachedBlock,
                line,
                "block opener has no statement to attach to",
            )),
        }
    }

    fn flush(&mut self, line: Option<OutputLine>) {
        if let Some(line) = line {
            if line.has_code() {
                self.last_code = Some(self.lines.len());
            }
            self.lines.push(line);
        }
    }

    fn indent(&self, depth: usize) -> String {
        self.indent_unit.repeat(depth)
    }

    /// Output so far.
    pub fn render(&self) -> String {
        super::join_lines(&self.lines)
    }

    pub fn finish(self) -> (String, Vec<Warning>) {
        (super::join_lines(&self.lines), self.warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bython::depth::RewriteEvent;

    fn group(line: usize, layout: Layout, events: Vec<(EventKind, usize, &str)>) -> LineEvents {
        LineEvents {
            line,
            layout,
            events: events
                .into_iter()
                .map(|(kind, depth, payload)| RewriteEvent::new(line, depth, payload, kind))
                .collect(),
        }
    }

    fn emit(groups: &[LineEvents]) -> (String, Vec<Warning>) {
        let mut emitter = IndentEmitter::new("    ");
        for g in groups {
            emitter.emit(g);
        }
        emitter.finish()
    }

    #[test]
    fn test_header_gets_colon() {
        let (out, _) = emit(&[
            group(
                1,
                Layout::Statement,
                vec![(EventKind::Plain, 0, "if x "), (EventKind::BlockOpen, 1, "")],
            ),
            group(2, Layout::Statement, vec![(EventKind::Plain, 1, "y()")]),
            group(
                3,
                Layout::Statement,
                vec![(EventKind::BlockClose { empty: false }, 0, "")],
            ),
        ]);
        assert_eq!(out, "if x:\n    y()\n");
    }

    #[test]
    fn test_empty_block_gets_pass() {
        let (out, _) = emit(&[group(
            1,
            Layout::Statement,
            vec![
                (EventKind::Declaration, 0, "def f() "),
                (EventKind::BlockOpen, 1, ""),
                (EventKind::BlockClose { empty: true }, 0, ""),
            ],
        )]);
        assert_eq!(out, "def f():\n    pass\n");
    }

    #[test]
    fn test_comment_after_opener_stays_on_header() {
        let (out, _) = emit(&[group(
            1,
            Layout::Statement,
            vec![
                (EventKind::Plain, 0, "while True "),
                (EventKind::BlockOpen, 1, ""),
                (EventKind::Plain, 1, "  "),
                (EventKind::Comment, 1, "# forever"),
            ],
        )]);
        assert_eq!(out, "while True:  # forever\n");
    }

    #[test]
    fn test_content_after_opener_moves_down() {
        let (out, _) = emit(&[group(
            1,
            Layout::Statement,
            vec![
                (EventKind::Plain, 0, "if x "),
                (EventKind::BlockOpen, 1, ""),
                (EventKind::Plain, 1, " y() "),
                (EventKind::BlockClose { empty: false }, 0, ""),
            ],
        )]);
        assert_eq!(out, "if x:\n    y()\n");
    }

    #[test]
    fn test_allman_opener_attaches_to_previous_line() {
        let (out, warnings) = emit(&[
            group(1, Layout::Statement, vec![(EventKind::Plain, 0, "else")]),
            group(2, Layout::Statement, vec![(EventKind::BlockOpen, 1, "")]),
            group(3, Layout::Statement, vec![(EventKind::Plain, 1, "z()")]),
        ]);
        assert_eq!(out, "else:\n    z()\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_detached_opener_warns() {
        let (_, warnings) = emit(&[group(
            1,
            Layout::Statement,
            vec![(EventKind::BlockOpen, 1, "")],
        )]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::DetachedBlock);
    }

    #[test]
    fn test_continuation_and_verbatim_lines() {
        let (out, _) = emit(&[
            group(1, Layout::Statement, vec![(EventKind::Plain, 1, "x = f(a,")]),
            group(2, Layout::Continuation, vec![(EventKind::Plain, 1, "b)")]),
            group(3, Layout::Statement, vec![(EventKind::Plain, 1, "s = '''")]),
            group(4, Layout::Verbatim, vec![(EventKind::Plain, 1, "  raw  ")]),
            group(5, Layout::Blank, vec![]),
        ]);
        assert_eq!(
            out,
            "    x = f(a,\n        b)\n    s = '''\n  raw  \n\n"
        );
    }
}
