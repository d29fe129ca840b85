//! Bython emitter

use super::line::OutputLine;
use crate::bython::depth::{EventKind, Layout, LineEvents};

pub struct BraceEmitter<'a> {
    indent_unit: &'a str,
    lines: Vec<OutputLine>,
    /// Index of the last line holding code
    last_code: Option<usize>,
    /// Where the next closer goes when closers are already stacked after `last_code`
    close_at: Option<usize>,
}

impl<'a> BraceEmitter<'a> {
    pub fn new(indent_unit: &'a str) -> Self {
        BraceEmitter {
            indent_unit,
            lines: Vec::new(),
            last_code: None,
            close_at: None,
        }
    }

    pub fn emit(&mut self, group: &LineEvents) {
        if group.layout == Layout::Blank {
            self.lines.push(OutputLine::blank());
            return;
        }
        let mut current: Option<OutputLine> = None;
        for (idx, event) in group.events.iter().enumerate() {
            let first = idx == 0;
            match event.kind {
                EventKind::Plain | EventKind::Declaration | EventKind::Import => {
                    if let Some(line) = current.as_mut() {
                        line.push_code(&event.payload);
                        continue;
                    }
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
                    if let Some(idx) = self.last_code {
                        self.lines[idx].terminate(" {");
                    }
                }
                EventKind::BlockClose { .. } => {
                    let at = self
                        .close_at
                        .or(self.last_code.map(|idx| idx + 1))
                        .unwrap_or(self.lines.len());
                    let closer = OutputLine::code(self.indent(event.depth), "}");
                    self.lines.insert(at, closer);
                    self.close_at = Some(at + 1);
                }
            }
        }
        if let Some(line) = current {
            if line.has_code() {
                self.last_code = Some(self.lines.len());
                self.close_at = None;
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

    pub fn finish(self) -> String {
        super::join_lines(&self.lines)
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

    const CLOSE: EventKind = EventKind::BlockClose { empty: false };

    #[test]
    fn test_opener_and_closer_placement() {
        let mut emitter = BraceEmitter::new("    ");
        emitter.emit(&group(1, Layout::Statement, vec![(EventKind::Plain, 0, "if x > 0:")]));
        emitter.emit(&group(
            2,
            Layout::Statement,
            vec![(EventKind::BlockOpen, 1, ""), (EventKind::Plain, 1, "print(x)")],
        ));
        emitter.emit(&group(3, Layout::Statement, vec![(CLOSE, 0, "")]));
        assert_eq!(emitter.finish(), "if x > 0: {\n    print(x)\n}\n");
    }

    #[test]
    fn test_closers_precede_trailing_blank_and_comment_lines() {
        let mut emitter = BraceEmitter::new("  ");
        emitter.emit(&group(1, Layout::Statement, vec![(EventKind::Plain, 0, "def f():")]));
        emitter.emit(&group(
            2,
            Layout::Statement,
            vec![(EventKind::BlockOpen, 1, ""), (EventKind::Plain, 1, "if y:")],
        ));
        emitter.emit(&group(
            3,
            Layout::Statement,
            vec![(EventKind::BlockOpen, 2, ""), (EventKind::Plain, 2, "g()")],
        ));
        emitter.emit(&group(4, Layout::Blank, vec![]));
        emitter.emit(&group(5, Layout::Statement, vec![(EventKind::Comment, 0, "// next")]));
        emitter.emit(&group(
            6,
            Layout::Statement,
            vec![(CLOSE, 1, ""), (CLOSE, 0, ""), (EventKind::Plain, 0, "h()")],
        ));
        assert_eq!(
            emitter.finish(),
            "def f(): {\n  if y: {\n    g()\n  }\n}\n\n// next\nh()\n"
        );
    }

    #[test]
    fn test_opener_goes_before_trailing_comment() {
        let mut emitter = BraceEmitter::new("    ");
        emitter.emit(&group(
            1,
            Layout::Statement,
            vec![(EventKind::Plain, 0, "else:  "), (EventKind::Comment, 0, "// fallback")],
        ));
        emitter.emit(&group(
            2,
            Layout::Statement,
            vec![(EventKind::BlockOpen, 1, ""), (EventKind::Plain, 1, "pass")],
        ));
        assert_eq!(emitter.render(), "else: {  // fallback\n    pass\n");
    }
}
