//! Pipeline stages
//!
//! Each stage owns a shared handle to the configuration and the direction it runs in, so a
//! built pipeline can be reused for any number of inputs.

use super::Runnable;
use crate::bython::config::{Direction, TranslationConfig};
use crate::bython::depth::{BraceTracker, IndentTracker, LineEvents};
use crate::bython::emitting::{BraceEmitter, IndentEmitter};
use crate::bython::error::{StructuralError, TranslationError};
use crate::bython::rewriting::{RewriteReport, RewrittenLine, Rewriter};
use crate::bython::scanning::{LiteralScanner, ScannedLine};
use crate::bython::source::SourceBuffer;
use crate::bython::translate::Translation;
use std::sync::Arc;
use tracing::{debug, trace};

const ANY_IMPORT: &str = "from typing import Any";
const TRUE_FALSE_ALIASES: &str = "true, false = True, False";

/// Output of [`Scanning`]
#[derive(Debug, Clone)]
pub struct Scanned {
    pub lines: Vec<ScannedLine>,
    pub last_line: usize,
}

/// Output of [`Rewriting`]
#[derive(Debug, Clone)]
pub struct Rewritten {
    pub lines: Vec<RewrittenLine>,
    pub last_line: usize,
    pub report: RewriteReport,
}

/// Output of [`DepthTracking`]
#[derive(Debug, Clone)]
pub struct Tracked {
    pub groups: Vec<LineEvents>,
    pub report: RewriteReport,
}

/// Splits every line into code, literal, comment and block-marker pieces.
pub struct Scanning {
    config: Arc<TranslationConfig>,
    direction: Direction,
}

impl Scanning {
    pub fn new(config: Arc<TranslationConfig>, direction: Direction) -> Self {
        Scanning { config, direction }
    }
}

impl Runnable<SourceBuffer, Scanned> for Scanning {
    fn run(&self, input: SourceBuffer) -> Result<Scanned, TranslationError> {
        let lines = LiteralScanner::scan(&self.config, self.direction, &input)?;
        debug!(direction = self.direction.name(), lines = lines.len(), "scanned source");
        Ok(Scanned {
            lines,
            last_line: input.last_line(),
        })
    }
}

/// Rewrites comments, declarations, operators and imports.
pub struct Rewriting {
    config: Arc<TranslationConfig>,
    direction: Direction,
}

impl Rewriting {
    pub fn new(config: Arc<TranslationConfig>, direction: Direction) -> Self {
        Rewriting { config, direction }
    }
}

impl Runnable<Scanned, Rewritten> for Rewriting {
    fn run(&self, input: Scanned) -> Result<Rewritten, TranslationError> {
        let (lines, report) = Rewriter::rewrite(&self.config, self.direction, &input.lines);
        debug!(
            dependencies = report.imports.dependencies.len(),
            warnings = report.imports.warnings.len(),
            "rewrote statements"
        );
        Ok(Rewritten {
            lines,
            last_line: input.last_line,
            report,
        })
    }
}

/// Assigns an absolute depth to every event. Structural errors carry the output rendered from
/// the lines tracked before the failure.
pub struct DepthTracking {
    config: Arc<TranslationConfig>,
    direction: Direction,
}

impl DepthTracking {
    pub fn new(config: Arc<TranslationConfig>, direction: Direction) -> Self {
        DepthTracking { config, direction }
    }

    fn track_forward(&self, input: &Rewritten) -> Result<Vec<LineEvents>, StructuralError> {
        let mut tracker = BraceTracker::new();
        let mut groups = Vec::with_capacity(input.lines.len());
        for line in &input.lines {
            match tracker.track(line) {
                Ok(group) => groups.push(group),
                Err(err) => return Err(self.with_partial_output(err, &groups)),
            }
        }
        if let Err(err) = tracker.finish(input.last_line) {
            return Err(self.with_partial_output(err, &groups));
        }
        Ok(groups)
    }

    fn track_reverse(&self, input: &Rewritten) -> Result<Vec<LineEvents>, StructuralError> {
        let mut tracker = IndentTracker::new(self.config.tab_width);
        let mut groups = Vec::with_capacity(input.lines.len() + 1);
        for line in &input.lines {
            match tracker.track(line) {
                Ok(group) => groups.push(group),
                Err(err) => return Err(self.with_partial_output(err, &groups)),
            }
        }
        groups.push(tracker.finish(input.last_line));
        Ok(groups)
    }

    fn with_partial_output(&self, err: StructuralError, groups: &[LineEvents]) -> StructuralError {
        let partial = render(&self.config, self.direction, groups);
        err.with_partial_output(partial)
    }
}

impl Runnable<Rewritten, Tracked> for DepthTracking {
    fn run(&self, input: Rewritten) -> Result<Tracked, TranslationError> {
        let groups = match self.direction {
            Direction::Forward => self.track_forward(&input)?,
            Direction::Reverse => self.track_reverse(&input)?,
        };
        trace!(groups = groups.len(), "tracked depth");
        Ok(Tracked {
            groups,
            report: input.report,
        })
    }
}

/// Renders the output text and gathers warnings and dependencies.
pub struct Emitting {
    config: Arc<TranslationConfig>,
    direction: Direction,
}

impl Emitting {
    pub fn new(config: Arc<TranslationConfig>, direction: Direction) -> Self {
        Emitting { config, direction }
    }

    fn prelude(&self, report: &RewriteReport) -> String {
        let mut prelude = String::new();
        if self.direction != Direction::Forward {
            return prelude;
        }
        if self.config.type_hints && report.uses_any {
            prelude.push_str(ANY_IMPORT);
            prelude.push('\n');
        }
        if self.config.true_false_aliases {
            prelude.push_str(TRUE_FALSE_ALIASES);
            prelude.push('\n');
        }
        prelude
    }
}

impl Runnable<Tracked, Translation> for Emitting {
    fn run(&self, input: Tracked) -> Result<Translation, TranslationError> {
        let Tracked { groups, report } = input;
        let mut warnings = report.imports.warnings.clone();
        warnings.extend(report.warnings.iter().cloned());
        let body = match self.direction {
            Direction::Forward => {
                let mut emitter = IndentEmitter::new(&self.config.indent_unit);
                for group in &groups {
                    emitter.emit(group);
                }
                let (text, emitted) = emitter.finish();
                warnings.extend(emitted);
                text
            }
            Direction::Reverse => render(&self.config, self.direction, &groups),
        };
        warnings.sort_by_key(|w| w.line);

        let prelude = self.prelude(&report);
        let split = if prelude.is_empty() { 0 } else { header_len(&body) };
        let mut output = String::with_capacity(prelude.len() + body.len());
        output.push_str(&body[..split]);
        output.push_str(&prelude);
        output.push_str(&body[split..]);
        debug!(bytes = output.len(), warnings = warnings.len(), "emitted output");
        Ok(Translation {
            output,
            warnings,
            dependencies: report.imports.dependencies,
        })
    }
}

/// Length of the lines that must stay ahead of any inserted import: an interpreter line, an
/// encoding declaration, the module docstring and `from __future__` imports.
fn header_len(text: &str) -> usize {
    let mut end = 0;
    let mut offset = 0;
    let mut statements = 0;
    // Closing delimiter of a docstring or import list that spans lines
    let mut open: Option<&str> = None;
    for (index, line) in text.split_inclusive('\n').enumerate() {
        offset += line.len();
        let trimmed = line.trim();
        if let Some(close) = open {
            if trimmed.contains(close) {
                open = None;
                end = offset;
            }
            continue;
        }
        if index == 0 && trimmed.starts_with("#!") {
            end = offset;
            continue;
        }
        if index < 2 && trimmed.starts_with('#') && trimmed.contains("coding") {
            end = offset;
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        statements += 1;
        if statements == 1 {
            if let Some((quote, rest)) = docstring_open(trimmed) {
                if quote.len() == 3 && !rest.contains(quote) {
                    open = Some(quote);
                } else {
                    end = offset;
                }
                continue;
            }
        }
        if trimmed.starts_with("from __future__ import") {
            if trimmed.contains('(') && !trimmed.contains(')') {
                open = Some(")");
            } else {
                end = offset;
            }
            continue;
        }
        break;
    }
    end
}

/// Opening quote of a string statement and the text after it, ignoring `r` and `u` prefixes.
fn docstring_open(line: &str) -> Option<(&'static str, &str)> {
    let line = line.trim_start_matches(['r', 'R', 'u', 'U']);
    ["\"\"\"", "'''", "\"", "'"]
        .into_iter()
        .find_map(|quote| line.strip_prefix(quote).map(|rest| (quote, rest)))
}

/// Render event groups with the emitter for `direction`.
fn render(config: &TranslationConfig, direction: Direction, groups: &[LineEvents]) -> String {
    match direction {
        Direction::Forward => {
            let mut emitter = IndentEmitter::new(&config.indent_unit);
            for group in groups {
                emitter.emit(group);
            }
            emitter.render()
        }
        Direction::Reverse => {
            let mut emitter = BraceEmitter::new(&config.indent_unit);
            for group in groups {
                emitter.emit(group);
            }
            emitter.finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bython::error::StructuralErrorKind;
    use rstest::rstest;

    fn config() -> Arc<TranslationConfig> {
        Arc::new(TranslationConfig::default())
    }

    fn rewritten(source: &str, direction: Direction) -> Rewritten {
        let scanned = Scanning::new(config(), direction)
            .run(SourceBuffer::new(source))
            .unwrap();
        Rewriting::new(config(), direction).run(scanned).unwrap()
    }

    #[test]
    fn test_scanning_records_last_line() {
        let scanned = Scanning::new(config(), Direction::Forward)
            .run(SourceBuffer::new("a\nb\n"))
            .unwrap();
        assert_eq!(scanned.last_line, 2);
        assert_eq!(scanned.lines.len(), 2);
    }

    #[test]
    fn test_depth_tracking_attaches_partial_output() {
        let input = rewritten("if x {\n    y()\n}\n}\n", Direction::Forward);
        let err = DepthTracking::new(config(), Direction::Forward)
            .run(input)
            .unwrap_err();
        let err = err.as_structural().unwrap();
        assert_eq!(err.kind, StructuralErrorKind::UnbalancedCloser);
        assert_eq!(err.line, 4);
        assert_eq!(err.partial_output.as_deref(), Some("if x:\n    y()\n"));
    }

    #[test]
    fn test_reverse_tracking_closes_blocks_at_end() {
        let input = rewritten("if x:\n    y()\n", Direction::Reverse);
        let tracked = DepthTracking::new(config(), Direction::Reverse)
            .run(input)
            .unwrap();
        assert_eq!(tracked.groups.len(), 3);
        assert_eq!(tracked.groups[2].events.len(), 1);
    }

    #[rstest]
    #[case("x = 1\n", 0)]
    #[case("#!/usr/bin/env python3\nx = 1\n", 23)]
    #[case("# -*- coding: utf-8 -*-\nx = 1\n", 24)]
    #[case("\"\"\"Docs.\"\"\"\nx = 1\n", 12)]
    #[case("'''\nDocs.\n'''\nx = 1\n", 14)]
    #[case("from __future__ import annotations\nx = 1\n", 35)]
    #[case("\"\"\"Docs.\"\"\"\n\nfrom __future__ import (\n    annotations,\n)\nx = 1\n", 57)]
    #[case("x = 1\n\"\"\"not a docstring\"\"\"\n", 0)]
    fn test_header_len(#[case] text: &str, #[case] expected: usize) {
        assert_eq!(header_len(text), expected);
    }

    #[test]
    fn test_emitting_prepends_aliases() {
        let config = Arc::new(TranslationConfig {
            true_false_aliases: true,
            ..TranslationConfig::default()
        });
        let tracked = Tracked {
            groups: Vec::new(),
            report: RewriteReport::default(),
        };
        let translation = Emitting::new(config, Direction::Forward)
            .run(tracked)
            .unwrap();
        assert_eq!(translation.output, "true, false = True, False\n");
    }
}
