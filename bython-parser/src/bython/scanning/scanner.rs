//! Literal-aware line scanner

use super::line::{LineStart, Piece, ScannedLine};
use super::state::{Delimiter, ScanState};
use crate::bython::config::{BlockMarkers, Direction, TranslationConfig};
use crate::bython::error::{StructuralError, StructuralErrorKind};
use crate::bython::source::SourceBuffer;

/// Last significant characters that put a following `{` in expression position.
const EXPRESSION_LEADS: &str = "=([,+-*/%<>|&^~!@";

/// Keywords after which a `{` starts a dict or set literal.
const EXPRESSION_KEYWORDS: &[&str] = &[
    "return", "yield", "in", "and", "or", "not", "is", "await", "assert", "del", "print",
];

/// Starts a block statement, but also ends a conditional expression when code precedes it.
const ELSE: &str = "else";

/// Walks lines one at a time, carrying literal, comment and bracket state across them.
#[derive(Debug, Clone)]
pub struct LiteralScanner {
    direction: Direction,
    line_markers: Vec<String>,
    block: Option<BlockMarkers>,
    expression_braces: bool,
    state: ScanState,
    brackets: usize,
    expression_depth: usize,
    continued: bool,
}

impl LiteralScanner {
    pub fn new(config: &TranslationConfig, direction: Direction) -> Self {
        LiteralScanner {
            direction,
            line_markers: config.comment_markers.line_markers(direction),
            block: config.comment_markers.block_markers(direction).cloned(),
            expression_braces: config.expression_braces,
            state: ScanState::Code,
            brackets: 0,
            expression_depth: 0,
            continued: false,
        }
    }

    /// Scan a whole buffer.
    pub fn scan(
        config: &TranslationConfig,
        direction: Direction,
        buffer: &SourceBuffer,
    ) -> Result<Vec<ScannedLine>, StructuralError> {
        let mut scanner = Self::new(config, direction);
        let mut lines = Vec::with_capacity(buffer.len());
        for line in buffer.lines() {
            lines.push(scanner.scan_line(line.number, &line.text)?);
        }
        scanner.finish()?;
        Ok(lines)
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn scan_line(&mut self, number: usize, text: &str) -> Result<ScannedLine, StructuralError> {
        let start = match self.state {
            ScanState::StringLiteral { .. } => LineStart::InsideString,
            ScanState::BlockComment { .. } => LineStart::InsideComment,
            ScanState::Code | ScanState::LineComment => {
                if self.brackets > 0 || self.expression_depth > 0 || self.continued {
                    LineStart::Continuation
                } else {
                    LineStart::Fresh
                }
            }
        };
        if self.state == ScanState::LineComment {
            self.state = ScanState::Code;
        }
        self.continued = false;

        let body_start = match start {
            LineStart::Fresh | LineStart::Continuation => text.len() - text.trim_start().len(),
            LineStart::InsideString | LineStart::InsideComment => 0,
        };

        let mut pieces = Vec::new();
        // Code seen so far on this line, literals collapsed to a quote
        let mut line_code = String::new();
        let mut run_start = body_start;
        let mut literal_start = 0;
        let mut comment_start = 0;
        let mut comment_opens = false;
        let mut escaped_eol = false;
        let mut i = body_start;

        while i < text.len() {
            let rest = &text[i..];
            let Some(c) = rest.chars().next() else {
                break;
            };
            match self.state {
                ScanState::Code => {
                    if let Some(len) = self.block_open_at(rest) {
                        push_code(&mut pieces, &text[run_start..i]);
                        self.state = ScanState::BlockComment { opened_at: number };
                        comment_opens = true;
                        i += len;
                        comment_start = i;
                        continue;
                    }
                    if let Some(marker) = self.line_marker_at(rest) {
                        push_code(&mut pieces, &text[run_start..i]);
                        let body = text[i + marker.len()..].to_string();
                        pieces.push(Piece::LineComment { marker, body });
                        self.state = ScanState::LineComment;
                        i = text.len();
                        run_start = i;
                        break;
                    }
                    if let Some(delimiter) = Delimiter::at(rest) {
                        push_code(&mut pieces, &text[run_start..i]);
                        self.state = ScanState::StringLiteral {
                            delimiter,
                            multiline: delimiter.is_triple(),
                            opened_at: number,
                        };
                        literal_start = i;
                        i += delimiter.len();
                        continue;
                    }
                    match c {
                        '{' if self.direction == Direction::Forward => {
                            if self.is_expression_brace(&line_code) {
                                self.expression_depth += 1;
                            } else {
                                push_code(&mut pieces, &text[run_start..i]);
                                pieces.push(Piece::Open);
                                line_code.clear();
                                i += 1;
                                run_start = i;
                                continue;
                            }
                        }
                        '}' if self.direction == Direction::Forward => {
                            if self.expression_depth > 0 {
                                self.expression_depth -= 1;
                            } else {
                                push_code(&mut pieces, &text[run_start..i]);
                                pieces.push(Piece::Close);
                                line_code.clear();
                                i += 1;
                                run_start = i;
                                continue;
                            }
                        }
                        '(' | '[' | '{' => self.brackets += 1,
                        ')' | ']' | '}' => self.brackets = self.brackets.saturating_sub(1),
                        '\\' if i + 1 == text.len() => self.continued = true,
                        _ => {}
                    }
                    line_code.push(c);
                    i += c.len_utf8();
                }
                ScanState::StringLiteral { delimiter, .. } => {
                    if c == '\\' {
                        match rest[1..].chars().next() {
                            Some(escaped) => i += 1 + escaped.len_utf8(),
                            None => {
                                escaped_eol = true;
                                i += 1;
                            }
                        }
                        continue;
                    }
                    if rest.starts_with(delimiter.as_str()) {
                        i += delimiter.len();
                        pieces.push(Piece::Literal(text[literal_start..i].to_string()));
                        line_code.push('"');
                        self.state = ScanState::Code;
                        run_start = i;
                        continue;
                    }
                    i += c.len_utf8();
                }
                ScanState::BlockComment { .. } => {
                    if let Some(len) = self.block_close_at(rest) {
                        pieces.push(Piece::BlockComment {
                            opens: comment_opens,
                            closes: true,
                            body: text[comment_start..i].to_string(),
                        });
                        comment_opens = false;
                        i += len;
                        self.state = ScanState::Code;
                        run_start = i;
                        continue;
                    }
                    i += c.len_utf8();
                }
                ScanState::LineComment => break,
            }
        }

        match self.state {
            ScanState::Code => push_code(&mut pieces, &text[run_start..]),
            ScanState::LineComment => self.state = ScanState::Code,
            ScanState::StringLiteral {
                delimiter,
                opened_at,
                ..
            } => {
                pieces.push(Piece::Literal(text[literal_start..].to_string()));
                if !delimiter.is_triple() {
                    if !escaped_eol {
                        return Err(StructuralError::new(
                            StructuralErrorKind::UnterminatedLiteral,
                            opened_at,
                            format!(
                                "string literal opened with {} is not closed before the end of line {}",
                                delimiter.as_str(),
                                number
                            ),
                        ));
                    }
                    self.state = ScanState::StringLiteral {
                        delimiter,
                        multiline: true,
                        opened_at,
                    };
                }
            }
            ScanState::BlockComment { .. } => pieces.push(Piece::BlockComment {
                opens: comment_opens,
                closes: false,
                body: text[comment_start..].to_string(),
            }),
        }

        let indent = text[..body_start].to_string();
        Ok(ScannedLine {
            number,
            start,
            indent,
            pieces,
        })
    }

    /// Fails when the input ends inside a literal or a block comment.
    pub fn finish(&self) -> Result<(), StructuralError> {
        match self.state {
            ScanState::Code | ScanState::LineComment => Ok(()),
            ScanState::StringLiteral {
                delimiter,
                opened_at,
                ..
            } => Err(StructuralError::new(
                StructuralErrorKind::UnterminatedLiteral,
                opened_at,
                format!(
                    "string literal opened with {} is never closed",
                    delimiter.as_str()
                ),
            )),
            ScanState::BlockComment { opened_at } => Err(StructuralError::new(
                StructuralErrorKind::UnterminatedLiteral,
                opened_at,
                "block comment is never closed",
            )),
        }
    }

    fn block_open_at(&self, rest: &str) -> Option<usize> {
        self.block
            .as_ref()
            .filter(|b| rest.starts_with(b.open.as_str()))
            .map(|b| b.open.len())
    }

    fn block_close_at(&self, rest: &str) -> Option<usize> {
        self.block
            .as_ref()
            .filter(|b| rest.starts_with(b.close.as_str()))
            .map(|b| b.close.len())
    }

    fn line_marker_at(&self, rest: &str) -> Option<String> {
        self.line_markers
            .iter()
            .find(|m| rest.starts_with(m.as_str()))
            .cloned()
    }

    fn is_expression_brace(&self, line_code: &str) -> bool {
        if !self.expression_braces {
            return false;
        }
        if self.brackets > 0 || self.expression_depth > 0 {
            return true;
        }
        let code = line_code.trim_end();
        let Some(last) = code.chars().last() else {
            return false;
        };
        if EXPRESSION_LEADS.contains(last) {
            return true;
        }
        if last == ':' {
            return has_top_level_lambda(code);
        }
        let word = code
            .rsplit(|c: char| !is_word_char(c))
            .next()
            .unwrap_or_default();
        if word == ELSE {
            // `x = a if c else {}`, not `} else {`
            return code.trim_start() != ELSE;
        }
        EXPRESSION_KEYWORDS.contains(&word)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A `lambda` outside any bracket owns the trailing `:` of `code`.
fn has_top_level_lambda(code: &str) -> bool {
    let mut depth = 0usize;
    let mut word = String::new();
    for c in code.chars().chain(std::iter::once(' ')) {
        if is_word_char(c) {
            word.push(c);
            continue;
        }
        if depth == 0 && word == "lambda" {
            return true;
        }
        word.clear();
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

fn push_code(pieces: &mut Vec<Piece>, code: &str) {
    if !code.is_empty() {
        pieces.push(Piece::Code(code.to_string()));
    }
}
