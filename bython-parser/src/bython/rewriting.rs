//! Rewriting
//!
//!     The rewriter turns scanned pieces into [`Fragment`]s of the output dialect. It works one
//!     statement run at a time, a run being a maximal sequence of code and literal pieces.
//!     Runs that start a statement go through the import rewriter and, going forward, the
//!     operator and declaration rewriters. The first run of a continuation line belongs to the
//!     statement above it and only gets operator rewrites.
//!
//!     Comments are rewritten here as well. A comment that sits between two runs is moved to
//!     the end of the statement, since a Python comment always runs to the end of the line.
//!
//!     Nothing in this stage knows about depth. Block markers pass through as
//!     [`Fragment::Open`] and [`Fragment::Close`].

pub mod comments;
pub mod declarations;
pub mod imports;
pub mod operators;

pub use imports::{Dependency, ImportReport};

use crate::bython::config::{BlockCommentStyle, Direction, TranslationConfig};
use crate::bython::error::{Warning, WarningKind};
use crate::bython::scanning::{LineStart, Piece, ScannedLine};
use crate::bython::token::{atomize, render, Atom, CodeToken};
use comments::BlockRendering;
use declarations::DeclarationRewriter;
use imports::ImportRewriter;
use operators::{rewrite_operators, strip_trailing_semicolons};

/// What a piece of text was rewritten from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Plain,
    Declaration,
    Import,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Text { text: String, kind: ContentKind },
    Open,
    Close,
    /// Full comment including its marker
    Comment(String),
}

impl Fragment {
    pub fn plain(text: impl Into<String>) -> Self {
        Fragment::Text {
            text: text.into(),
            kind: ContentKind::Plain,
        }
    }

    pub fn is_blank_text(&self) -> bool {
        matches!(self, Fragment::Text { text, .. } if text.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenLine {
    pub number: usize,
    pub start: LineStart,
    pub indent: String,
    /// The first fragment continues a literal or docstring and must be emitted as is
    pub verbatim: bool,
    pub fragments: Vec<Fragment>,
}

impl RewrittenLine {
    pub fn is_blank(&self) -> bool {
        !self.verbatim && self.fragments.iter().all(Fragment::is_blank_text)
    }

    /// Holds code, as opposed to only comments and block markers.
    pub fn has_code(&self) -> bool {
        self.verbatim
            || self
                .fragments
                .iter()
                .any(|f| matches!(f, Fragment::Text { .. }) && !f.is_blank_text())
    }
}

/// Everything the rewriter learned about the file as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteReport {
    pub imports: ImportReport,
    /// A declaration used the `Any` annotation
    pub uses_any: bool,
    pub warnings: Vec<Warning>,
}

pub struct Rewriter<'a> {
    config: &'a TranslationConfig,
    direction: Direction,
    imports: ImportRewriter<'a>,
    declarations: DeclarationRewriter<'a>,
    /// Brace-dialect comment markers that must not appear in translated Python code
    foreign_markers: Vec<String>,
    /// Style of a block comment that continues on the next line
    open_comment: Option<BlockCommentStyle>,
    report: RewriteReport,
}

impl<'a> Rewriter<'a> {
    pub fn new(config: &'a TranslationConfig, direction: Direction) -> Self {
        Rewriter {
            config,
            direction,
            imports: ImportRewriter::new(config, direction),
            declarations: DeclarationRewriter::new(config),
            foreign_markers: foreign_markers(config, direction),
            open_comment: None,
            report: RewriteReport::default(),
        }
    }

    pub fn rewrite(
        config: &TranslationConfig,
        direction: Direction,
        lines: &[ScannedLine],
    ) -> (Vec<RewrittenLine>, RewriteReport) {
        let mut rewriter = Rewriter::new(config, direction);
        let rewritten = lines.iter().map(|l| rewriter.rewrite_line(l)).collect();
        (rewritten, rewriter.into_report())
    }

    pub fn into_report(self) -> RewriteReport {
        self.report
    }

    pub fn rewrite_line(&mut self, line: &ScannedLine) -> RewrittenLine {
        let verbatim = match line.start {
            LineStart::InsideString => true,
            LineStart::InsideComment => self.open_comment == Some(BlockCommentStyle::Docstring),
            LineStart::Fresh | LineStart::Continuation => false,
        };
        let mut out = FragmentBuilder::default();
        let pieces = &line.pieces;
        let mut i = 0;
        while i < pieces.len() {
            match &pieces[i] {
                Piece::Code(_) | Piece::Literal(_) => {
                    let end = pieces[i..]
                        .iter()
                        .position(|p| !p.is_run())
                        .map_or(pieces.len(), |n| i + n);
                    let next = pieces[end..].iter().find(|p| {
                        !p.is_blank()
                            && !matches!(p, Piece::LineComment { .. } | Piece::BlockComment { .. })
                    });
                    let run = RunContext {
                        line: line.number,
                        continued: i == 0 && line.start != LineStart::Fresh,
                        opens_block: matches!(pieces.get(end), Some(Piece::Open)),
                        ends_statement: next.map_or(true, |p| !p.is_run()),
                    };
                    self.rewrite_run(&pieces[i..end], run, &mut out);
                    i = end;
                    continue;
                }
                Piece::Open => out.structural(Fragment::Open),
                Piece::Close => out.structural(Fragment::Close),
                Piece::LineComment { marker, body }
                    if comments::is_shebang(self.direction, line.number, marker, body) =>
                {
                    out.comment(format!("{marker}{}", body.trim_end()))
                }
                Piece::LineComment { marker, body } => out.comment(comments::line_comment(
                    &self.config.comment_markers,
                    self.direction,
                    marker,
                    body,
                )),
                Piece::BlockComment {
                    opens,
                    closes,
                    body,
                } => self.rewrite_block_comment(*opens, *closes, body, &mut out),
            }
            i += 1;
        }
        RewrittenLine {
            number: line.number,
            start: line.start,
            indent: line.indent.clone(),
            verbatim,
            fragments: out.finish(),
        }
    }

    fn rewrite_run(&mut self, run: &[Piece], ctx: RunContext, out: &mut FragmentBuilder) {
        let forward = self.direction == Direction::Forward;
        self.check_foreign_markers(run, ctx.line);
        let atoms = atomize(run);
        let strip = forward
            && self.config.strip_semicolons
            && ctx.ends_statement
            && ends_with_semicolon(&atoms);
        let finish = |text: String| {
            if strip {
                strip_trailing_semicolons(&text)
            } else {
                text
            }
        };

        if ctx.continued {
            let atoms = self.operators(atoms);
            out.code(finish(render(&atoms)), ContentKind::Plain);
            return;
        }
        if atoms.iter().all(Atom::is_whitespace) {
            return;
        }

        if !atoms.iter().any(Atom::is_literal) {
            let code = render(&atoms);
            if let Some(text) = self
                .imports
                .rewrite(ctx.line, &code, &mut self.report.imports)
            {
                out.code(finish(text), ContentKind::Import);
                return;
            }
        }
        if !forward {
            out.code(render(&atoms), ContentKind::Plain);
            return;
        }

        let atoms = self.operators(atoms);
        if let Some(decl) = self.declarations.rewrite(&atoms, ctx.opens_block) {
            self.report.uses_any |= decl.uses_any;
            out.code(finish(decl.text), ContentKind::Declaration);
            return;
        }
        out.code(finish(render(&atoms)), ContentKind::Plain);
    }

    /// Warn about code the brace dialect would read as the start of a comment.
    fn check_foreign_markers(&mut self, run: &[Piece], line: usize) {
        for marker in &self.foreign_markers {
            let found = run
                .iter()
                .any(|p| matches!(p, Piece::Code(code) if code.contains(marker.as_str())));
            if found {
                self.report.warnings.push(Warning::new(
                    WarningKind::CommentMarkerInCode,
                    line,
                    format!("`{marker}` starts a comment in Bython; this code changes meaning"),
                ));
            }
        }
    }

    fn operators(&self, atoms: Vec<Atom>) -> Vec<Atom> {
        if self.direction == Direction::Forward && self.config.rewrite_operators {
            rewrite_operators(atoms)
        } else {
            atoms
        }
    }

    fn rewrite_block_comment(
        &mut self,
        opens: bool,
        closes: bool,
        body: &str,
        out: &mut FragmentBuilder,
    ) {
        let style = if opens {
            match self.config.block_comment_style {
                BlockCommentStyle::Docstring if !out.has_content() => BlockCommentStyle::Docstring,
                _ => BlockCommentStyle::Hash,
            }
        } else {
            self.open_comment.unwrap_or_default()
        };
        let marker = self.config.comment_markers.block_target();
        match comments::block_comment(style, marker, opens, closes, body) {
            BlockRendering::Text(text) => out.code(text, ContentKind::Plain),
            BlockRendering::Comment(comment) => out.comment(comment),
            BlockRendering::Nothing => {}
        }
        self.open_comment = (!closes).then_some(style);
    }
}

#[derive(Debug, Clone, Copy)]
struct RunContext {
    line: usize,
    /// First run of a line that continues the statement above
    continued: bool,
    /// A `{` follows the run
    opens_block: bool,
    /// No further run follows on this line
    ends_statement: bool,
}

/// Forward comment markers that are not comment markers of the reverse input.
fn foreign_markers(config: &TranslationConfig, direction: Direction) -> Vec<String> {
    if direction != Direction::Reverse {
        return Vec::new();
    }
    let markers = &config.comment_markers;
    let own = markers.line_markers(Direction::Reverse);
    let mut foreign: Vec<String> = markers
        .line_markers(Direction::Forward)
        .into_iter()
        .filter(|m| !own.contains(m))
        .collect();
    if let Some(block) = markers.block_markers(Direction::Forward) {
        foreign.push(block.open.clone());
    }
    foreign
}

fn ends_with_semicolon(atoms: &[Atom]) -> bool {
    atoms
        .iter()
        .rev()
        .find(|a| !a.is_whitespace())
        .is_some_and(|a| a.is(CodeToken::Semicolon))
}

/// Collects fragments, holding comments back until the statement they trail has ended.
#[derive(Debug, Default)]
struct FragmentBuilder {
    fragments: Vec<Fragment>,
    pending_comments: Vec<String>,
}

impl FragmentBuilder {
    fn code(&mut self, text: String, kind: ContentKind) {
        self.fragments.push(Fragment::Text { text, kind });
    }

    fn comment(&mut self, comment: String) {
        self.pending_comments.push(comment);
    }

    fn structural(&mut self, fragment: Fragment) {
        self.flush_comments();
        self.fragments.push(fragment);
    }

    fn has_content(&self) -> bool {
        !self.pending_comments.is_empty()
            || self
                .fragments
                .iter()
                .any(|f| matches!(f, Fragment::Text { .. } | Fragment::Comment(_)) && !f.is_blank_text())
    }

    fn flush_comments(&mut self) {
        let comments = std::mem::take(&mut self.pending_comments);
        self.fragments
            .extend(comments.into_iter().map(Fragment::Comment));
    }

    fn finish(mut self) -> Vec<Fragment> {
        self.flush_comments();
        self.fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bython::scanning::LiteralScanner;
    use crate::bython::source::SourceBuffer;

    fn rewrite_with(config: &TranslationConfig, direction: Direction, source: &str) -> Vec<RewrittenLine> {
        let scanned =
            LiteralScanner::scan(config, direction, &SourceBuffer::new(source)).unwrap();
        Rewriter::rewrite(config, direction, &scanned).0
    }

    fn forward(source: &str) -> Vec<RewrittenLine> {
        rewrite_with(&TranslationConfig::default(), Direction::Forward, source)
    }

    fn texts(line: &RewrittenLine) -> Vec<String> {
        line.fragments
            .iter()
            .map(|f| match f {
                Fragment::Text { text, .. } => text.clone(),
                Fragment::Open => "{".to_string(),
                Fragment::Close => "}".to_string(),
                Fragment::Comment(c) => c.clone(),
            })
            .collect()
    }

    #[test]
    fn test_header_and_block_markers() {
        let lines = forward("if (a && !b) {\n    x = 1;\n}");
        assert_eq!(texts(&lines[0]), vec!["if (a and not b) ", "{"]);
        assert_eq!(texts(&lines[1]), vec!["x = 1"]);
        assert_eq!(texts(&lines[2]), vec!["}"]);
    }

    #[test]
    fn test_else_if_between_braces() {
        let lines = forward("} else if x {");
        assert_eq!(texts(&lines[0]), vec!["}", " elif x ", "{"]);
    }

    #[test]
    fn test_inline_comment_moves_after_statement() {
        let lines = forward("x = 1; /* why */ y = 2;");
        assert_eq!(texts(&lines[0]), vec!["x = 1; ", " y = 2", "# why"]);
    }

    #[test]
    fn test_comment_before_block_opener() {
        let lines = forward("while True /* spin */ {");
        assert_eq!(texts(&lines[0]), vec!["while True ", "# spin", "{"]);
    }

    #[test]
    fn test_semicolon_inside_open_string_is_kept() {
        let lines = forward("s = \"\"\"a;\nb\"\"\";");
        assert_eq!(texts(&lines[0]), vec!["s = \"\"\"a;"]);
        assert!(lines[1].verbatim);
        assert_eq!(texts(&lines[1]), vec!["b\"\"\""]);
    }

    #[test]
    fn test_declaration_kind() {
        let lines = forward("int count = 0;");
        assert_eq!(
            lines[0].fragments,
            vec![Fragment::Text {
                text: "count = 0".to_string(),
                kind: ContentKind::Declaration
            }]
        );
    }

    #[test]
    fn test_docstring_comments_are_verbatim() {
        let config = TranslationConfig {
            block_comment_style: BlockCommentStyle::Docstring,
            ..TranslationConfig::default()
        };
        let lines = rewrite_with(&config, Direction::Forward, "/* Module docs\n   more */");
        assert_eq!(texts(&lines[0]), vec!["''' Module docs"]);
        assert!(lines[1].verbatim);
        assert_eq!(texts(&lines[1]), vec!["   more '''"]);
    }

    #[test]
    fn test_trailing_block_comment_falls_back_to_hash() {
        let config = TranslationConfig {
            block_comment_style: BlockCommentStyle::Docstring,
            ..TranslationConfig::default()
        };
        let lines = rewrite_with(&config, Direction::Forward, "x = 1 /* note */");
        assert_eq!(texts(&lines[0]), vec!["x = 1 ", "# note"]);
    }

    #[test]
    fn test_reverse_leaves_code_alone() {
        let lines = rewrite_with(
            &TranslationConfig::default(),
            Direction::Reverse,
            "if a and not b:  # check\n    x = 1;",
        );
        assert_eq!(texts(&lines[0]), vec!["if a and not b:  ", "// check"]);
        assert_eq!(texts(&lines[1]), vec!["x = 1;"]);
    }

    #[test]
    fn test_reverse_warns_about_floor_division() {
        let config = TranslationConfig::default();
        let scanned = LiteralScanner::scan(
            &config,
            Direction::Reverse,
            &SourceBuffer::new("x = (a //\n     b)\ny = \"//\"\n"),
        )
        .unwrap();
        let (_, report) = Rewriter::rewrite(&config, Direction::Reverse, &scanned);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, WarningKind::CommentMarkerInCode);
        assert_eq!(report.warnings[0].line, 1);
    }

    #[test]
    fn test_reverse_keeps_shebang() {
        let lines = rewrite_with(
            &TranslationConfig::default(),
            Direction::Reverse,
            "#!/usr/bin/env python3\n# note",
        );
        assert_eq!(texts(&lines[0]), vec!["#!/usr/bin/env python3"]);
        assert_eq!(texts(&lines[1]), vec!["// note"]);
    }

    #[test]
    fn test_continuation_lines_skip_declarations() {
        let lines = forward("call(a,\n     int b)");
        assert_eq!(lines[1].start, LineStart::Continuation);
        assert_eq!(texts(&lines[1]), vec!["int b)"]);
    }
}
