//! Translation configuration
//!
//!     Every translation call receives its own [`TranslationConfig`]. Nothing in the engine
//!     reads process-wide state, so independent files can be translated concurrently with
//!     the same (or different) configurations.
//!
//!     The configuration also carries the [`ModuleIndex`], the set of source files the
//!     caller knows about. The import rewriter resolves module names against it instead of
//!     touching the filesystem.

use crate::bython::error::TranslationError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::path::{Component, Path, PathBuf};

/// Python keywords (hard and soft). A declaration never starts with one of these.
pub const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "case", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "match", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "type", "while", "with", "yield",
];

/// Which way a translation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Bython to Python (`by2py`)
    Forward,
    /// Python to Bython (`py2by`)
    Reverse,
}

impl Direction {
    pub fn name(self) -> &'static str {
        match self {
            Direction::Forward => "by2py",
            Direction::Reverse => "py2by",
        }
    }
}

/// One line comment marker of the brace dialect and its spelling in the indentation dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerRewrite {
    pub source: String,
    pub target: String,
}

impl MarkerRewrite {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        MarkerRewrite {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Open/close markers of block comments in the brace dialect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockMarkers {
    pub open: String,
    pub close: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentMarkers {
    pub line: Vec<MarkerRewrite>,
    pub block: Option<BlockMarkers>,
}

impl CommentMarkers {
    /// Line markers recognised while scanning in the given direction, longest first.
    pub fn line_markers(&self, direction: Direction) -> Vec<String> {
        let mut markers: Vec<String> = self
            .line
            .iter()
            .map(|m| match direction {
                Direction::Forward => m.source.clone(),
                Direction::Reverse => m.target.clone(),
            })
            .collect();
        markers.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        markers.dedup();
        markers
    }

    /// Block markers only exist in the brace dialect.
    pub fn block_markers(&self, direction: Direction) -> Option<&BlockMarkers> {
        match direction {
            Direction::Forward => self.block.as_ref(),
            Direction::Reverse => None,
        }
    }

    /// Spelling of `marker` in the output dialect.
    ///
    /// Reverse lookups prefer a source marker that is spelled differently from the target,
    /// so `{"//": "#", "#": "#"}` maps `#` back to `//`.
    pub fn rewrite<'a>(&'a self, marker: &'a str, direction: Direction) -> &'a str {
        match direction {
            Direction::Forward => self
                .line
                .iter()
                .find(|m| m.source == marker)
                .map(|m| m.target.as_str())
                .unwrap_or(marker),
            Direction::Reverse => {
                let candidates = self.line.iter().filter(|m| m.target == marker);
                let mut fallback = None;
                for candidate in candidates {
                    if candidate.source != candidate.target {
                        return candidate.source.as_str();
                    }
                    fallback.get_or_insert(candidate.source.as_str());
                }
                fallback.unwrap_or(marker)
            }
        }
    }

    /// Line marker used when block comments are rendered as line comments.
    pub fn block_target(&self) -> &str {
        self.line.first().map(|m| m.target.as_str()).unwrap_or("#")
    }
}

impl Default for CommentMarkers {
    fn default() -> Self {
        CommentMarkers {
            line: vec![MarkerRewrite::new("//", "#"), MarkerRewrite::new("#", "#")],
            block: Some(BlockMarkers {
                open: "/*".to_string(),
                close: "*/".to_string(),
            }),
        }
    }
}

/// How `/* ... */` comments are rendered in Python.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockCommentStyle {
    /// Every comment line becomes a `#` comment
    #[default]
    Hash,
    /// `/*` and `*/` become `'''`
    Docstring,
}

/// File extension table for the two dialects (without the leading dot).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionMap {
    pub source: String,
    pub target: String,
}

impl ExtensionMap {
    /// (input extension, output extension) for a direction.
    pub fn pair(&self, direction: Direction) -> (&str, &str) {
        match direction {
            Direction::Forward => (&self.source, &self.target),
            Direction::Reverse => (&self.target, &self.source),
        }
    }

    /// `x.by` → `x.py`; a name without the input extension gets the output one appended.
    pub fn rename(&self, file_name: &str, direction: Direction) -> String {
        let (from, to) = self.pair(direction);
        match file_name.strip_suffix(&format!(".{from}")) {
            Some(stem) => format!("{stem}.{to}"),
            None => format!("{file_name}.{to}"),
        }
    }

    /// Relative path of the input-dialect file a dotted module name refers to.
    pub fn module_path(&self, module: &str, direction: Direction) -> PathBuf {
        let (from, _) = self.pair(direction);
        let mut path = PathBuf::new();
        let mut parts = module.split('.').peekable();
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                path.push(part);
            } else {
                path.push(format!("{part}.{from}"));
            }
        }
        path
    }
}

impl Default for ExtensionMap {
    fn default() -> Self {
        ExtensionMap {
            source: "by".to_string(),
            target: "py".to_string(),
        }
    }
}

/// Input-dialect files known to the caller, relative to the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleIndex {
    files: HashSet<PathBuf>,
}

impl ModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut index = Self::new();
        for path in paths {
            index.insert(path);
        }
        index
    }

    pub fn insert(&mut self, path: impl AsRef<Path>) {
        self.files.insert(normalize(path.as_ref()));
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.files.contains(&normalize(path))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Everything a single translation call needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// One level of Python indentation
    pub indent_unit: String,
    /// Tab stop used to measure Python indentation. Without it, tabs mixed with spaces are
    /// an error.
    pub tab_width: Option<usize>,
    pub comment_markers: CommentMarkers,
    pub block_comment_style: BlockCommentStyle,
    /// Words that never start a C-style declaration
    pub brace_dialect_keywords: BTreeSet<String>,
    pub extensions: ExtensionMap,
    /// Keep C types as Python annotations instead of dropping them
    pub type_hints: bool,
    /// `&&`, `||`, `!` and `else if`
    pub rewrite_operators: bool,
    pub strip_semicolons: bool,
    /// Treat `{` in expression position as a dict/set literal
    pub expression_braces: bool,
    /// Prepend `true, false = True, False`
    pub true_false_aliases: bool,
    /// Prefix of translated file names; imports of translated modules are renamed to match
    pub module_prefix: Option<String>,
    #[serde(skip)]
    pub modules: ModuleIndex,
    /// Path of the file being translated, relative to the project root. Relative imports
    /// resolve against its package.
    #[serde(skip)]
    pub current_module: Option<PathBuf>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            indent_unit: "    ".to_string(),
            tab_width: None,
            comment_markers: CommentMarkers::default(),
            block_comment_style: BlockCommentStyle::default(),
            brace_dialect_keywords: PYTHON_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            extensions: ExtensionMap::default(),
            type_hints: false,
            rewrite_operators: true,
            strip_semicolons: true,
            expression_braces: true,
            true_false_aliases: false,
            module_prefix: None,
            modules: ModuleIndex::default(),
            current_module: None,
        }
    }
}

impl TranslationConfig {
    pub fn with_modules(mut self, modules: ModuleIndex) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_current_module(mut self, path: impl Into<PathBuf>) -> Self {
        self.current_module = Some(path.into());
        self
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.brace_dialect_keywords.contains(word)
    }

    /// Where the translation of `source` lands, relative to the same root.
    ///
    /// Forward translations get the module prefix prepended; reverse translations have it
    /// stripped again.
    pub fn output_path(&self, source: &Path, direction: Direction) -> PathBuf {
        let file_name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let renamed = self.extensions.rename(&file_name, direction);
        let renamed = match (&self.module_prefix, direction) {
            (Some(prefix), Direction::Forward) => format!("{prefix}{renamed}"),
            (Some(prefix), Direction::Reverse) => renamed
                .strip_prefix(prefix.as_str())
                .map(str::to_string)
                .unwrap_or(renamed),
            (None, _) => renamed,
        };
        source.with_file_name(renamed)
    }

    /// Reject configurations the engine cannot honour.
    pub fn validate(&self) -> Result<(), TranslationError> {
        let invalid = |msg: String| Err(TranslationError::InvalidConfig(msg));

        if self.indent_unit.is_empty() || !self.indent_unit.chars().all(|c| c == ' ' || c == '\t')
        {
            return invalid(format!(
                "indent unit must be non-empty spaces or tabs, got {:?}",
                self.indent_unit
            ));
        }
        if self.tab_width == Some(0) {
            return invalid("tab width must be at least 1".to_string());
        }
        for marker in &self.comment_markers.line {
            for spelling in [&marker.source, &marker.target] {
                if spelling.is_empty() || spelling.starts_with(['"', '\'']) {
                    return invalid(format!("invalid comment marker {spelling:?}"));
                }
            }
        }
        if let Some(block) = &self.comment_markers.block {
            if block.open.is_empty() || block.close.is_empty() {
                return invalid("block comment markers must not be empty".to_string());
            }
        }
        for ext in [&self.extensions.source, &self.extensions.target] {
            if ext.is_empty() || ext.contains(['.', '/', '\\']) {
                return invalid(format!("invalid file extension {ext:?}"));
            }
        }
        if self.extensions.source == self.extensions.target {
            return invalid("source and target extensions must differ".to_string());
        }
        if let Some(prefix) = &self.module_prefix {
            if !prefix.chars().all(|c| c.is_alphanumeric() || c == '_') {
                return invalid(format!("module prefix {prefix:?} is not an identifier"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TranslationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_whitespace_indent() {
        let config = TranslationConfig {
            indent_unit: "--".to_string(),
            ..TranslationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TranslationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_identical_extensions() {
        let mut config = TranslationConfig::default();
        config.extensions.target = "by".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_line_markers_longest_first() {
        let markers = CommentMarkers::default();
        assert_eq!(markers.line_markers(Direction::Forward), vec!["//", "#"]);
        assert_eq!(markers.line_markers(Direction::Reverse), vec!["#"]);
    }

    #[test]
    fn test_marker_rewrite_prefers_distinct_spelling() {
        let markers = CommentMarkers::default();
        assert_eq!(markers.rewrite("//", Direction::Forward), "#");
        assert_eq!(markers.rewrite("#", Direction::Forward), "#");
        assert_eq!(markers.rewrite("#", Direction::Reverse), "//");
    }

    #[test]
    fn test_extension_rename() {
        let ext = ExtensionMap::default();
        assert_eq!(ext.rename("main.by", Direction::Forward), "main.py");
        assert_eq!(ext.rename("script", Direction::Forward), "script.py");
        assert_eq!(ext.rename("main.py", Direction::Reverse), "main.by");
    }

    #[test]
    fn test_module_path() {
        let ext = ExtensionMap::default();
        assert_eq!(
            ext.module_path("pkg.util", Direction::Forward),
            PathBuf::from("pkg").join("util.by")
        );
        assert_eq!(
            ext.module_path("helpers", Direction::Reverse),
            PathBuf::from("helpers.py")
        );
    }

    #[test]
    fn test_output_path_applies_prefix() {
        let config = TranslationConfig {
            module_prefix: Some("by_".to_string()),
            ..TranslationConfig::default()
        };
        assert_eq!(
            config.output_path(Path::new("src/util.by"), Direction::Forward),
            PathBuf::from("src/by_util.py")
        );
        assert_eq!(
            config.output_path(Path::new("src/by_util.py"), Direction::Reverse),
            PathBuf::from("src/util.by")
        );
    }

    #[test]
    fn test_module_index_ignores_cur_dir() {
        let index = ModuleIndex::from_paths(["./lib.by", "pkg/mod.by"]);
        assert!(index.contains(Path::new("lib.by")));
        assert!(index.contains(Path::new("./pkg/mod.by")));
        assert!(!index.contains(Path::new("other.by")));
        assert_eq!(index.len(), 2);
    }
}
