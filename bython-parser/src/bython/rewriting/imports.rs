//! Import statements
//!
//!     Every `import a.b` and `from a.b import c` is resolved against the module index of the
//!     configuration. Resolved modules become [`Dependency`] records so callers can translate
//!     them as well. Unresolved ones produce a warning and stay as written. Relative imports
//!     (`from .a import x`) resolve against the package of the file being translated, one
//!     level up for every dot after the first.
//!
//!     With a module prefix, imports of resolved modules are renamed to the prefixed file
//!     names the caller writes: `import util` becomes `import by_util as util` going forward,
//!     and the inverse going back. Dotted imports without an alias keep their name, since
//!     renaming them would change the bound name.

use crate::bython::config::{Direction, TranslationConfig};
use crate::bython::error::{Warning, WarningKind};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

static IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)import\s+([^;]+?)(\s*;*\s*)$").unwrap());

static FROM_IMPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)from\s+(\.*)([\w.]*)(\s+import\b.*)$").unwrap());

static IMPORT_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\w.]+)(?:\s+as\s+(\w+))?$").unwrap());

/// A module the translated file imports that is itself part of the translation set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Dependency {
    /// Module name as written in the input
    pub module: String,
    /// Line of the import statement
    pub line: usize,
    /// Input-dialect file, relative to the project root
    pub source: PathBuf,
    /// Where its translation lands, relative to the project root
    pub target: PathBuf,
}

/// Findings collected while rewriting imports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub dependencies: Vec<Dependency>,
    pub warnings: Vec<Warning>,
}

pub struct ImportRewriter<'a> {
    config: &'a TranslationConfig,
    direction: Direction,
}

impl<'a> ImportRewriter<'a> {
    pub fn new(config: &'a TranslationConfig, direction: Direction) -> Self {
        ImportRewriter { config, direction }
    }

    /// Rewrite `code` when it is an import statement. `None` means it is not one.
    pub fn rewrite(&self, line: usize, code: &str, report: &mut ImportReport) -> Option<String> {
        if let Some(caps) = IMPORT.captures(code) {
            let items: Vec<String> = caps[2]
                .split(',')
                .map(|item| self.rewrite_item(line, item.trim(), report))
                .collect();
            return Some(format!("{}import {}{}", &caps[1], items.join(", "), &caps[3]));
        }
        if let Some(caps) = FROM_IMPORT.captures(code) {
            let module = &caps[3];
            if module.is_empty() {
                // `from . import x` names a package, not a file
                return Some(code.to_string());
            }
            let dots = caps[2].len();
            let path = self.module_file(dots, module);
            let written = format!("{}{}", &caps[2], module);
            let renamed = match self.resolve(line, &written, path, report) {
                true => self.rename(module),
                false => module.to_string(),
            };
            return Some(format!("{}from {}{}{}", &caps[1], &caps[2], renamed, &caps[4]));
        }
        None
    }

    fn rewrite_item(&self, line: usize, item: &str, report: &mut ImportReport) -> String {
        let Some(caps) = IMPORT_ITEM.captures(item) else {
            return item.to_string();
        };
        let module = &caps[1];
        let alias = caps.get(2).map(|m| m.as_str());
        let path = self.module_file(0, module);
        if !self.resolve(line, module, path, report) {
            return item.to_string();
        }
        let renamed = self.rename(module);
        if renamed == module {
            return item.to_string();
        }
        match alias {
            Some(alias) if alias == renamed => renamed,
            Some(alias) => format!("{renamed} as {alias}"),
            None if module.contains('.') => item.to_string(),
            None => format!("{renamed} as {module}"),
        }
    }

    /// Input-dialect file a module refers to. `None` when the dots climb above the root.
    fn module_file(&self, dots: usize, module: &str) -> Option<PathBuf> {
        let path = self.config.extensions.module_path(module, self.direction);
        let current = match &self.config.current_module {
            Some(current) if dots > 0 => current,
            _ => return Some(path),
        };
        let mut package = current.parent().map(Path::to_path_buf).unwrap_or_default();
        for _ in 1..dots {
            if !package.pop() {
                return None;
            }
        }
        Some(package.join(path))
    }

    /// Record a dependency or an unresolved-import warning.
    fn resolve(
        &self,
        line: usize,
        module: &str,
        path: Option<PathBuf>,
        report: &mut ImportReport,
    ) -> bool {
        match path {
            Some(path) if self.config.modules.contains(&path) => {
                let target = self.config.output_path(&path, self.direction);
                report.dependencies.push(Dependency {
                    module: module.to_string(),
                    line,
                    source: path,
                    target,
                });
                true
            }
            _ => {
                let (from, _) = self.config.extensions.pair(self.direction);
                report.warnings.push(Warning::new(
                    WarningKind::UnresolvedImport,
                    line,
                    format!("module '{module}' does not resolve to a .{from} file"),
                ));
                false
            }
        }
    }

    /// Module name of the translated file.
    fn rename(&self, module: &str) -> String {
        let Some(prefix) = &self.config.module_prefix else {
            return module.to_string();
        };
        let (package, last) = match module.rsplit_once('.') {
            Some((package, last)) => (Some(package), last),
            None => (None, module),
        };
        let last = match self.direction {
            Direction::Forward => format!("{prefix}{last}"),
            Direction::Reverse => last.strip_prefix(prefix.as_str()).unwrap_or(last).to_string(),
        };
        match package {
            Some(package) => format!("{package}.{last}"),
            None => last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bython::config::ModuleIndex;
    use rstest::rstest;

    fn config(prefix: Option<&str>) -> TranslationConfig {
        TranslationConfig {
            module_prefix: prefix.map(str::to_string),
            ..TranslationConfig::default()
        }
        .with_modules(ModuleIndex::from_paths(["util.by", "pkg/tools.by", "by_old.py"]))
    }

    fn forward(config: &TranslationConfig, code: &str) -> (Option<String>, ImportReport) {
        let mut report = ImportReport::default();
        let out = ImportRewriter::new(config, Direction::Forward).rewrite(4, code, &mut report);
        (out, report)
    }

    #[rstest]
    #[case("import util", "import by_util as util")]
    #[case("import util as u", "import by_util as u")]
    #[case("from util import helper", "from by_util import helper")]
    #[case("from pkg.tools import x", "from pkg.by_tools import x")]
    #[case("import pkg.tools", "import pkg.tools")]
    #[case("import util;", "import by_util as util;")]
    fn test_prefix_renames_resolved_imports(#[case] code: &str, #[case] expected: &str) {
        let (out, report) = forward(&config(Some("by_")), code);
        assert_eq!(out.as_deref(), Some(expected));
        assert_eq!(report.dependencies.len(), 1);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_dependency_paths() {
        let (_, report) = forward(&config(Some("by_")), "from pkg.tools import x");
        let dep = &report.dependencies[0];
        assert_eq!(dep.module, "pkg.tools");
        assert_eq!(dep.line, 4);
        assert_eq!(dep.source, PathBuf::from("pkg").join("tools.by"));
        assert_eq!(dep.target, PathBuf::from("pkg").join("by_tools.py"));
    }

    #[test]
    fn test_unresolved_import_warns() {
        let (out, report) = forward(&config(None), "import os, util");
        assert_eq!(out.as_deref(), Some("import os, util"));
        assert_eq!(report.dependencies.len(), 1);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].kind, WarningKind::UnresolvedImport);
        assert_eq!(report.warnings[0].line, 4);
    }

    #[rstest]
    #[case("important = 1")]
    #[case("x = from_here")]
    #[case("print('import os')")]
    fn test_non_imports(#[case] code: &str) {
        let (out, report) = forward(&config(None), code);
        assert_eq!(out, None);
        assert!(report.warnings.is_empty());
    }

    #[rstest]
    #[case("pkg/b.by", "from .a import x", Some("pkg/a.by"))]
    #[case("pkg/sub/c.by", "from ..a import x", Some("pkg/a.by"))]
    #[case("b.by", "from .a import x", Some("a.by"))]
    #[case("pkg/b.by", "from ...a import x", None)]
    fn test_relative_imports_resolve_from_package(
        #[case] current: &str,
        #[case] code: &str,
        #[case] expected: Option<&str>,
    ) {
        let config = TranslationConfig::default()
            .with_modules(ModuleIndex::from_paths([
                "a.by",
                "pkg/a.by",
                "pkg/b.by",
                "pkg/sub/c.by",
            ]))
            .with_current_module(current);
        let (out, report) = forward(&config, code);
        assert_eq!(out.as_deref(), Some(code));
        let sources: Vec<PathBuf> = report.dependencies.iter().map(|d| d.source.clone()).collect();
        let expected: Vec<PathBuf> = expected.into_iter().map(PathBuf::from).collect();
        assert_eq!(sources, expected);
    }

    #[test]
    fn test_relative_import_keeps_dots_when_renamed() {
        let config = config(Some("by_"))
            .with_modules(ModuleIndex::from_paths(["pkg/a.by", "pkg/b.by"]))
            .with_current_module("pkg/b.by");
        let (out, report) = forward(&config, "from .a import x");
        assert_eq!(out.as_deref(), Some("from .by_a import x"));
        assert_eq!(report.dependencies[0].module, ".a");
        assert_eq!(report.dependencies[0].target, PathBuf::from("pkg").join("by_a.py"));
    }

    #[test]
    fn test_reverse_strips_prefix() {
        let config = config(Some("by_"));
        let mut report = ImportReport::default();
        let rewriter = ImportRewriter::new(&config, Direction::Reverse);
        assert_eq!(
            rewriter.rewrite(1, "import by_old as old", &mut report).as_deref(),
            Some("import old")
        );
        assert_eq!(report.dependencies[0].target, PathBuf::from("old.by"));
    }
}
