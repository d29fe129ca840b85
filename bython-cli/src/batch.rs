//! File-level orchestration
//!
//! Inputs are grouped by the root their imports resolve against: the directory of a file
//! given on the command line, or the directory itself when one is given. Each root is walked
//! once to build its module index. Translation then runs in waves: every pending file of a
//! wave is translated in parallel, and the imported modules the wave discovered become the
//! next wave. A failed file never stops its siblings.

use bython_parser::bython::config::{Direction, ModuleIndex};
use bython_parser::{translate_forward, translate_reverse, TranslationConfig, Warning};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// How a batch runs.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub direction: Direction,
    /// Mirror outputs into this directory instead of writing next to the inputs
    pub output_dir: Option<PathBuf>,
    /// Print translations instead of writing them
    pub to_stdout: bool,
    pub follow_imports: bool,
}

/// A fatal problem with one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    pub line: Option<usize>,
    pub message: String,
}

/// What happened to one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub warnings: Vec<Warning>,
    pub error: Option<FileError>,
    #[serde(skip)]
    pub text: Option<String>,
}

impl FileReport {
    fn failed(input: PathBuf, error: FileError) -> Self {
        FileReport {
            input,
            output: None,
            warnings: Vec::new(),
            error: Some(error),
            text: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| !f.is_ok()).count()
    }
}

/// A file waiting for translation, relative to its root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Job {
    root: PathBuf,
    relative: PathBuf,
}

impl Job {
    fn path(&self) -> PathBuf {
        self.root.join(&self.relative)
    }
}

pub struct Batch<'a> {
    config: &'a TranslationConfig,
    options: &'a BatchOptions,
    /// Configuration with the module index of each root
    roots: HashMap<PathBuf, TranslationConfig>,
}

impl<'a> Batch<'a> {
    pub fn new(config: &'a TranslationConfig, options: &'a BatchOptions) -> Self {
        Batch {
            config,
            options,
            roots: HashMap::new(),
        }
    }

    pub fn run(mut self, inputs: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::default();
        let mut pending = Vec::new();
        for input in inputs {
            match self.jobs_for(input) {
                Ok(jobs) => pending.extend(jobs),
                Err(error) => report.files.push(FileReport::failed(input.clone(), error)),
            }
        }
        for job in &pending {
            self.index_root(&job.root);
        }

        let mut seen: HashSet<PathBuf> = pending.iter().map(Job::path).collect();
        let mut wave = 0;
        while !pending.is_empty() {
            wave += 1;
            debug!(wave, files = pending.len(), "translating wave");
            let results: Vec<(FileReport, Vec<Job>)> =
                pending.par_iter().map(|job| self.translate(job)).collect();

            let mut next = Vec::new();
            for (file, discovered) in results {
                report.files.push(file);
                if !self.options.follow_imports || self.options.to_stdout {
                    continue;
                }
                for job in discovered {
                    if seen.insert(job.path()) {
                        next.push(job);
                    }
                }
            }
            pending = next;
        }
        report
    }

    /// Files to translate for one command-line input.
    fn jobs_for(&self, input: &Path) -> Result<Vec<Job>, FileError> {
        if input.is_dir() {
            let (from, _) = self.config.extensions.pair(self.options.direction);
            let jobs = source_files(input, from)
                .into_iter()
                .map(|relative| Job {
                    root: input.to_path_buf(),
                    relative,
                })
                .collect();
            return Ok(jobs);
        }
        if !input.is_file() {
            return Err(FileError {
                line: None,
                message: "no such file or directory".to_string(),
            });
        }
        let root = match input.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let relative = input
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| input.to_path_buf());
        Ok(vec![Job { root, relative }])
    }

    fn index_root(&mut self, root: &Path) {
        if self.roots.contains_key(root) {
            return;
        }
        let (from, _) = self.config.extensions.pair(self.options.direction);
        let modules = ModuleIndex::from_paths(source_files(root, from));
        debug!(root = %root.display(), modules = modules.len(), "indexed modules");
        let config = self.config.clone().with_modules(modules);
        self.roots.insert(root.to_path_buf(), config);
    }

    fn translate(&self, job: &Job) -> (FileReport, Vec<Job>) {
        let input = job.path();
        let Some(config) = self.roots.get(&job.root) else {
            return (FileReport::failed(input, io_error("root was not indexed")), Vec::new());
        };
        let source = match fs::read_to_string(&input) {
            Ok(source) => source,
            Err(err) => return (FileReport::failed(input, io_error(err)), Vec::new()),
        };

        let file_config = config.clone().with_current_module(&job.relative);
        let result = match self.options.direction {
            Direction::Forward => translate_forward(&source, &file_config),
            Direction::Reverse => translate_reverse(&source, &file_config),
        };
        let translation = match result {
            Ok(translation) => translation,
            Err(err) => {
                if let Some(partial) = err.as_structural().and_then(|e| e.partial_output.as_ref()) {
                    debug!(file = %input.display(), "partial output:\n{partial}");
                }
                let message = match err.as_structural() {
                    Some(structural) => format!("{}: {}", structural.kind, structural.message),
                    None => err.to_string(),
                };
                let error = FileError {
                    line: err.line(),
                    message,
                };
                return (FileReport::failed(input, error), Vec::new());
            }
        };

        let discovered = translation
            .dependencies
            .iter()
            .map(|dep| Job {
                root: job.root.clone(),
                relative: dep.source.clone(),
            })
            .collect();

        let mut file = FileReport {
            input,
            output: None,
            warnings: translation.warnings,
            error: None,
            text: None,
        };
        if self.options.to_stdout {
            file.text = Some(translation.output);
            return (file, discovered);
        }

        let output = self.output_path(job, config);
        match write_output(&output, &translation.output) {
            Ok(()) => {
                info!(input = %file.input.display(), output = %output.display(), "translated");
                file.output = Some(output);
            }
            Err(err) => file.error = Some(io_error(err)),
        }
        (file, discovered)
    }

    fn output_path(&self, job: &Job, config: &TranslationConfig) -> PathBuf {
        let relative = config.output_path(&job.relative, self.options.direction);
        match &self.options.output_dir {
            Some(dir) => dir.join(relative),
            None => job.root.join(relative),
        }
    }
}

/// Files under `root` with the given extension, relative to `root`.
fn source_files(root: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path().extension().and_then(|s| s.to_str()) == Some(extension)
        })
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}

fn write_output(path: &Path, text: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)
}

fn io_error(err: impl std::fmt::Display) -> FileError {
    FileError {
        line: None,
        message: err.to_string(),
    }
}
