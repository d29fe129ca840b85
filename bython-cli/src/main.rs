//! Command-line interface for bython
//! This binary translates Bython files to Python and Python files back to Bython.
//!
//! Usage:
//!   bython by2py `<input>...` [-o `<dir>`] [--prefix `<p>`] [--stdout]   - Bython to Python
//!   bython py2by `<input>...` [-o `<dir>`] [--tab-width `<n>`]          - Python to Bython
//!   bython show-config                                                   - Print the effective configuration

mod batch;

use batch::{Batch, BatchOptions, BatchReport};
use bython_config::{BythonConfig, Loader, MessageFormat, PROJECT_CONFIG_FILE};
use bython_parser::bython::config::Direction;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use config::ConfigError;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BYTHON_LOG";

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    match matches.subcommand() {
        Some(("by2py", sub)) => handle_translate_command(&matches, sub, Direction::Forward),
        Some(("py2by", sub)) => handle_translate_command(&matches, sub, Direction::Reverse),
        Some(("show-config", _)) => handle_show_config_command(&matches),
        _ => {
            eprintln!("Unknown command");
            std::process::exit(1);
        }
    }
}

fn cli() -> Command {
    Command::new("bython")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Translate between Bython (Python with braces) and Python")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (repeat for more detail); BYTHON_LOG overrides")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Configuration file (default: ./bython.toml when present)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            translate_command("by2py", "Translate Bython files to Python")
                .arg(
                    Arg::new("type-hints")
                        .long("type-hints")
                        .help("Keep C-style types as Python annotations")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("true-false")
                        .long("true-false")
                        .short('t')
                        .help("Prepend `true, false = True, False` to every output")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("indent")
                        .long("indent")
                        .help("Spaces per indentation level in the output")
                        .value_parser(value_parser!(usize)),
                ),
        )
        .subcommand(
            translate_command("py2by", "Translate Python files to Bython").arg(
                Arg::new("tab-width")
                    .long("tab-width")
                    .help("Tab stop used to measure indentation that mixes tabs and spaces")
                    .value_parser(value_parser!(usize)),
            ),
        )
        .subcommand(Command::new("show-config").about("Print the effective configuration as JSON"))
}

/// Arguments shared by both translation directions.
fn translate_command(name: &'static str, about: &'static str) -> Command {
    Command::new(name)
        .about(about)
        .arg(
            Arg::new("inputs")
                .help("Files or directories to translate")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Write outputs under this directory, keeping the input layout")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("prefix")
                .long("prefix")
                .help("Prefix for translated file names and the imports that refer to them"),
        )
        .arg(
            Arg::new("stdout")
                .long("stdout")
                .help("Print translations instead of writing files")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-follow-imports")
                .long("no-follow-imports")
                .help("Only translate the given inputs, not the modules they import")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("message-format")
                .long("message-format")
                .help("Diagnostics format")
                .value_parser(["human", "json"]),
        )
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Defaults, then the configuration file, then command-line flags.
fn load_config(matches: &ArgMatches, sub: Option<&ArgMatches>) -> Result<BythonConfig, ConfigError> {
    let mut loader = match matches.get_one::<PathBuf>("config") {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(PROJECT_CONFIG_FILE),
    };
    let Some(sub) = sub else {
        return loader.build();
    };

    if let Some(prefix) = sub.get_one::<String>("prefix") {
        loader = loader.set_override("translation.module_prefix", prefix.as_str())?;
    }
    if flag(sub, "no-follow-imports") {
        loader = loader.set_override("output.follow_imports", false)?;
    }
    if let Some(format) = sub.get_one::<String>("message-format") {
        loader = loader.set_override("output.message_format", format.as_str())?;
    }
    if flag(sub, "type-hints") {
        loader = loader.set_override("translation.type_hints", true)?;
    }
    if flag(sub, "true-false") {
        loader = loader.set_override("translation.true_false_aliases", true)?;
    }
    if let Some(width) = optional::<usize>(sub, "indent") {
        loader = loader.set_override("translation.indent_unit", " ".repeat(width))?;
    }
    if let Some(width) = optional::<usize>(sub, "tab-width") {
        loader = loader.set_override("translation.tab_width", width as i64)?;
    }
    loader.build()
}

/// A flag that only some subcommands define.
fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches
        .try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

/// A value that only some subcommands define.
fn optional<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Option<T> {
    matches.try_get_one::<T>(id).ok().flatten().cloned()
}

/// Handle the by2py and py2by commands
fn handle_translate_command(matches: &ArgMatches, sub: &ArgMatches, direction: Direction) {
    let config = load_config(matches, Some(sub)).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    let inputs: Vec<PathBuf> = sub
        .get_many::<PathBuf>("inputs")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let options = BatchOptions {
        direction,
        output_dir: sub.get_one::<PathBuf>("output").cloned(),
        to_stdout: sub.get_flag("stdout"),
        follow_imports: config.output.follow_imports,
    };

    let report = Batch::new(&config.translation, &options).run(&inputs);
    print_report(&report, config.output.message_format);
    if report.failed() > 0 {
        std::process::exit(1);
    }
}

fn print_report(report: &BatchReport, format: MessageFormat) {
    for file in &report.files {
        if let Some(text) = &file.text {
            print!("{}", text);
        }
        match format {
            MessageFormat::Json => match serde_json::to_string(file) {
                Ok(json) => eprintln!("{}", json),
                Err(e) => eprintln!("Error formatting diagnostics: {}", e),
            },
            MessageFormat::Human => {
                let path = file.input.display();
                for warning in &file.warnings {
                    eprintln!("warning: {}:{}: {}", path, warning.line, warning.message);
                }
                if let Some(error) = &file.error {
                    match error.line {
                        Some(line) => eprintln!("error: {}:{}: {}", path, line, error.message),
                        None => eprintln!("error: {}: {}", path, error.message),
                    }
                }
            }
        }
    }
}

/// Handle the show-config command
fn handle_show_config_command(matches: &ArgMatches) {
    let config = load_config(matches, None).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error formatting configuration: {}", e);
            std::process::exit(1);
        }
    }
}
