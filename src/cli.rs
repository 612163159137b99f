// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::env;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};

use crate::formatter::{FormatMode, FormatterConfig, CONFIG_FILE_NAME};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const LONG_ABOUT: &str = "Column-aligning formatter for NASM-style assembly source.

Contiguous lines of the same shape (%define, data label, instruction) and the same
indentation are aligned as one block: names, directives, operands and trailing
comments start in the same column. Blank and unrecognized lines are left untouched.

By default the formatted text is written to stdout. Use --check to only report
files that would change (exit status 1), or --write to rewrite files in place.
Settings are read from .asmalignfmt.toml in the working directory when present;
ASMALIGN_TAB_SIZE and ASMALIGN_QUIET override it and command-line flags override both.";

#[derive(Parser, Debug)]
#[command(
    name = "asmalign",
    version = VERSION,
    about = "Column-aligning formatter for NASM-style assembly source",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        long = "format",
        value_enum,
        default_value_t = OutputFormat::Text,
        long_help = "Select output format. text prints formatted source; json prints the per-file edit list and diagnostics."
    )]
    pub format: OutputFormat,
    #[arg(
        long = "check",
        action = ArgAction::SetTrue,
        conflicts_with = "write",
        long_help = "Do not write anything; list files that would change and exit with status 1 if any would."
    )]
    pub check: bool,
    #[arg(
        short = 'w',
        long = "write",
        action = ArgAction::SetTrue,
        long_help = "Rewrite input files in place."
    )]
    pub write: bool,
    #[arg(
        short = 't',
        long = "tab-size",
        value_name = "N",
        long_help = "Columns per tab when comparing leading indentation (default 4)."
    )]
    pub tab_size: Option<usize>,
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        long_help = "Read formatter settings from FILE instead of ./.asmalignfmt.toml."
    )]
    pub config: Option<PathBuf>,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Suppress warnings and summary lines."
    )]
    pub quiet: bool,
    #[arg(
        short = 'E',
        long = "error",
        value_name = "FILE",
        long_help = "Write diagnostics to FILE instead of stderr."
    )]
    pub error_file: Option<PathBuf>,
    #[arg(
        long = "error-append",
        action = ArgAction::SetTrue,
        requires = "error_file",
        long_help = "Append diagnostics to --error FILE instead of truncating it."
    )]
    pub error_append: bool,
    #[arg(
        long = "no-error",
        action = ArgAction::SetTrue,
        conflicts_with_all = ["error_file", "error_append"],
        long_help = "Disable all diagnostic output routing."
    )]
    pub no_error: bool,
    #[arg(value_name = "FILE", required = true)]
    pub inputs: Vec<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticsSinkConfig {
    Disabled,
    Stderr,
    File { path: PathBuf, append: bool },
}

/// Validated settings for one invocation.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub input_paths: Vec<PathBuf>,
    pub mode: FormatMode,
    pub formatter: FormatterConfig,
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub diagnostics_sink: DiagnosticsSinkConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliError {
    message: String,
}

impl CliError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Validate CLI arguments and return parsed configuration.
pub fn validate_cli(cli: &Cli) -> Result<CliConfig, CliError> {
    let env_tab_size = parse_env_usize("ASMALIGN_TAB_SIZE")?;
    let env_quiet = parse_env_bool("ASMALIGN_QUIET")?;

    let mut formatter = load_formatter_config(cli.config.as_deref(), Path::new(CONFIG_FILE_NAME))?;
    if let Some(tab_size) = cli.tab_size.or(env_tab_size) {
        if tab_size == 0 {
            return Err(CliError::new("Tab size must be >= 1"));
        }
        formatter.tab_size = tab_size;
    }

    let mode = if cli.check {
        FormatMode::Check
    } else if cli.write {
        FormatMode::Write
    } else {
        FormatMode::Stdout
    };

    let quiet = cli.quiet || env_quiet.unwrap_or(false);

    let diagnostics_sink = if cli.no_error {
        DiagnosticsSinkConfig::Disabled
    } else if let Some(path) = &cli.error_file {
        DiagnosticsSinkConfig::File {
            path: path.clone(),
            append: cli.error_append,
        }
    } else {
        DiagnosticsSinkConfig::Stderr
    };

    Ok(CliConfig {
        input_paths: cli.inputs.clone(),
        mode,
        formatter,
        output_format: cli.format,
        quiet,
        diagnostics_sink,
    })
}

/// An explicit config path must exist; the implicit one is optional.
fn load_formatter_config(
    explicit: Option<&Path>,
    implicit: &Path,
) -> Result<FormatterConfig, CliError> {
    let path = match explicit {
        Some(path) => path,
        None if implicit.is_file() => implicit,
        None => return Ok(FormatterConfig::default()),
    };
    FormatterConfig::load_from_path(path).map_err(|err| CliError::new(err.to_string()))
}

fn parse_env_bool(var_name: &str) -> Result<Option<bool>, CliError> {
    let Some(raw) = env::var_os(var_name) else {
        return Ok(None);
    };
    let value = raw.to_string_lossy().trim().to_ascii_lowercase();
    let parsed = match value.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        "" => None,
        _ => {
            return Err(CliError::new(format!(
                "Invalid boolean value for {var_name}: {value}"
            )))
        }
    };
    Ok(parsed)
}

fn parse_env_usize(var_name: &str) -> Result<Option<usize>, CliError> {
    let Some(raw) = env::var_os(var_name) else {
        return Ok(None);
    };
    let value = raw.to_string_lossy().trim().to_string();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<usize>()
        .map(Some)
        .map_err(|_| CliError::new(format!("Invalid integer value for {var_name}: {value}")))
}
