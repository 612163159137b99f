// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for asmalign.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use serde_json::json;

use asmalign::cli::{validate_cli, Cli, CliConfig, DiagnosticsSinkConfig, OutputFormat};
use asmalign::formatter::{
    FormatMode, FormatterConfig, FormatterDiagnostic, FormatterEngine, FormatterFileReport, FormatterRunReport,
};

struct DiagnosticsSink {
    writer: Option<Box<dyn Write>>,
}

impl DiagnosticsSink {
    fn from_config(config: &DiagnosticsSinkConfig) -> io::Result<Self> {
        match config {
            DiagnosticsSinkConfig::Disabled => Ok(Self { writer: None }),
            DiagnosticsSinkConfig::Stderr => Ok(Self {
                writer: Some(Box::new(io::stderr())),
            }),
            DiagnosticsSinkConfig::File { path, append } => {
                let mut opts = OpenOptions::new();
                opts.create(true).write(true);
                if *append {
                    opts.append(true);
                } else {
                    opts.truncate(true);
                }
                let file = opts.open(path)?;
                Ok(Self {
                    writer: Some(Box::new(file)),
                })
            }
        }
    }

    fn emit_line(&mut self, line: &str) {
        if let Some(writer) = &mut self.writer {
            let _ = writeln!(writer, "{line}");
        }
    }

    fn emit_file_diagnostics(&mut self, file: &FormatterFileReport) {
        for diag in &file.diagnostics {
            self.emit_line(&format_diagnostic_line(&file.path, diag));
        }
    }
}

fn format_diagnostic_line(path: &Path, diag: &FormatterDiagnostic) -> String {
    format!(
        "{}:{}: warning: {}",
        path.display(),
        diag.line_number,
        diag.message
    )
}

fn mode_name(mode: FormatMode) -> &'static str {
    match mode {
        FormatMode::Check => "check",
        FormatMode::Write => "write",
        FormatMode::Stdout => "stdout",
    }
}

fn report_json(
    report: &FormatterRunReport,
    mode: FormatMode,
    config: &FormatterConfig,
) -> serde_json::Value {
    let files: Vec<_> = report
        .files
        .iter()
        .map(|file| {
            let edits: Vec<_> = file
                .edits
                .iter()
                .map(|edit| {
                    json!({
                        "line": edit.line_index + 1,
                        "text": edit.text,
                    })
                })
                .collect();
            let diagnostics: Vec<_> = file
                .diagnostics
                .iter()
                .map(|diag| {
                    json!({
                        "line": diag.line_number,
                        "severity": "warning",
                        "message": diag.message,
                    })
                })
                .collect();
            json!({
                "path": file.path.display().to_string(),
                "changed": file.changed,
                "edits": edits,
                "diagnostics": diagnostics,
            })
        })
        .collect();
    json!({
        "mode": mode_name(mode),
        "tab_size": config.tab_size,
        "summary": {
            "files_seen": report.summary.files_seen,
            "files_changed": report.summary.files_changed,
            "edits": report.summary.edits,
            "warnings": report.summary.warnings,
        },
        "files": files,
    })
}

fn emit_text_report(report: &FormatterRunReport, config: &CliConfig, sink: &mut DiagnosticsSink) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for file in &report.files {
        match config.mode {
            FormatMode::Stdout => {
                let _ = out.write_all(file.rendered.as_bytes());
            }
            FormatMode::Check if file.changed => {
                let _ = writeln!(out, "{}", file.path.display());
            }
            _ => {}
        }
        if !config.quiet {
            sink.emit_file_diagnostics(file);
        }
    }

    if config.quiet {
        return;
    }
    let summary = report.summary;
    match config.mode {
        FormatMode::Check => sink.emit_line(&format!(
            "{} of {} file(s) would be reformatted",
            summary.files_changed, summary.files_seen
        )),
        FormatMode::Write => sink.emit_line(&format!(
            "reformatted {} of {} file(s), {} line(s) changed",
            summary.files_changed, summary.files_seen, summary.edits
        )),
        FormatMode::Stdout => {}
    }
}

fn main() {
    let cli = Cli::parse();
    let cli_config = match validate_cli(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let mut sink = match DiagnosticsSink::from_config(&cli_config.diagnostics_sink) {
        Ok(sink) => sink,
        Err(err) => {
            eprintln!("Failed to open diagnostics sink: {err}");
            std::process::exit(2);
        }
    };

    let engine = FormatterEngine::new(cli_config.formatter.clone());
    let report = match engine.run_paths_with_report(&cli_config.input_paths, cli_config.mode) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(2);
        }
    };

    match cli_config.output_format {
        OutputFormat::Json => println!(
            "{}",
            report_json(&report, cli_config.mode, engine.config())
        ),
        OutputFormat::Text => emit_text_report(&report, &cli_config, &mut sink),
    }

    if cli_config.mode == FormatMode::Check && report.summary.files_changed > 0 {
        std::process::exit(1);
    }
}
