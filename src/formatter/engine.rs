// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{
    analyze_lines, collect_skipped_line_diagnostics, find_blocks, plan_edits, FormatEdit,
    FormatterConfig, FormatterDiagnostic, LineSource, SourceDocument,
};

/// Formatter execution mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatMode {
    Check,
    Write,
    Stdout,
}

/// Aggregate formatter run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormatterRunSummary {
    pub files_seen: usize,
    pub files_changed: usize,
    pub edits: usize,
    pub warnings: usize,
    pub files_with_warnings: usize,
}

/// Result of one pass over a host document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatPass {
    pub edits: Vec<FormatEdit>,
    pub diagnostics: Vec<FormatterDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterOutput {
    pub rendered: String,
    pub edits: Vec<FormatEdit>,
    pub diagnostics: Vec<FormatterDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterFileReport {
    pub path: PathBuf,
    pub changed: bool,
    pub rendered: String,
    pub edits: Vec<FormatEdit>,
    pub diagnostics: Vec<FormatterDiagnostic>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatterRunReport {
    pub summary: FormatterRunSummary,
    pub files: Vec<FormatterFileReport>,
}

/// Column-alignment formatter engine. Holds no state between passes.
#[derive(Debug, Clone, Default)]
pub struct FormatterEngine {
    config: FormatterConfig,
}

impl FormatterEngine {
    pub fn new(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    /// Runs one pass over `source` and returns the replacements it proposes.
    pub fn format_lines<S: LineSource + ?Sized>(&self, source: &S) -> FormatPass {
        let lines = analyze_lines(source, self.config.tab_size);
        let blocks = find_blocks(&lines);
        FormatPass {
            edits: plan_edits(&lines, &blocks),
            diagnostics: collect_skipped_line_diagnostics(&lines),
        }
    }

    pub fn format_source_with_diagnostics(&self, source: &str) -> FormatterOutput {
        let mut doc = SourceDocument::parse(source);
        let pass = self.format_lines(&doc);
        doc.apply_edits(&pass.edits);
        if !self.config.preserve_line_endings {
            doc.normalize_line_endings();
        }
        FormatterOutput {
            rendered: doc.render(),
            edits: pass.edits,
            diagnostics: pass.diagnostics,
        }
    }

    pub fn format_source(&self, source: &str) -> String {
        self.format_source_with_diagnostics(source).rendered
    }

    pub fn format_path_to_string(&self, path: &Path) -> io::Result<String> {
        let input = fs::read_to_string(path)?;
        Ok(self.format_source(&input))
    }

    pub fn run_paths(
        &self,
        paths: &[PathBuf],
        mode: FormatMode,
    ) -> io::Result<FormatterRunSummary> {
        let report = self.run_paths_with_report(paths, mode)?;
        Ok(report.summary)
    }

    pub fn run_paths_with_report(
        &self,
        paths: &[PathBuf],
        mode: FormatMode,
    ) -> io::Result<FormatterRunReport> {
        let mut report = FormatterRunReport {
            summary: FormatterRunSummary::default(),
            files: Vec::with_capacity(paths.len()),
        };
        for path in paths {
            report.summary.files_seen += 1;
            let input = fs::read_to_string(path)?;
            let output = self.format_source_with_diagnostics(&input);
            let changed = output.rendered != input;
            if changed {
                report.summary.files_changed += 1;
                if mode == FormatMode::Write {
                    fs::write(path, &output.rendered)?;
                }
            }
            report.summary.edits += output.edits.len();
            if !output.diagnostics.is_empty() {
                report.summary.warnings += output.diagnostics.len();
                report.summary.files_with_warnings += 1;
            }
            report.files.push(FormatterFileReport {
                path: path.clone(),
                changed,
                rendered: output.rendered,
                edits: output.edits,
                diagnostics: output.diagnostics,
            });
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::{FormatMode, FormatterEngine};
    use crate::formatter::{FormatEdit, FormatterConfig};
    use proptest::prelude::*;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::process;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn format_lines_returns_edits_for_changed_lines_only() {
        let engine = FormatterEngine::default();
        let pass = engine.format_lines(&["mov  al,1", "add   ebx, 2", "", "ret"]);
        assert_eq!(
            pass.edits,
            vec![
                FormatEdit {
                    line_index: 0,
                    text: "mov al,  1".to_string(),
                },
                FormatEdit {
                    line_index: 1,
                    text: "add ebx, 2".to_string(),
                },
            ]
        );
        assert!(pass.diagnostics.is_empty());
    }

    #[test]
    fn format_lines_uses_configured_tab_size() {
        let lines = ["    mov eax, 1", "\tinc  ebx"];
        let four = FormatterEngine::default().format_lines(&lines);
        assert_eq!(four.edits.len(), 1);
        assert_eq!(four.edits[0].text, "\tinc ebx");

        let eight = FormatterEngine::new(FormatterConfig {
            tab_size: 8,
            ..FormatterConfig::default()
        })
        .format_lines(&lines);
        assert_eq!(eight.edits.len(), 1);
        assert_eq!(eight.edits[0].text, "\tinc ebx");
    }

    #[test]
    fn format_source_aligns_blocks_and_keeps_line_endings() {
        let engine = FormatterEngine::default();
        let source = "msg db 'hi', 0 ; text\r\nmsg_len   equ $ - msg\r\n";
        assert_eq!(
            engine.format_source(source),
            "msg     db  'hi', 0 ; text\r\nmsg_len equ $ - msg\r\n"
        );
    }

    #[test]
    fn format_source_can_normalize_line_endings_when_configured() {
        let engine = FormatterEngine::new(FormatterConfig {
            preserve_line_endings: false,
            ..FormatterConfig::default()
        });
        assert_eq!(engine.format_source("ret ;x\r\nnop\r\n"), "ret ;x\nnop\n");
    }

    #[test]
    fn format_source_is_idempotent() {
        let engine = FormatterEngine::default();
        let source = "%define A 1;a\n%define LONG 22\n\n  mov eax,[ebx+4] ;x\n  inc eax\n";
        let once = engine.format_source(source);
        let twice = engine.format_source_with_diagnostics(&once);
        assert_eq!(once, twice.rendered);
        assert!(twice.edits.is_empty());
    }

    #[test]
    fn format_source_reports_skipped_line_and_keeps_it() {
        let engine = FormatterEngine::default();
        let source = "    mov eax, 1\n    imul eax,ebx,3\n";
        let output = engine.format_source_with_diagnostics(source);
        assert_eq!(output.rendered, source);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].line_number, 2);
    }

    #[test]
    fn run_paths_counts_seen_and_changed_for_check_mode() {
        let file = create_temp_file("run-paths-check", "    mov eax, 1\n");
        let engine = FormatterEngine::default();
        let summary = engine
            .run_paths(std::slice::from_ref(&file), FormatMode::Check)
            .expect("run formatter");
        assert_eq!(summary.files_seen, 1);
        assert_eq!(summary.files_changed, 0);
        assert_eq!(summary.edits, 0);
    }

    #[test]
    fn run_paths_write_mode_rewrites_file() {
        let file = create_temp_file("run-paths-write", "mov  al,1\nadd ebx,2\n");
        let engine = FormatterEngine::default();
        let summary = engine
            .run_paths(std::slice::from_ref(&file), FormatMode::Write)
            .expect("run formatter");
        assert_eq!(summary.files_changed, 1);
        assert_eq!(summary.edits, 2);
        assert_eq!(
            fs::read_to_string(&file).expect("read back"),
            "mov al,  1\nadd ebx, 2\n"
        );
    }

    #[test]
    fn run_paths_with_report_tracks_warnings_and_continues() {
        let file = create_temp_file("run-paths-warnings", "mov  eax,1 ;c\nmov a, b, c\n");
        let engine = FormatterEngine::default();
        let report = engine
            .run_paths_with_report(std::slice::from_ref(&file), FormatMode::Check)
            .expect("run formatter report");
        assert_eq!(report.summary.files_seen, 1);
        assert_eq!(report.summary.files_changed, 1);
        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.summary.files_with_warnings, 1);
        assert_eq!(report.files.len(), 1);
        assert_eq!(report.files[0].rendered, "mov eax, 1 ;c\nmov a, b, c\n");
        assert_eq!(report.files[0].diagnostics[0].line_number, 2);
    }

    #[test]
    fn format_path_to_string_returns_formatted_contents() {
        let file = create_temp_file("path-to-string", "%define X   1   ; one\n");
        let output = FormatterEngine::default()
            .format_path_to_string(&file)
            .expect("format path to string");
        assert_eq!(output, "%define X 1 ; one\n");
    }

    fn source_line() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just("; comment only".to_string()),
            Just("_label:".to_string()),
            "(    |\t)?(mov|add|lock  cmpxchg|rep movsb|jmp) {1,3}(eax|\\[ebx ?\\+ ?4\\]|byte \\[esi\\]|'a;b')?( ?, {0,2}(1|ecx|\\[ebp-8\\]))?( {0,3}; ?[a-z]{0,6})?",
            "(name|x|very_long_name|times 4)? {1,3}(db|dw|dd|dq|equ) {1,2}(0|'x;y', 0|\\$ - msg)( {0,3}; ?[a-z]{0,6})?",
            "%define {1,3}(A|LONGER) {1,3}(1|\"a;b\"|0x7f)( {0,3}; ?[a-z]{0,6})?",
        ]
    }

    proptest! {
        #[test]
        fn second_pass_never_proposes_edits(lines in prop::collection::vec(source_line(), 0..12)) {
            let engine = FormatterEngine::default();
            let mut doc = lines.clone();
            for edit in engine.format_lines(&doc).edits {
                doc[edit.line_index] = edit.text;
            }
            prop_assert!(engine.format_lines(&doc).edits.is_empty());
            prop_assert_eq!(doc.len(), lines.len());
        }
    }

    fn create_temp_file(label: &str, content: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("target")
            .join(format!("test-formatter-{label}-{}-{nanos}", process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("sample.asm");
        fs::write(&path, content).expect("write temp file");
        assert!(Path::new(&path).exists());
        path
    }
}
