// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Column-aligning formatter for NASM-style assembly source.
//!
//! A pass classifies every line once, groups contiguous lines of the same kind
//! and indentation into blocks, folds each block into a width vector and
//! re-renders its lines against it. Only changed lines are reported as edits.

mod classifier;
mod config;
mod diagnostics;
mod document;
mod engine;
mod planner;
mod renderer;
mod scanner;
mod widths;

pub use classifier::{
    classify_line, inspect_line, split_indent, text_width, ClassifiedLine, Directive, LineKind,
    LineShape, Mnemonic, Operand, Operands, Prefix, Rejection, SizeQualifier, Statement,
};
pub use config::{FormatterConfig, FormatterConfigError, CONFIG_FILE_NAME, DEFAULT_TAB_SIZE};
pub use diagnostics::{collect_skipped_line_diagnostics, FormatterDiagnostic};
pub use document::{LineEnding, LineSource, SourceDocument, SourceLine};
pub use engine::{
    FormatMode, FormatPass, FormatterEngine, FormatterFileReport, FormatterOutput,
    FormatterRunReport, FormatterRunSummary,
};
pub use planner::{
    analyze_lines, find_blocks, indent_width, plan_edits, AnalyzedLine, Block, FormatEdit,
};
pub use renderer::render_line;
pub use scanner::{scan_field, ScanResult, ScanStops};
pub use widths::WidthVector;
