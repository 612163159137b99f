// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use super::classifier::LineShape;
use super::planner::AnalyzedLine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterDiagnostic {
    pub line_number: usize,
    pub message: String,
}

/// One warning per line that looked like an instruction but could not be split
/// into fields. Such lines are passed through untouched.
pub fn collect_skipped_line_diagnostics(lines: &[AnalyzedLine]) -> Vec<FormatterDiagnostic> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| match &line.shape {
            LineShape::Rejected(reason) => Some(FormatterDiagnostic {
                line_number: idx + 1,
                message: format!("Formatter left line unaligned: {reason}"),
            }),
            _ => None,
        })
        .collect()
}
