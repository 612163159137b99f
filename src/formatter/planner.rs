// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Block segmentation and edit planning for one formatting pass.

use super::classifier::{inspect_line, split_indent, LineKind, LineShape};
use super::document::LineSource;
use super::renderer::render_line;
use super::widths::WidthVector;

/// Whole-line replacement proposed for the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatEdit {
    pub line_index: usize,
    pub text: String,
}

/// One source line, classified once per pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedLine {
    pub original: String,
    pub indent_width: usize,
    pub shape: LineShape,
}

impl AnalyzedLine {
    pub fn kind(&self) -> Option<LineKind> {
        match &self.shape {
            LineShape::Classified(line) => Some(line.kind()),
            _ => None,
        }
    }
}

/// Maximal run of lines sharing one kind and one indentation width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: LineKind,
    pub indent_width: usize,
    /// Half-open line range, including unclassified lines passed over inside it.
    pub start: usize,
    pub end: usize,
    /// Indices of the classified lines that are aligned together.
    pub members: Vec<usize>,
}

/// Column width of leading indentation with tabs advancing to the next tab stop.
pub fn indent_width(indent: &str, tab_size: usize) -> usize {
    let tab_size = tab_size.max(1);
    indent.chars().fold(0usize, |column, ch| match ch {
        '\t' => (column / tab_size)
            .saturating_add(1)
            .saturating_mul(tab_size),
        _ => column.saturating_add(1),
    })
}

pub fn analyze_lines<S: LineSource + ?Sized>(source: &S, tab_size: usize) -> Vec<AnalyzedLine> {
    (0..source.line_count())
        .map(|index| {
            let text = source.line_text(index);
            let (indent, _) = split_indent(text);
            AnalyzedLine {
                original: text.to_string(),
                indent_width: indent_width(indent, tab_size),
                shape: inspect_line(text),
            }
        })
        .collect()
}

pub fn find_blocks(lines: &[AnalyzedLine]) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut scan = 0usize;

    while scan < lines.len() {
        let Some(kind) = lines[scan].kind() else {
            scan += 1;
            continue;
        };
        let indent_width = lines[scan].indent_width;
        let mut members = vec![scan];
        let mut end = scan + 1;

        while end < lines.len() {
            let line = &lines[end];
            match line.kind() {
                None => {}
                Some(next) if next == kind && line.indent_width == indent_width => {
                    members.push(end);
                }
                Some(_) => break,
            }
            end += 1;
        }

        blocks.push(Block {
            kind,
            indent_width,
            start: scan,
            end,
            members,
        });
        scan = end;
    }

    blocks
}

/// Renders every block and keeps the lines whose text changed, in line order.
pub fn plan_edits(lines: &[AnalyzedLine], blocks: &[Block]) -> Vec<FormatEdit> {
    let mut edits = Vec::new();
    for block in blocks {
        let members: Vec<(usize, _)> = block
            .members
            .iter()
            .filter_map(|&index| match &lines[index].shape {
                LineShape::Classified(line) => Some((index, line)),
                _ => None,
            })
            .collect();

        let widths = WidthVector::for_block(
            block.kind,
            members.iter().map(|(_, line)| &line.statement),
        );

        for (index, line) in members {
            let rendered = render_line(line, &widths);
            if rendered != lines[index].original {
                edits.push(FormatEdit {
                    line_index: index,
                    text: rendered,
                });
            }
        }
    }
    edits
}
