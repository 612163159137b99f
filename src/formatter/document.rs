// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Host document boundary: line access in, whole-line replacements out.

use super::planner::FormatEdit;

/// Read-only view of a host document, one line per index, without terminators.
pub trait LineSource {
    fn line_count(&self) -> usize;
    fn line_text(&self, index: usize) -> &str;
}

impl<T: AsRef<str>> LineSource for [T] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_text(&self, index: usize) -> &str {
        self[index].as_ref()
    }
}

impl<T: AsRef<str>, const N: usize> LineSource for [T; N] {
    fn line_count(&self) -> usize {
        N
    }

    fn line_text(&self, index: usize) -> &str {
        self[index].as_ref()
    }
}

impl<T: AsRef<str>> LineSource for Vec<T> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line_text(&self, index: usize) -> &str {
        self[index].as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    None,
    Lf,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub text: String,
    pub line_ending: LineEnding,
}

impl SourceLine {
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.text.len() + 2);
        out.push_str(&self.text);
        out.push_str(self.line_ending.as_str());
        out
    }
}

/// Line-ending preserving split of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceDocument {
    pub lines: Vec<SourceLine>,
}

impl SourceDocument {
    pub fn parse(source: &str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0usize;
        let bytes = source.as_bytes();

        while start < bytes.len() {
            let mut end = start;
            while end < bytes.len() && bytes[end] != b'\n' {
                end += 1;
            }

            let (text, line_ending, next_start) = if end < bytes.len() {
                if end > start && bytes[end - 1] == b'\r' {
                    (&source[start..end - 1], LineEnding::Crlf, end + 1)
                } else {
                    (&source[start..end], LineEnding::Lf, end + 1)
                }
            } else {
                (&source[start..end], LineEnding::None, end)
            };

            lines.push(SourceLine {
                text: text.to_string(),
                line_ending,
            });
            start = next_start;
        }

        Self { lines }
    }

    pub fn render(&self) -> String {
        let total_len: usize = self
            .lines
            .iter()
            .map(|line| line.text.len() + line.line_ending.as_str().len())
            .sum();
        let mut out = String::with_capacity(total_len);
        for line in &self.lines {
            out.push_str(&line.text);
            out.push_str(line.line_ending.as_str());
        }
        out
    }

    /// Replaces whole lines; indices past the end are ignored.
    pub fn apply_edits(&mut self, edits: &[FormatEdit]) -> usize {
        let mut applied = 0usize;
        for edit in edits {
            if let Some(line) = self.lines.get_mut(edit.line_index) {
                line.text.clone_from(&edit.text);
                applied += 1;
            }
        }
        applied
    }

    pub fn normalize_line_endings(&mut self) {
        for line in &mut self.lines {
            if line.line_ending == LineEnding::Crlf {
                line.line_ending = LineEnding::Lf;
            }
        }
    }
}

impl LineSource for SourceDocument {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_text(&self, index: usize) -> &str {
        &self.lines[index].text
    }
}

#[cfg(test)]
mod tests {
    use super::{LineEnding, LineSource, SourceDocument};
    use crate::formatter::planner::FormatEdit;

    #[test]
    fn parse_round_trips_mixed_line_endings() {
        let source = "\t  mov\teax,1  ; c1\r\n  ; only comment\t\n\t\t\r\nlast";
        let doc = SourceDocument::parse(source);
        assert_eq!(doc.lines.len(), 4);
        assert_eq!(doc.lines[0].line_ending, LineEnding::Crlf);
        assert_eq!(doc.lines[1].line_ending, LineEnding::Lf);
        assert_eq!(doc.lines[2].line_ending, LineEnding::Crlf);
        assert_eq!(doc.lines[3].line_ending, LineEnding::None);
        assert_eq!(doc.lines[0].text, "\t  mov\teax,1  ; c1");
        assert_eq!(doc.render(), source);
    }

    #[test]
    fn parse_handles_empty_and_blank_lines() {
        let doc = SourceDocument::parse("\n   \n");
        assert_eq!(doc.line_count(), 2);
        assert_eq!(doc.line_text(0), "");
        assert_eq!(doc.line_text(1), "   ");
        assert_eq!(doc.render(), "\n   \n");
        assert_eq!(SourceDocument::parse("").line_count(), 0);
    }

    #[test]
    fn apply_edits_replaces_whole_lines_and_skips_out_of_range() {
        let mut doc = SourceDocument::parse("mov  al,1\r\nret\r\n");
        let applied = doc.apply_edits(&[
            FormatEdit {
                line_index: 0,
                text: "mov al, 1".to_string(),
            },
            FormatEdit {
                line_index: 7,
                text: "ignored".to_string(),
            },
        ]);
        assert_eq!(applied, 1);
        assert_eq!(doc.render(), "mov al, 1\r\nret\r\n");
    }

    #[test]
    fn normalize_line_endings_rewrites_crlf_only() {
        let mut doc = SourceDocument::parse("a\r\nb\nc");
        doc.normalize_line_endings();
        assert_eq!(doc.render(), "a\nb\nc");
    }

    #[test]
    fn slices_vectors_and_arrays_are_line_sources() {
        let owned = vec!["a".to_string(), "b".to_string()];
        assert_eq!(owned.line_count(), 2);
        assert_eq!(owned.as_slice().line_text(1), "b");
        let array = ["x", "y", "z"];
        assert_eq!(LineSource::line_count(&array), 3);
    }
}
