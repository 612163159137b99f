// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Quote, escape and bracket aware field walk shared by every line classifier.

/// Characters that end a field when seen outside quotes and brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanStops {
    pub comma: bool,
    pub brackets: bool,
}

impl ScanStops {
    /// `%define` and data-directive values: only a comment ends the value.
    pub const VALUE: Self = Self {
        comma: false,
        brackets: false,
    };

    /// Instruction operands: a comma or comment ends the operand, unless it sits
    /// inside a `[...]` memory reference.
    pub const OPERAND: Self = Self {
        comma: true,
        brackets: true,
    };
}

/// Outcome of a single field walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanResult<'a> {
    /// Text walked over, untrimmed.
    pub raw: &'a str,
    /// Remainder starting at the stop character (or empty at end of line).
    pub rest: &'a str,
}

impl<'a> ScanResult<'a> {
    pub fn field(&self) -> &'a str {
        self.raw.trim()
    }

    pub fn stopped_at(&self) -> Option<char> {
        self.rest.chars().next()
    }
}

#[derive(Debug, Default)]
struct ScanState {
    escaped: bool,
    quote: Option<char>,
    depth: usize,
}

impl ScanState {
    /// Feeds one character and reports whether it terminates the field.
    fn step(&mut self, ch: char, stops: ScanStops) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        match ch {
            '\\' => self.escaped = true,
            '`' | '\'' | '"' => match self.quote {
                None => self.quote = Some(ch),
                Some(open) if open == ch => self.quote = None,
                Some(_) => {}
            },
            _ if self.quote.is_some() => {}
            '[' if stops.brackets => self.depth += 1,
            ']' if stops.brackets => self.depth = self.depth.saturating_sub(1),
            _ if self.depth > 0 => {}
            ';' => return true,
            ',' if stops.comma => return true,
            _ => {}
        }
        false
    }
}

/// Walks `text` until an unquoted, unescaped, unbracketed stop character.
pub fn scan_field(text: &str, stops: ScanStops) -> ScanResult<'_> {
    let mut state = ScanState::default();
    for (idx, ch) in text.char_indices() {
        if state.step(ch, stops) {
            return ScanResult {
                raw: &text[..idx],
                rest: &text[idx..],
            };
        }
    }
    ScanResult {
        raw: text,
        rest: "",
    }
}
