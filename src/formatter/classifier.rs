// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Line classification into `%define`, data-label and instruction statements.

use std::fmt::{Display, Formatter};

use super::scanner::{scan_field, ScanStops};

pub const DEFINE_KEYWORD: &str = "%define";
const TIMES_KEYWORD: &str = "times";

/// Structural category shared by every line of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Define,
    Label,
    Instruction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Db,
    Dw,
    Dd,
    Dq,
    Equ,
}

impl Directive {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "db" => Some(Directive::Db),
            "dw" => Some(Directive::Dw),
            "dd" => Some(Directive::Dd),
            "dq" => Some(Directive::Dq),
            "equ" => Some(Directive::Equ),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Directive::Db => "db",
            Directive::Dw => "dw",
            Directive::Dd => "dd",
            Directive::Dq => "dq",
            Directive::Equ => "equ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    Lock,
    Rep,
    Repe,
    Repne,
}

impl Prefix {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "lock" => Some(Prefix::Lock),
            "rep" => Some(Prefix::Rep),
            "repe" => Some(Prefix::Repe),
            "repne" => Some(Prefix::Repne),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Prefix::Lock => "lock",
            Prefix::Rep => "rep",
            Prefix::Repe => "repe",
            Prefix::Repne => "repne",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeQualifier {
    Byte,
    Word,
    Dword,
    Qword,
    Short,
}

impl SizeQualifier {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "byte" => Some(SizeQualifier::Byte),
            "word" => Some(SizeQualifier::Word),
            "dword" => Some(SizeQualifier::Dword),
            "qword" => Some(SizeQualifier::Qword),
            "short" => Some(SizeQualifier::Short),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeQualifier::Byte => "byte",
            SizeQualifier::Word => "word",
            SizeQualifier::Dword => "dword",
            SizeQualifier::Qword => "qword",
            SizeQualifier::Short => "short",
        }
    }
}

/// Mnemonic with its optional prefix, rendered with exactly one space between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mnemonic {
    pub prefix: Option<Prefix>,
    pub base: String,
}

impl Mnemonic {
    pub fn render(&self) -> String {
        match self.prefix {
            Some(prefix) => format!("{} {}", prefix.as_str(), self.base),
            None => self.base.clone(),
        }
    }
}

/// One operand; a size qualifier is kept apart from the operand text so it can be
/// re-joined with a single space.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub size: Option<SizeQualifier>,
    pub text: String,
}

impl Operand {
    pub fn render(&self) -> String {
        match self.size {
            Some(size) => format!("{} {}", size.as_str(), self.text),
            None => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operands {
    None,
    One(Operand),
    Two(Operand, Operand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Define {
        name: String,
        value: String,
    },
    Label {
        name: Option<String>,
        directive: Directive,
        value: String,
    },
    Instruction {
        mnemonic: Mnemonic,
        operands: Operands,
    },
}

impl Statement {
    pub fn kind(&self) -> LineKind {
        match self {
            Statement::Define { .. } => LineKind::Define,
            Statement::Label { .. } => LineKind::Label,
            Statement::Instruction { .. } => LineKind::Instruction,
        }
    }
}

/// A line that matched one of the statement shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub indent: String,
    pub statement: Statement,
    /// Trailing comment starting at its `;`, trailing whitespace removed.
    pub comment: Option<String>,
}

impl ClassifiedLine {
    pub fn kind(&self) -> LineKind {
        self.statement.kind()
    }
}

/// Why a line that looked like an instruction was left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    EmptyOperand,
    DanglingComma,
    TrailingContent(String),
}

impl Display for Rejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::EmptyOperand => write!(f, "empty operand"),
            Rejection::DanglingComma => write!(f, "missing operand after ','"),
            Rejection::TrailingContent(rest) => {
                write!(f, "unexpected content after operands: '{rest}'")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineShape {
    Blank,
    Unrecognized,
    Rejected(Rejection),
    Classified(ClassifiedLine),
}

impl LineShape {
    pub fn into_classified(self) -> Option<ClassifiedLine> {
        match self {
            LineShape::Classified(line) => Some(line),
            _ => None,
        }
    }
}

/// Display width of a field, counted in characters.
pub fn text_width(text: &str) -> usize {
    text.chars().count()
}

/// Splits the leading run of spaces and tabs from the rest of the line.
pub fn split_indent(text: &str) -> (&str, &str) {
    let body = text.trim_start_matches([' ', '\t']);
    text.split_at(text.len() - body.len())
}

pub fn classify_line(text: &str) -> Option<ClassifiedLine> {
    inspect_line(text).into_classified()
}

pub fn inspect_line(text: &str) -> LineShape {
    let (indent, body) = split_indent(text);
    if body.trim().is_empty() {
        return LineShape::Blank;
    }

    let matched = match_define(body)
        .or_else(|| match_label(body))
        .map(Ok)
        .or_else(|| match_instruction(body).transpose());
    match matched {
        Some(Ok((statement, comment))) => LineShape::Classified(ClassifiedLine {
            indent: indent.to_string(),
            statement,
            comment,
        }),
        Some(Err(rejection)) => LineShape::Rejected(rejection),
        None => LineShape::Unrecognized,
    }
}

type Matched = (Statement, Option<String>);

fn match_define(body: &str) -> Option<Matched> {
    let (keyword, rest) = take_token(body)?;
    if keyword != DEFINE_KEYWORD {
        return None;
    }
    let (name, rest) = take_token(rest)?;
    let (value, comment) = take_value(rest)?;
    Some((
        Statement::Define {
            name: name.to_string(),
            value,
        },
        comment,
    ))
}

fn match_label(body: &str) -> Option<Matched> {
    let (first, after_first) = take_token(body)?;

    if first == TIMES_KEYWORD {
        let repeated = take_token(after_first).and_then(|(count, after_count)| {
            let (keyword, rest) = take_token(after_count)?;
            labeled(format!("{TIMES_KEYWORD} {count}"), keyword, rest)
        });
        if repeated.is_some() {
            return repeated;
        }
    }

    if let Some(found) = take_token(after_first)
        .and_then(|(keyword, rest)| labeled(first.to_string(), keyword, rest))
    {
        return Some(found);
    }

    let directive = Directive::parse(first)?;
    let (value, comment) = take_value(after_first)?;
    Some((
        Statement::Label {
            name: None,
            directive,
            value,
        },
        comment,
    ))
}

fn labeled(name: String, keyword: &str, rest: &str) -> Option<Matched> {
    let directive = Directive::parse(keyword)?;
    let (value, comment) = take_value(rest)?;
    Some((
        Statement::Label {
            name: Some(name),
            directive,
            value,
        },
        comment,
    ))
}

fn match_instruction(body: &str) -> Result<Option<Matched>, Rejection> {
    let Some((head, rest)) = take_token(body) else {
        return Ok(None);
    };
    let (mnemonic, rest) = match Prefix::parse(head) {
        Some(prefix) if !rest.is_empty() => match take_token(rest) {
            Some((base, rest)) => (
                Mnemonic {
                    prefix: Some(prefix),
                    base: base.to_string(),
                },
                rest,
            ),
            None => return Ok(None),
        },
        _ => (
            Mnemonic {
                prefix: None,
                base: head.to_string(),
            },
            rest,
        ),
    };

    if !is_mnemonic_token(&mnemonic.base) {
        return Ok(None);
    }

    if rest.is_empty() || rest.starts_with(';') {
        return Ok(Some((
            Statement::Instruction {
                mnemonic,
                operands: Operands::None,
            },
            comment_of(rest),
        )));
    }

    let (first, rest) = read_operand(rest)?;
    let rest = rest.trim_start();
    let (operands, rest) = match rest.strip_prefix(',') {
        Some(after_comma) => {
            let after_comma = after_comma.trim_start();
            if after_comma.is_empty() || after_comma.starts_with(';') {
                return Err(Rejection::DanglingComma);
            }
            let (second, rest) = read_operand(after_comma)?;
            (Operands::Two(first, second), rest.trim_start())
        }
        None => (Operands::One(first), rest),
    };

    if !rest.is_empty() && !rest.starts_with(';') {
        return Err(Rejection::TrailingContent(rest.trim_end().to_string()));
    }

    Ok(Some((
        Statement::Instruction { mnemonic, operands },
        comment_of(rest),
    )))
}

fn is_mnemonic_token(token: &str) -> bool {
    !token.contains(['[', '%', ';'])
        && !token.ends_with(':')
        && Directive::parse(token).is_none()
}

fn read_operand(text: &str) -> Result<(Operand, &str), Rejection> {
    let (size, text) = match take_token(text) {
        Some((token, after)) if !after.is_empty() && !after.starts_with([',', ';']) => {
            match SizeQualifier::parse(token) {
                Some(size) => (Some(size), after),
                None => (None, text),
            }
        }
        _ => (None, text),
    };

    let scan = scan_field(text, ScanStops::OPERAND);
    let operand = scan.field();
    if operand.is_empty() {
        return Err(Rejection::EmptyOperand);
    }
    Ok((
        Operand {
            size,
            text: operand.to_string(),
        },
        scan.rest,
    ))
}

fn take_value(rest: &str) -> Option<(String, Option<String>)> {
    let scan = scan_field(rest, ScanStops::VALUE);
    let value = scan.field();
    if value.is_empty() {
        return None;
    }
    Some((value.to_string(), comment_of(scan.rest)))
}

/// Comment text is kept verbatim, trailing whitespace included.
fn comment_of(rest: &str) -> Option<String> {
    if rest.trim().is_empty() {
        None
    } else {
        Some(rest.trim_start().to_string())
    }
}

/// Next whitespace-delimited token and the remainder with leading whitespace skipped.
fn take_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    Some((&text[..end], text[end..].trim_start()))
}
