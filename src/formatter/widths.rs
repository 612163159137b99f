// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Per-block column widths.
//!
//! Every slot starts unset and is widened, never narrowed, as lines are folded
//! in. The comment column is derived from the slots on demand.

use super::classifier::{text_width, LineKind, Operands, Statement, DEFINE_KEYWORD};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthVector {
    Define {
        name: Option<usize>,
        value: Option<usize>,
    },
    Label {
        name: Option<usize>,
        directive: Option<usize>,
        value: Option<usize>,
    },
    Instruction {
        mnemonic: Option<usize>,
        /// Operand of one-operand lines.
        single: Option<usize>,
        /// First operand of two-operand lines.
        pair_first: Option<usize>,
        /// Second operand of two-operand lines.
        pair_second: Option<usize>,
    },
}

impl WidthVector {
    pub fn new(kind: LineKind) -> Self {
        match kind {
            LineKind::Define => WidthVector::Define {
                name: None,
                value: None,
            },
            LineKind::Label => WidthVector::Label {
                name: None,
                directive: None,
                value: None,
            },
            LineKind::Instruction => WidthVector::Instruction {
                mnemonic: None,
                single: None,
                pair_first: None,
                pair_second: None,
            },
        }
    }

    pub fn kind(&self) -> LineKind {
        match self {
            WidthVector::Define { .. } => LineKind::Define,
            WidthVector::Label { .. } => LineKind::Label,
            WidthVector::Instruction { .. } => LineKind::Instruction,
        }
    }

    /// Folds all statements of a block, starting from unset slots.
    pub fn for_block<'a, I>(kind: LineKind, statements: I) -> Self
    where
        I: IntoIterator<Item = &'a Statement>,
    {
        statements
            .into_iter()
            .fold(Self::new(kind), |widths, statement| widths.fold(statement))
    }

    /// Widens the slots that `statement` populates. Statements of another kind
    /// leave the vector untouched.
    pub fn fold(self, statement: &Statement) -> Self {
        match (self, statement) {
            (WidthVector::Define { name, value }, Statement::Define { name: n, value: v }) => {
                WidthVector::Define {
                    name: widen(name, text_width(n)),
                    value: widen(value, text_width(v)),
                }
            }
            (
                WidthVector::Label {
                    name,
                    directive,
                    value,
                },
                Statement::Label {
                    name: n,
                    directive: d,
                    value: v,
                },
            ) => WidthVector::Label {
                name: widen(name, n.as_deref().map_or(0, text_width)),
                directive: widen(directive, d.as_str().len()),
                value: widen(value, text_width(v)),
            },
            (
                WidthVector::Instruction {
                    mnemonic,
                    single,
                    pair_first,
                    pair_second,
                },
                Statement::Instruction {
                    mnemonic: m,
                    operands,
                },
            ) => {
                let mnemonic = widen(mnemonic, text_width(&m.render()));
                match operands {
                    Operands::None => WidthVector::Instruction {
                        mnemonic,
                        single,
                        pair_first,
                        pair_second,
                    },
                    Operands::One(operand) => WidthVector::Instruction {
                        mnemonic,
                        single: widen(single, text_width(&operand.render())),
                        pair_first,
                        pair_second,
                    },
                    Operands::Two(first, second) => WidthVector::Instruction {
                        mnemonic,
                        single,
                        pair_first: widen(pair_first, text_width(&first.render())),
                        pair_second: widen(pair_second, text_width(&second.render())),
                    },
                }
            }
            (unchanged, _) => unchanged,
        }
    }

    /// Column, relative to the indentation, at which trailing comments are padded to.
    pub fn total(&self) -> usize {
        match *self {
            WidthVector::Define { name, value } => {
                DEFINE_KEYWORD.len() + 1 + slot(name) + 1 + slot(value)
            }
            WidthVector::Label {
                name,
                directive,
                value,
            } => {
                let name = slot(name);
                let name_column = if name == 0 { 0 } else { name + 1 };
                name_column + slot(directive) + 1 + slot(value)
            }
            WidthVector::Instruction {
                mnemonic,
                single,
                pair_first,
                pair_second,
            } => {
                let mnemonic = slot(mnemonic);
                let one = mnemonic + separated(single, 1);
                let two = mnemonic + separated(pair_first, 1) + separated(pair_second, 2);
                one.max(two)
            }
        }
    }
}

/// Width of a slot, treating unset as zero.
pub fn slot(width: Option<usize>) -> usize {
    width.unwrap_or(0)
}

fn separated(width: Option<usize>, separator: usize) -> usize {
    match width {
        Some(width) if width > 0 => separator + width,
        _ => 0,
    }
}

fn widen(current: Option<usize>, observed: usize) -> Option<usize> {
    Some(current.map_or(observed, |width| width.max(observed)))
}
