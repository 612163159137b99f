// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

use super::classifier::{text_width, ClassifiedLine, Operands, Statement, DEFINE_KEYWORD};
use super::widths::{slot, WidthVector};

/// Rebuilds `line` with every field starting at the column implied by `widths`.
pub fn render_line(line: &ClassifiedLine, widths: &WidthVector) -> String {
    let widths = if widths.kind() == line.kind() {
        *widths
    } else {
        WidthVector::new(line.kind()).fold(&line.statement)
    };

    let mut code = render_fields(&line.statement, &widths);
    if let Some(comment) = &line.comment {
        pad_to(&mut code, widths.total());
        code.push_str(comment);
    }

    let mut out = String::with_capacity(line.indent.len() + code.len());
    out.push_str(&line.indent);
    out.push_str(&code);
    out
}

fn render_fields(statement: &Statement, widths: &WidthVector) -> String {
    let mut code = String::new();
    match (statement, *widths) {
        (Statement::Define { name, value }, WidthVector::Define { name: name_width, .. }) => {
            code.push_str(DEFINE_KEYWORD);
            code.push(' ');
            let start = code.len();
            code.push_str(name);
            pad_field(&mut code, start, slot(name_width));
            code.push_str(value);
        }
        (
            Statement::Label {
                name,
                directive,
                value,
            },
            WidthVector::Label {
                name: name_width,
                directive: directive_width,
                ..
            },
        ) => {
            let name_width = slot(name_width);
            let directive_width = slot(directive_width);
            match name {
                Some(name) => {
                    code.push_str(name);
                    pad_field(&mut code, 0, name_width);
                    let start = code.len();
                    code.push_str(directive.as_str());
                    pad_field(&mut code, start, directive_width);
                }
                None => {
                    let value_offset = if name_width == 0 {
                        directive_width
                    } else {
                        name_width + 1 + directive_width
                    };
                    code.push_str(directive.as_str());
                    pad_field(&mut code, 0, value_offset);
                }
            }
            code.push_str(value);
        }
        (
            Statement::Instruction {
                mnemonic,
                operands,
            },
            WidthVector::Instruction {
                mnemonic: mnemonic_width,
                pair_first,
                ..
            },
        ) => {
            code.push_str(&mnemonic.render());
            match operands {
                Operands::None => {}
                Operands::One(operand) => {
                    pad_field(&mut code, 0, slot(mnemonic_width));
                    code.push_str(&operand.render());
                }
                Operands::Two(first, second) => {
                    pad_field(&mut code, 0, slot(mnemonic_width));
                    let start = code.len();
                    code.push_str(&first.render());
                    let first_end = code.len();
                    code.push(',');
                    let padding = separator(slot(pair_first), text_width(&code[start..first_end]));
                    code.push_str(&" ".repeat(padding));
                    code.push_str(&second.render());
                }
            }
        }
        _ => unreachable!("width vector kind is matched to the statement above"),
    }
    code
}

/// Pads the field that began at byte `start` so the next field starts
/// `target + 1` columns after it, with at least one space.
fn pad_field(code: &mut String, start: usize, target: usize) {
    let written = text_width(&code[start..]);
    code.push_str(&" ".repeat(separator(target, written)));
}

fn pad_to(code: &mut String, column: usize) {
    pad_field(code, 0, column);
}

fn separator(target: usize, written: usize) -> usize {
    target.saturating_sub(written) + 1
}

#[cfg(test)]
mod tests {
    use super::render_line;
    use crate::formatter::classifier::{classify_line, ClassifiedLine, LineKind};
    use crate::formatter::widths::WidthVector;

    fn render_block(lines: &[&str]) -> Vec<String> {
        let classified: Vec<ClassifiedLine> = lines
            .iter()
            .map(|line| classify_line(line).expect("line should classify"))
            .collect();
        let kind = classified[0].kind();
        let widths = WidthVector::for_block(kind, classified.iter().map(|line| &line.statement));
        classified
            .iter()
            .map(|line| render_line(line, &widths))
            .collect()
    }

    #[test]
    fn defines_align_values_and_comments() {
        assert_eq!(
            render_block(&[
                "%define A 1 ; first",
                "%define LONG_NAME   0x20",
                "%define MSG \"a;b\"   ;  quoted",
            ]),
            vec![
                "%define A         1     ; first",
                "%define LONG_NAME 0x20",
                "%define MSG       \"a;b\" ;  quoted",
            ]
        );
    }

    #[test]
    fn labels_align_directive_and_value_columns() {
        assert_eq!(
            render_block(&[
                "msg db 'hi', 0 ; text",
                "msg_len   equ $ - msg",
                "times 4 dd 0",
            ]),
            vec![
                "msg     db  'hi', 0 ; text",
                "msg_len equ $ - msg",
                "times 4 dd  0",
            ]
        );
    }

    #[test]
    fn unlabeled_directives_do_not_reserve_a_name_column() {
        assert_eq!(
            render_block(&["    dq 0x1234  ; comment", "    dd 7 ; seven"]),
            vec!["    dq 0x1234 ; comment", "    dd 7      ; seven"]
        );
    }

    #[test]
    fn unlabeled_directive_value_lines_up_with_labeled_values() {
        assert_eq!(
            render_block(&["value dw 1", "dw 2"]),
            vec!["value dw 1", "dw       2"]
        );
    }

    #[test]
    fn instructions_align_mnemonic_and_operand_columns() {
        assert_eq!(
            render_block(&["mov  al,1", "add   ebx, 2"]),
            vec!["mov al,  1", "add ebx, 2"]
        );
    }

    #[test]
    fn mixed_arity_block_uses_separate_operand_slots() {
        assert_eq!(
            render_block(&[
                "inc eax ; one",
                "mov eax, ebx ; two",
                "push dword [esp+4]",
                "ret ; none",
            ]),
            vec![
                "inc  eax           ; one",
                "mov  eax, ebx      ; two",
                "push dword [esp+4]",
                "ret                ; none",
            ]
        );
    }

    #[test]
    fn prefix_and_size_qualifier_are_single_spaced() {
        assert_eq!(
            render_block(&["lock   xadd  dword    [ecx], eax", "rep    stosb"]),
            vec!["lock xadd dword [ecx], eax", "rep stosb"]
        );
    }

    #[test]
    fn overlong_field_still_gets_one_separating_space() {
        let line = classify_line("mov verylongoperand, 1").expect("classify");
        let widths = WidthVector::new(LineKind::Instruction);
        assert_eq!(render_line(&line, &widths), "mov verylongoperand, 1");
    }

    #[test]
    fn aligned_lines_render_unchanged() {
        let lines = ["\tmov  eax, 1 ; a", "\tinc  ecx    ; b", "\tpush ebx"];
        let rendered = render_block(&lines);
        assert_eq!(rendered, lines);
    }
}
