//! Turns a format call into the pieces of a heredoc rewrite.

use std::sync::LazyLock;

use hereby_tokenizer::{is_ident_continue, is_ident_start};
use hereby_yellow::ast::{AssignExpr, Node as _, StringLiteral};
use hereby_yellow::{SyntaxKind, SyntaxNode};
use regex::{Captures, Regex};
use rustc_hash::FxHashSet;

use crate::classify::{ExprKind, classify};
use crate::{AssistError, literal};

pub const HEREDOC_DELIMITER: &str = "HEREDOC_DELIMITER";

static SPECIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"%[%sdf]").unwrap());
static ANY_SPECIFIER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)%.?").unwrap());
static INTERPOLATED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_\x{80}-\x{10FFFF}][\w\x{80}-\x{10FFFF}]*)").unwrap());

/// A statement that must run before the anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hoist {
    /// Variable the statement assigns.
    pub name: String,
    pub text: String,
}

/// One `%s` of the template and the text it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    pub text: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub slots: Vec<Slot>,
    pub hoists: Vec<Hoist>,
}

/// Hands out variable names that no other variable in the file uses.
#[derive(Debug, Default)]
pub struct NameAllocator {
    taken: FxHashSet<String>,
}

impl NameAllocator {
    pub fn new(root: SyntaxNode<'_>) -> Self {
        let mut taken = FxHashSet::default();
        for token in root.descendant_tokens() {
            match token.kind() {
                SyntaxKind::VARIABLE_NAME => {
                    taken.insert(token.text_trimmed().trim_start_matches('$').to_owned());
                }
                SyntaxKind::DOUBLE_QUOTED_STRING | SyntaxKind::HEREDOC_STRING => {
                    taken.extend(
                        INTERPOLATED.captures_iter(token.text_trimmed()).map(|it| it[1].to_owned()),
                    );
                }
                _ => {}
            }
        }
        Self { taken }
    }

    pub fn fresh(&mut self, base: &str) -> String {
        let mut name = base.to_owned();
        let mut n = 2;
        while !self.taken.insert(name.clone()) {
            name = format!("{base}_{n}");
            n += 1;
        }
        name
    }
}

/// Removes the surrounding quotes and unescapes the quote character.
pub fn strip_quotes(literal: &str) -> Result<String, AssistError> {
    let mut chars = literal.chars();
    let quote = match (chars.next(), chars.next_back()) {
        (Some(first @ ('"' | '\'')), Some(last)) if first == last => first,
        _ => {
            return Err(AssistError::MalformedLiteral(format!(
                "`{literal}` is not enclosed in matching quotes"
            )));
        }
    };

    let inner = &literal[1..literal.len() - 1];
    if quote == '"' {
        Ok(literal::double_quoted_to_heredoc(inner))
    } else {
        Ok(literal::escape_heredoc(&literal::decode_single_quoted(inner)))
    }
}

/// Rewrites `%d` and `%f` to `%s`; `%%` is kept as one unit.
pub fn normalize_specifiers(format: &str) -> String {
    SPECIFIER
        .replace_all(format, |caps: &Captures<'_>| if &caps[0] == "%%" { "%%" } else { "%s" })
        .into_owned()
}

pub fn count_placeholders(format: &str) -> usize {
    ANY_SPECIFIER.find_iter(format).filter(|it| it.as_str() == "%s").count()
}

/// Resolves every operand, in order, to the text its placeholder becomes.
pub fn resolve_operands(
    operands: &[SyntaxNode<'_>],
    names: &mut NameAllocator,
) -> Result<Resolution, AssistError> {
    let mut resolution = Resolution::default();

    for (index, &operand) in operands.iter().enumerate() {
        let ordinal = index + 1;
        let kind = classify(operand);
        let text = match kind {
            ExprKind::StringLiteral => {
                let literal = StringLiteral::cast(operand).ok_or(AssistError::ClassifierGap(kind))?;
                literal::heredoc_content(literal)?
            }
            ExprKind::SimpleVariable | ExprKind::MemberOrIndexAccess => {
                format!("{{{}}}", operand.text_trimmed())
            }
            ExprKind::Assignment => match assignment_target(operand) {
                Some(target) => {
                    let target = target.text_trimmed();
                    resolution.hoists.push(Hoist {
                        name: target.to_owned(),
                        text: format!("{};", operand.text_trimmed()),
                    });
                    format!("{{{target}}}")
                }
                None => hoist(&mut resolution, names, "newVarPhpExpression", ordinal, operand),
            },
            ExprKind::Call => hoist(&mut resolution, names, "newVarFnCall", ordinal, operand),
            ExprKind::Ternary | ExprKind::Concatenation | ExprKind::GenericExpression => {
                hoist(&mut resolution, names, "newVarPhpExpression", ordinal, operand)
            }
            ExprKind::Loop => return Err(AssistError::ClassifierGap(kind)),
        };
        resolution.slots.push(Slot { index, text });
    }

    Ok(resolution)
}

fn assignment_target(node: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    let target = AssignExpr::cast(node)?.lhs()?;
    matches!(classify(target), ExprKind::SimpleVariable | ExprKind::MemberOrIndexAccess)
        .then_some(target)
}

fn hoist(
    resolution: &mut Resolution,
    names: &mut NameAllocator,
    prefix: &str,
    ordinal: usize,
    operand: SyntaxNode<'_>,
) -> String {
    let name = names.fresh(&format!("{prefix}{ordinal}"));
    resolution
        .hoists
        .push(Hoist { name: name.clone(), text: format!("${name} = {};", operand.text_trimmed()) });
    format!("{{${name}}}")
}

/// Replaces `%%` by `%` and each `%s` by the next value.
pub fn substitute<'v>(
    format: &str,
    values: impl IntoIterator<Item = &'v str>,
) -> Result<String, AssistError> {
    let mut values = values.into_iter();
    let mut out = String::with_capacity(format.len());
    let mut last = 0;

    for specifier in ANY_SPECIFIER.find_iter(format) {
        push_guarded(&mut out, &format[last..specifier.start()]);
        match specifier.as_str() {
            "%%" => push_guarded(&mut out, "%"),
            "%s" => {
                let value = values.next().ok_or_else(|| {
                    AssistError::CollaboratorFailure("more placeholders than operands".to_owned())
                })?;
                push_guarded(&mut out, value);
            }
            other => {
                return Err(AssistError::CollaboratorFailure(format!(
                    "unsupported format specifier `{other}`"
                )));
            }
        }
        last = specifier.end();
    }
    push_guarded(&mut out, &format[last..]);

    if values.next().is_some() {
        return Err(AssistError::CollaboratorFailure(
            "more operands than placeholders".to_owned(),
        ));
    }
    Ok(out)
}

pub fn heredoc(content: &str) -> Result<String, AssistError> {
    let closes = |line: &str| {
        line.trim_start_matches([' ', '\t'])
            .strip_prefix(HEREDOC_DELIMITER)
            .is_some_and(|rest| !rest.starts_with(is_ident_continue))
    };
    if content.split('\n').any(closes) {
        return Err(AssistError::MalformedLiteral(format!(
            "content has a line starting with `{HEREDOC_DELIMITER}`"
        )));
    }
    Ok(format!("<<<{HEREDOC_DELIMITER}\n{content}\n{HEREDOC_DELIMITER}"))
}

/// Appends `piece` so that neither side changes how the other interpolates.
pub(crate) fn push_guarded(out: &mut String, piece: &str) {
    if let Some(first) = piece.chars().next() {
        guard_boundary(out, first, piece);
    }
    out.push_str(piece);
}

fn guard_boundary(out: &mut String, first: char, piece: &str) {
    let len = out.len();

    // `$` + `{$a}` would read as `${$a}`.
    if out.ends_with('$') && !is_escaped(out, len - 1) && (is_ident_start(first) || first == '{') {
        out.insert(len - 1, '\\');
        return;
    }

    // `{` + `$a` would read as `{$a`.
    if out.ends_with('{') && first == '$' {
        out.truncate(len - 1);
        out.push_str("\\x7b");
        return;
    }

    let extends = is_ident_continue(first)
        || first == '['
        || piece.starts_with("->")
        || piece.starts_with("?->");
    if extends && let Some(start) = trailing_interpolation(out) {
        out.insert(start, '{');
        out.push('}');
    }
}

/// Start of a trailing `$name` or `$name->prop` that the next text could extend.
fn trailing_interpolation(text: &str) -> Option<usize> {
    let name_start = |end: usize| {
        let start = text[..end].trim_end_matches(is_ident_continue).len();
        let valid = start < end
            && text[start..].starts_with(is_ident_start)
            && start > 0
            && text.as_bytes()[start - 1] == b'$'
            && !is_escaped(text, start - 1);
        valid.then(|| start - 1)
    };

    let property = text.len() - text.trim_end_matches(is_ident_continue).len();
    if property > 0 {
        let before = &text[..text.len() - property];
        let arrow = before.strip_suffix("?->").or_else(|| before.strip_suffix("->"));
        if let Some(object) = arrow.and_then(|rest| name_start(rest.len())) {
            return Some(object);
        }
    }
    name_start(text.len())
}

fn is_escaped(text: &str, index: usize) -> bool {
    let run = text[..index].len() - text[..index].trim_end_matches('\\').len();
    run % 2 == 1
}
