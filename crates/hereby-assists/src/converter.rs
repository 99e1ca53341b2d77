use std::fmt;

use hereby_parse::{Parse, parse_fragment};
use hereby_yellow::SyntaxKind::*;
use hereby_yellow::SyntaxNode;
use hereby_yellow::ast::{CallExpr, ConcatExpr, ExprStmt, Node as _, ParenExpr, StringLiteral};
use tracing::debug;

use crate::synthesize::push_guarded;
use crate::{AssistError, literal};

/// Builds a format call equivalent to a concatenation.
pub trait FormatConverter: fmt::Debug + Send + Sync {
    fn is_applicable(&self, concat: ConcatExpr<'_>) -> bool;

    fn convert(&self, concat: ConcatExpr<'_>) -> Result<FormatCall, AssistError>;
}

/// A parsed `name("<format>", operands...)` call, detached from the file.
#[derive(Debug)]
pub struct FormatCall {
    parse: Parse,
}

impl FormatCall {
    /// Parses `text` as a single call statement whose first argument is a
    /// string literal.
    pub fn new(text: &str) -> Result<Self, AssistError> {
        let call = Self { parse: parse_fragment(text)? };
        match call.arguments().first() {
            Some(format) if format.kind() == STRING_LITERAL => Ok(call),
            _ => Err(AssistError::CollaboratorFailure(format!(
                "`{text}` is not a call with a format string"
            ))),
        }
    }

    pub fn call(&self) -> Option<CallExpr<'_>> {
        let stmt = ExprStmt::cast(self.parse.syntax_node().children().next()?)?;
        CallExpr::cast(stmt.expr()?)
    }

    fn arguments(&self) -> Vec<SyntaxNode<'_>> {
        let args = self.call().and_then(CallExpr::arg_list);
        args.map(|args| args.args().collect()).unwrap_or_default()
    }

    /// Source text of the format string, quotes included.
    pub fn format_string(&self) -> &str {
        self.arguments().first().map_or("", |it| it.text_trimmed())
    }

    pub fn operands(&self) -> Vec<SyntaxNode<'_>> {
        self.arguments().into_iter().skip(1).collect()
    }
}

/// Leaf operands of a concatenation chain, left to right.
pub fn flatten(concat: ConcatExpr<'_>) -> Vec<SyntaxNode<'_>> {
    fn collect<'a>(node: SyntaxNode<'a>, operands: &mut Vec<SyntaxNode<'a>>) {
        match node.kind() {
            CONCAT_EXPR => node.children().for_each(|child| collect(child, operands)),
            PAREN_EXPR => match ParenExpr::cast(node).and_then(ParenExpr::expr) {
                Some(inner) if inner.kind() == CONCAT_EXPR => collect(inner, operands),
                _ => operands.push(node),
            },
            _ => operands.push(node),
        }
    }

    let mut operands = Vec::new();
    collect(concat.syntax(), &mut operands);
    operands
}

/// Folds literals into one double quoted `sprintf` format and passes every
/// other operand as an argument.
#[derive(Debug, Default, Clone, Copy)]
pub struct SprintfConverter;

impl FormatConverter for SprintfConverter {
    fn is_applicable(&self, concat: ConcatExpr<'_>) -> bool {
        flatten(concat).iter().any(|operand| operand.kind() != STRING_LITERAL)
    }

    fn convert(&self, concat: ConcatExpr<'_>) -> Result<FormatCall, AssistError> {
        let mut base = String::new();
        let mut args = String::new();

        for operand in flatten(concat) {
            match StringLiteral::cast(operand) {
                Some(literal) => {
                    let content = literal::double_quoted_content(literal)?;
                    push_guarded(&mut base, &content.replace('%', "%%"));
                }
                None => {
                    base.push_str("%s");
                    args.push_str(", ");
                    args.push_str(operand.text_trimmed());
                }
            }
        }

        debug!(%base, "folded concatenation");
        FormatCall::new(&format!("sprintf(\"{base}\"{args});"))
    }
}
