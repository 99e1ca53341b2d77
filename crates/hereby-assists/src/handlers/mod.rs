use hereby_yellow::SyntaxKind::*;
use hereby_yellow::SyntaxNode;
use hereby_yellow::ast::{Node as _, ParenExpr};
use text_size::TextRange;

use crate::{AssistContext, AssistError, AssistId, SourceChange};

mod concat_to_heredoc;
mod ternary_to_if_else;

pub(crate) fn target(id: AssistId, ctx: &AssistContext<'_>) -> Option<TextRange> {
    match id {
        AssistId::TernaryToIfElse => ternary_to_if_else::target(ctx),
        AssistId::ConcatToHeredoc => concat_to_heredoc::target(ctx),
    }
}

pub(crate) fn apply(id: AssistId, ctx: &AssistContext<'_>) -> Result<SourceChange, AssistError> {
    match id {
        AssistId::TernaryToIfElse => ternary_to_if_else::apply(ctx),
        AssistId::ConcatToHeredoc => concat_to_heredoc::apply(ctx),
    }
}

fn mismatch(message: impl Into<String>) -> AssistError {
    AssistError::StructuralMismatch(message.into())
}

/// Innermost statement that sits directly in a block, where new statements
/// can be inserted in front of it.
fn anchor_statement(node: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    node.ancestors().find(|node| {
        node.kind().is_statement()
            && node.parent().is_some_and(|parent| matches!(parent.kind(), BLOCK | SOURCE_FILE))
    })
}

fn unparenthesize(mut node: SyntaxNode<'_>) -> SyntaxNode<'_> {
    while let Some(inner) = ParenExpr::cast(node).and_then(ParenExpr::expr) {
        node = inner;
    }
    node
}
