use hereby_yellow::SyntaxKind::*;
use hereby_yellow::SyntaxNode;
use hereby_yellow::ast::{IndexExpr, MemberExpr, Node as _};

/// Syntactic category of an expression, as far as the rewrites care.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    StringLiteral,
    SimpleVariable,
    MemberOrIndexAccess,
    Assignment,
    Call,
    Ternary,
    Concatenation,
    GenericExpression,
    Loop,
}

pub fn classify(node: SyntaxNode<'_>) -> ExprKind {
    match node.kind() {
        STRING_LITERAL => ExprKind::StringLiteral,
        VARIABLE => ExprKind::SimpleVariable,
        MEMBER_EXPR | INDEX_EXPR if is_interpolatable(node) => ExprKind::MemberOrIndexAccess,
        ASSIGN_EXPR => ExprKind::Assignment,
        CALL_EXPR | NEW_EXPR => ExprKind::Call,
        TERNARY_EXPR => ExprKind::Ternary,
        CONCAT_EXPR => ExprKind::Concatenation,
        WHILE_STMT | DO_WHILE_STMT | FOR_STMT | FOREACH_STMT => ExprKind::Loop,
        _ => ExprKind::GenericExpression,
    }
}

/// Whether evaluating `node` can change state or call user code.
pub(crate) fn has_side_effects(node: SyntaxNode<'_>) -> bool {
    node.descendants().any(|node| match node.kind() {
        CALL_EXPR | NEW_EXPR | ASSIGN_EXPR | POSTFIX_EXPR => true,
        PREFIX_EXPR => node.first_token().is_some_and(|t| matches!(t.text_trimmed(), "++" | "--")),
        _ => false,
    })
}

/// `$a->b[$i]` reads the same inside `{...}`; `$a[f()]` would call `f` out of
/// order and `$a[]` cannot be read at all.
fn is_interpolatable(node: SyntaxNode<'_>) -> bool {
    let empty_dim = node
        .descendants()
        .any(|node| node.kind() == INDEX_EXPR && node.children().nth(1).is_none());
    is_rooted_at_variable(node) && !empty_dim && !has_side_effects(node)
}

/// `$a->b[0]` can be interpolated as `{$a->b[0]}`; `f()->b` cannot.
fn is_rooted_at_variable(node: SyntaxNode<'_>) -> bool {
    let mut current = node;
    loop {
        let base = match current.kind() {
            MEMBER_EXPR => MemberExpr::cast(current).and_then(MemberExpr::base),
            INDEX_EXPR => IndexExpr::cast(current).and_then(IndexExpr::base),
            VARIABLE => return true,
            _ => return false,
        };
        match base {
            Some(base) => current = base,
            None => return false,
        }
    }
}
