//! `$x = $c ? $a : $b;` to `$x; if ($c) { $x = $a; } else { $x = $b; }`.

use hereby_parse::parse_fragment;
use hereby_yellow::SyntaxKind::*;
use hereby_yellow::ast::{AssignExpr, BinaryExpr, ExprStmt, Node as _, TernaryExpr};
use hereby_yellow::{SyntaxNode, SyntaxToken};
use text_size::TextRange;
use tracing::debug;

use super::{mismatch, unparenthesize};
use crate::classify::{ExprKind, classify, has_side_effects};
use crate::splice::Splicer;
use crate::synthesize::Hoist;
use crate::{AssistContext, AssistError, SourceChange};

struct TernaryAssignment<'a> {
    stmt: SyntaxNode<'a>,
    ternary: TernaryExpr<'a>,
    lhs: SyntaxNode<'a>,
    op: SyntaxToken<'a>,
    condition: SyntaxNode<'a>,
    true_branch: SyntaxNode<'a>,
    false_branch: SyntaxNode<'a>,
}

impl TernaryAssignment<'_> {
    /// `$x = ...` can be split into a declaration and an assignment.
    fn is_declaration(&self) -> bool {
        self.op.kind() == EQ
            && self.lhs.kind() == VARIABLE
            && self.stmt.parent().is_some_and(|parent| matches!(parent.kind(), BLOCK | SOURCE_FILE))
    }

    fn assignment(&self, value: SyntaxNode<'_>) -> String {
        let keyword_op = BinaryExpr::cast(value)
            .and_then(BinaryExpr::op)
            .map(|op| op.text_trimmed().to_ascii_lowercase())
            .is_some_and(|op| matches!(op.as_str(), "and" | "or" | "xor"));
        let value = if keyword_op {
            format!("({})", value.text_trimmed())
        } else {
            value.text_trimmed().to_owned()
        };
        format!("{} {} {value};", self.lhs.text_trimmed(), self.op.text_trimmed())
    }
}

fn locate<'a>(ctx: &AssistContext<'a>) -> Result<TernaryAssignment<'a>, AssistError> {
    let ternary = ctx.ancestors().find_map(TernaryExpr::cast).ok_or(AssistError::NotApplicable)?;
    let (Some(condition), Some(true_branch), Some(false_branch)) =
        (ternary.condition(), ternary.true_branch(), ternary.false_branch())
    else {
        return Err(mismatch("ternary is missing a branch"));
    };

    let stmt = ternary
        .syntax()
        .ancestors()
        .find(|node| node.kind().is_statement() && classify(*node) != ExprKind::Loop)
        .ok_or_else(|| mismatch("ternary is not inside a statement"))?;

    let assign = ExprStmt::cast(stmt)
        .and_then(ExprStmt::expr)
        .and_then(AssignExpr::cast)
        .filter(|assign| assign.rhs().map(unparenthesize) == Some(ternary.syntax()))
        .ok_or_else(|| mismatch("ternary is not the right-hand side of an assignment statement"))?;
    let (Some(lhs), Some(op)) = (assign.lhs(), assign.op()) else {
        return Err(mismatch("assignment is incomplete"));
    };

    if has_side_effects(lhs) {
        return Err(mismatch("assignment target would be evaluated after the condition"));
    }
    // `??=` only evaluates the ternary when the target is null.
    if op.text_trimmed() == "??=" {
        return Err(mismatch("`??=` evaluates the ternary conditionally"));
    }

    Ok(TernaryAssignment { stmt, ternary, lhs, op, condition, true_branch, false_branch })
}

pub(super) fn target(ctx: &AssistContext<'_>) -> Option<TextRange> {
    locate(ctx).ok().map(|it| it.ternary.syntax().trimmed_range())
}

pub(super) fn apply(ctx: &AssistContext<'_>) -> Result<SourceChange, AssistError> {
    let found = locate(ctx)?;

    let text = format!(
        "if ({}) {{ {} }} else {{ {} }}",
        unparenthesize(found.condition).text_trimmed(),
        found.assignment(found.true_branch),
        found.assignment(found.false_branch),
    );
    parse_fragment(&text)?;

    let mut splicer = Splicer::new(found.stmt);
    if found.is_declaration() {
        let name = found.lhs.text_trimmed();
        let declaration = match &ctx.config().split_placeholder {
            Some(placeholder) => format!("{name} = {placeholder};"),
            None => format!("{name};"),
        };
        parse_fragment(&declaration)?;
        debug!(%declaration, "splitting declaration");
        splicer.insert_before(&[Hoist { name: name.to_owned(), text: declaration }]);
    }
    splicer.replace(found.stmt.trimmed_range(), text);
    splicer.finish()
}

#[cfg(test)]
mod tests {
    use crate::tests::{check_assist, check_assist_with, check_failure, check_not_applicable};
    use crate::{AssistConfig, AssistError, AssistId};

    const ID: AssistId = AssistId::TernaryToIfElse;

    #[test]
    fn declaration_is_split() {
        check_assist(
            ID,
            "<?php\n$x = $c$0ond ? 1 : 2;\n",
            "<?php\n$x;\nif ($cond) { $x = 1; } else { $x = 2; }\n",
        );
    }

    #[test]
    fn keeps_indentation() {
        check_assist(
            ID,
            r#"<?php
function pick($cond) {
    $x = $cond ?$0 'a' : "b";
    return $x;
}
"#,
            r#"<?php
function pick($cond) {
    $x;
    if ($cond) { $x = 'a'; } else { $x = "b"; }
    return $x;
}
"#,
        );
    }

    #[test]
    fn configured_placeholder() {
        let config =
            AssistConfig { split_placeholder: Some("null".to_owned()), ..AssistConfig::default() };
        check_assist_with(
            &config,
            ID,
            "<?php $x = $c ? f() : $0g();",
            "<?php $x = null; if ($c) { $x = f(); } else { $x = g(); }",
        );
    }

    #[test]
    fn compound_operator_is_not_split() {
        check_assist(
            ID,
            "<?php $s .= $c ? 'a' :$0 'b'; // tail",
            "<?php if ($c) { $s .= 'a'; } else { $s .= 'b'; } // tail",
        );
    }

    #[test]
    fn property_and_index_targets_are_not_split() {
        check_assist(
            ID,
            "<?php $o->p['k'] = $c ? 1 $0: 2;",
            "<?php if ($c) { $o->p['k'] = 1; } else { $o->p['k'] = 2; }",
        );
    }

    #[test]
    fn parentheses_are_dropped() {
        check_assist(
            ID,
            "<?php $x = (($a > 1) ? $0$b : $c);",
            "<?php $x; if ($a > 1) { $x = $b; } else { $x = $c; }",
        );
    }

    #[test]
    fn keyword_operators_stay_grouped() {
        check_assist(
            ID,
            "<?php $x = $c ? $a or $b : $0 2;",
            "<?php $x; if ($c) { $x = ($a or $b); } else { $x = 2; }",
        );
    }

    #[test]
    fn braceless_body_is_replaced_in_place() {
        check_assist(
            ID,
            "<?php if ($a) $x = $c ? 1 : 2$0; else $y = 3;",
            "<?php if ($a) if ($c) { $x = 1; } else { $x = 2; } else $y = 3;",
        );
    }

    #[test]
    fn nested_ternary_in_false_branch() {
        check_assist(
            ID,
            "<?php $x = $a ?$0 1 : ($b ? 2 : 3);",
            "<?php $x; if ($a) { $x = 1; } else { $x = ($b ? 2 : 3); }",
        );
    }

    #[test]
    fn null_coalescing_assignment_is_kept() {
        let fixture = "<?php $x ??= f() ? 1 :$0 2;";
        check_not_applicable(ID, fixture);
        let error = check_failure(ID, fixture);
        assert!(matches!(error, AssistError::StructuralMismatch(_)), "{error:?}");
    }

    #[test]
    fn not_applicable() {
        check_not_applicable(ID, "<?php $x = $a ?$0: $b;");
        check_not_applicable(ID, "<?php f($c ? 1 : $02);");
        check_not_applicable(ID, "<?php echo $c ? 1 $0: 2;");
        check_not_applicable(ID, "<?php $x = 1 + ($c ? 1 : $02);");
        check_not_applicable(ID, "<?php $a[f()] = $c ? 1 : $02;");
        check_not_applicable(ID, "<?php while ($c ? $0$a : $b) {}");
        check_not_applicable(ID, "<?php $y = $0 1; $x = $c ? 1 : 2;");
    }
}
