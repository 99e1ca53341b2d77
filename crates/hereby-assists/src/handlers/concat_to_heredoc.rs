//! `"Hello " . $name . "!"` to a heredoc reading `Hello {$name}!`.

use hereby_parse::parse_fragment;
use hereby_yellow::SyntaxKind::*;
use hereby_yellow::SyntaxNode;
use hereby_yellow::ast::{AssignExpr, BinaryExpr, ConcatExpr, EchoStmt, Node as _, TernaryExpr};
use text_size::TextRange;
use tracing::debug;

use super::{anchor_statement, mismatch};
use crate::splice::Splicer;
use crate::synthesize::{
    NameAllocator, count_placeholders, heredoc, normalize_specifiers, resolve_operands,
    strip_quotes, substitute,
};
use crate::{AssistContext, AssistError, SourceChange};

/// The outermost chain around the cursor, including chains that hold it as
/// a call argument.
fn topmost_concat<'a>(ctx: &AssistContext<'a>) -> Option<ConcatExpr<'a>> {
    ctx.ancestors().filter(|node| node.kind() == CONCAT_EXPR).last().and_then(ConcatExpr::cast)
}

pub(super) fn target(ctx: &AssistContext<'_>) -> Option<TextRange> {
    if let Some(concat) = topmost_concat(ctx)
        && ctx.config().converter.is_applicable(concat)
    {
        return Some(concat.syntax().trimmed_range());
    }

    let echo = ctx.ancestors().find_map(EchoStmt::cast)?;
    (echo.args().count() >= 2).then(|| echo.syntax().trimmed_range())
}

pub(super) fn apply(ctx: &AssistContext<'_>) -> Result<SourceChange, AssistError> {
    let concat = topmost_concat(ctx).ok_or(AssistError::NotApplicable)?;
    let converter = &ctx.config().converter;
    if !converter.is_applicable(concat) {
        return Err(AssistError::NotApplicable);
    }
    let anchor = anchor_statement(concat.syntax())
        .ok_or_else(|| mismatch("concatenation is not inside a statement"))?;

    let call = converter.convert(concat)?;
    let format = normalize_specifiers(&strip_quotes(call.format_string())?);
    let operands = call.operands();
    let placeholders = count_placeholders(&format);
    if placeholders != operands.len() {
        return Err(AssistError::CollaboratorFailure(format!(
            "{placeholders} placeholders for {} operands",
            operands.len()
        )));
    }

    let mut names = NameAllocator::new(ctx.root());
    let resolution = resolve_operands(&operands, &mut names).map_err(|error| match error {
        AssistError::ClassifierGap(kind) => {
            mismatch(format!("{kind:?} operand cannot be interpolated"))
        }
        error => error,
    })?;
    if !resolution.hoists.is_empty()
        && let Some(position) = conditional_position(concat.syntax(), anchor)
    {
        return Err(mismatch(format!("cannot hoist out of {position}")));
    }

    let content = substitute(&format, resolution.slots.iter().map(|slot| slot.text.as_str()))?;
    let heredoc = heredoc(&content)?;
    parse_fragment(&format!("echo {heredoc};"))?;
    for hoist in &resolution.hoists {
        parse_fragment(&hoist.text)?;
    }
    debug!(hoists = resolution.hoists.len(), "built heredoc");

    let mut splicer = Splicer::new(anchor);
    splicer.insert_before(&resolution.hoists);
    splicer.replace(concat.syntax().trimmed_range(), heredoc);
    splicer.finish()
}

/// Describes the first position between `node` and `anchor` that may not
/// evaluate `node` exactly once, right before `anchor`.
fn conditional_position(node: SyntaxNode<'_>, anchor: SyntaxNode<'_>) -> Option<&'static str> {
    let mut child = node;
    for parent in node.ancestors().skip(1) {
        let position = match parent.kind() {
            TERNARY_EXPR => {
                let condition = TernaryExpr::cast(parent).and_then(TernaryExpr::condition);
                (condition != Some(child)).then_some("a ternary branch")
            }
            BINARY_EXPR => {
                let binary = BinaryExpr::cast(parent);
                let short_circuit = binary.and_then(BinaryExpr::op).is_some_and(|op| {
                    matches!(
                        op.text_trimmed().to_ascii_lowercase().as_str(),
                        "&&" | "||" | "??" | "and" | "or"
                    )
                });
                (short_circuit && binary.and_then(BinaryExpr::rhs) == Some(child))
                    .then_some("a short-circuit operand")
            }
            ASSIGN_EXPR => {
                let assign = AssignExpr::cast(parent);
                let coalesce =
                    assign.and_then(AssignExpr::op).is_some_and(|op| op.text_trimmed() == "??=");
                (coalesce && assign.and_then(AssignExpr::rhs) == Some(child))
                    .then_some("a `??=` operand")
            }
            ELSEIF_CLAUSE => Some("an `elseif` clause"),
            ELSE_CLAUSE => Some("an `else` clause"),
            WHILE_STMT | DO_WHILE_STMT | FOR_STMT | FOREACH_STMT => Some("a loop"),
            IF_STMT => child.kind().is_statement().then_some("a braceless body"),
            FUNCTION_DEF | PARAM_LIST | PARAM => Some("a parameter default"),
            _ => None,
        };
        if position.is_some() || parent == anchor {
            return position;
        }
        child = parent;
    }
    None
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use hereby_yellow::ast::ConcatExpr;

    use crate::tests::{check_assist, check_assist_with, check_failure, check_not_applicable};
    use crate::{AssistConfig, AssistError, AssistId, FormatCall, FormatConverter};

    const ID: AssistId = AssistId::ConcatToHeredoc;

    #[test]
    fn variables_are_interpolated() {
        check_assist(
            ID,
            "<?php\n$greeting = \"Hello \" .$0 $name . \"!\";\n",
            "<?php\n$greeting = <<<HEREDOC_DELIMITER\nHello {$name}!\nHEREDOC_DELIMITER;\n",
        );
    }

    #[test]
    fn calls_are_hoisted() {
        check_assist(
            ID,
            "<?php\n$msg = \"Value: \" . getV$0alue();\n",
            "<?php\n$newVarFnCall1 = getValue();\n$msg = <<<HEREDOC_DELIMITER\nValue: {$newVarFnCall1}\nHEREDOC_DELIMITER;\n",
        );
    }

    #[test]
    fn percent_signs_stay_literal() {
        check_assist(
            ID,
            "<?php $s = \"100% done: \" . $0$n;",
            "<?php $s = <<<HEREDOC_DELIMITER\n100% done: {$n}\nHEREDOC_DELIMITER;",
        );
        check_assist(
            ID,
            "<?php $s = '100%% done: ' . $0$n;",
            "<?php $s = <<<HEREDOC_DELIMITER\n100%% done: {$n}\nHEREDOC_DELIMITER;",
        );
    }

    #[test]
    fn complex_fixture() {
        let before = r#"<?php
/**
 * this file has a string concatenations with:
 * - variables
 * - custom function calls
 * - \n line-breaks
 * - HTML tags (<br />)
 */
$very = 'VERY';
$array = ['a' => 5, 'b'=>'10', 'c'=>true, 'd'=>'😊'];
function existingFunction(): string {
    return 'existingFunction';
}
function existingFunctionWithParameter(int $num): string {
    return "existingFunction $num";
}

$someVar = 'This '
    . "could be $very \n"
    . ' '$0
    . 'complicated'
    . print_r($array, true)
    . '<br /> Non-existing function:'
    . nonExistingFunction()
    . '<br /> Existing function:'
    . existingFunction()
    . '<br /> Existing function with parameter (123):'
    . existingFunctionWithParameter(123);
"#;
        let after = r#"<?php
/**
 * this file has a string concatenations with:
 * - variables
 * - custom function calls
 * - \n line-breaks
 * - HTML tags (<br />)
 */
$very = 'VERY';
$array = ['a' => 5, 'b'=>'10', 'c'=>true, 'd'=>'😊'];
function existingFunction(): string {
    return 'existingFunction';
}
function existingFunctionWithParameter(int $num): string {
    return "existingFunction $num";
}

$newVarFnCall1 = print_r($array, true);
$newVarFnCall2 = nonExistingFunction();
$newVarFnCall3 = existingFunction();
$newVarFnCall4 = existingFunctionWithParameter(123);
$someVar = <<<HEREDOC_DELIMITER
This could be $very \n complicated{$newVarFnCall1}<br /> Non-existing function:{$newVarFnCall2}<br /> Existing function:{$newVarFnCall3}<br /> Existing function with parameter (123):{$newVarFnCall4}
HEREDOC_DELIMITER;
"#;
        check_assist(ID, before, after);
    }

    #[test]
    fn escapes_keep_their_meaning() {
        check_assist(
            ID,
            r#"<?php
$v = '$0' . $existing
    . 'necessary: \'BLA\' '
    . "necessary: \"BLA\" "
    . "I \'escape\' "
    . 'I \"escape\" '
    . 'backslashes: \\\'BLA\\\' \n '
    . "backslashes: \\\"BLA\\\" "
    . 'dollar \$bla '
    . "dollar \$bla";
"#,
            r#"<?php
$v = <<<HEREDOC_DELIMITER
{$existing}necessary: 'BLA' necessary: "BLA" I \'escape\' I \\"escape\\" backslashes: \\'BLA\\' \\n backslashes: \\"BLA\\" dollar \\\$bla dollar \$bla
HEREDOC_DELIMITER;
"#,
        );
    }

    #[test]
    fn hoists_keep_operand_order_and_indentation() {
        check_assist(
            ID,
            r#"<?php
function render($user) {
    echo 'Name: '$0 . $user->name . ', ' . ($a + 1) . ', ' . f() . ' tags: ' . $n = count($user->tags);
}
"#,
            r#"<?php
function render($user) {
    $newVarPhpExpression2 = ($a + 1);
    $newVarFnCall3 = f();
    $n = count($user->tags);
    echo <<<HEREDOC_DELIMITER
Name: {$user->name}, {$newVarPhpExpression2}, {$newVarFnCall3} tags: {$n}
HEREDOC_DELIMITER;
}
"#,
        );
    }

    #[test]
    fn chain_inside_call_argument_converts_the_outer_chain() {
        check_assist(
            ID,
            "<?php $s = 'a' . f('b' . $0$c);",
            "<?php $newVarFnCall1 = f('b' . $c); $s = <<<HEREDOC_DELIMITER\na{$newVarFnCall1}\nHEREDOC_DELIMITER;",
        );
    }

    #[test]
    fn accesses_with_effects_are_hoisted() {
        check_assist(
            ID,
            "<?php $s = $a[g()] . '-' . $0f();",
            "<?php $newVarPhpExpression1 = $a[g()]; $newVarFnCall2 = f(); $s = <<<HEREDOC_DELIMITER\n{$newVarPhpExpression1}-{$newVarFnCall2}\nHEREDOC_DELIMITER;",
        );
        check_assist(
            ID,
            "<?php $s = 'x' . $0$a[] = 5;",
            "<?php $newVarPhpExpression1 = $a[] = 5; $s = <<<HEREDOC_DELIMITER\nx{$newVarPhpExpression1}\nHEREDOC_DELIMITER;",
        );
        check_assist(
            ID,
            "<?php $s = 'x' . $0$a[f()] = 5;",
            "<?php $newVarPhpExpression1 = $a[f()] = 5; $s = <<<HEREDOC_DELIMITER\nx{$newVarPhpExpression1}\nHEREDOC_DELIMITER;",
        );
    }

    #[test]
    fn existing_names_are_not_reused() {
        check_assist(
            ID,
            "<?php $newVarFnCall1 = 0; $s = 'x' . $0f() . g();",
            "<?php $newVarFnCall1 = 0; $newVarFnCall1_2 = f(); $newVarFnCall2 = g(); $s = <<<HEREDOC_DELIMITER\nx{$newVarFnCall1_2}{$newVarFnCall2}\nHEREDOC_DELIMITER;",
        );
    }

    #[test]
    fn interpolation_boundaries_are_guarded() {
        check_assist(
            ID,
            "<?php $s = \"$a\" . 'b' . \"{\" . \"$c\" . \"$\" . $0$d;",
            "<?php $s = <<<HEREDOC_DELIMITER\n{$a}b\\x7b$c\\${$d}\nHEREDOC_DELIMITER;",
        );
    }

    #[test]
    fn conditional_operands_are_not_hoisted() {
        for text in [
            "<?php $x = $a ? 'v: ' . $0f() : '';",
            "<?php $x = $a && 'v: ' . $0f();",
            "<?php $x ??= 'v: ' . $0f();",
            "<?php if ($a) {} elseif ('v: ' . $0f()) {}",
            "<?php while ('v: ' . $0f()) {}",
            "<?php if ($a) echo 'v: ' . $0f();",
            "<?php function g($p = 'v: ' . $0F) {}",
        ] {
            assert!(
                matches!(check_failure(ID, text), AssistError::StructuralMismatch(_)),
                "{text}"
            );
        }
    }

    #[test]
    fn conditional_operands_without_hoists() {
        check_assist(
            ID,
            "<?php $x = $a ?: 'v: ' . $0$b;",
            "<?php $x = $a ?: <<<HEREDOC_DELIMITER\nv: {$b}\nHEREDOC_DELIMITER;",
        );
        check_assist(
            ID,
            "<?php if ($a) { echo 'v: ' . $0f(); }",
            "<?php if ($a) { $newVarFnCall1 = f(); echo <<<HEREDOC_DELIMITER\nv: {$newVarFnCall1}\nHEREDOC_DELIMITER; }",
        );
    }

    #[test]
    fn delimiter_in_content() {
        let error = check_failure(ID, "<?php $s = \"HEREDOC_DELIMITER\\n\" . $0$x;");
        assert!(matches!(error, AssistError::MalformedLiteral(_)), "{error:?}");
    }

    #[test]
    fn echo_arguments_are_only_available() {
        let text = "<?php echo 'a'$0, $b;";
        crate::tests::check_available(ID, text);
        assert!(matches!(check_failure(ID, text), AssistError::NotApplicable));
    }

    #[test]
    fn not_applicable() {
        check_not_applicable(ID, "<?php $s = 'a' .$0 \"b\";");
        check_not_applicable(ID, "<?php $s = $0$a + 1;");
        check_not_applicable(ID, "<?php echo $0$a;");
    }

    #[derive(Debug)]
    struct Fixed(&'static str);

    impl FormatConverter for Fixed {
        fn is_applicable(&self, _: ConcatExpr<'_>) -> bool {
            true
        }

        fn convert(&self, _: ConcatExpr<'_>) -> Result<FormatCall, AssistError> {
            FormatCall::new(self.0)
        }
    }

    fn fixed(text: &'static str) -> AssistConfig {
        AssistConfig { converter: Arc::new(Fixed(text)), ..AssistConfig::default() }
    }

    #[test]
    fn custom_converter() {
        check_assist_with(
            &fixed(r#"format('%d: %s %%', "n\$", $b);"#),
            ID,
            "<?php $s = $0$a . $b;",
            "<?php $s = <<<HEREDOC_DELIMITER\nn\\$: {$b} %\nHEREDOC_DELIMITER;",
        );
        check_assist_with(
            &fixed(r"sprintf('cost $x\n%s', $b);"),
            ID,
            "<?php $s = $0$a . $b;",
            "<?php $s = <<<HEREDOC_DELIMITER\ncost \\$x\\\\n{$b}\nHEREDOC_DELIMITER;",
        );
    }

    #[test]
    fn converter_failures() {
        let text = "<?php $s = $0$a . $b;";

        let error = check_failure_with(&fixed(r#"sprintf("%s %s", $a);"#), text);
        assert!(matches!(error, AssistError::CollaboratorFailure(_)), "{error:?}");

        let error = check_failure_with(&fixed("sprintf(\"%s\", $a, $b);"), text);
        assert!(matches!(error, AssistError::CollaboratorFailure(_)), "{error:?}");

        let error = check_failure_with(&fixed("sprintf(<<<X\n%s\nX, $a);"), text);
        assert!(matches!(error, AssistError::MalformedLiteral(_)), "{error:?}");

        let error = check_failure_with(&fixed("sprintf(\"%x\", $a);"), text);
        assert!(matches!(error, AssistError::CollaboratorFailure(_)), "{error:?}");
    }

    fn check_failure_with(config: &AssistConfig, text: &str) -> AssistError {
        crate::tests::check_failure_with(config, ID, text)
    }

    #[test]
    fn default_converter_is_sprintf() {
        let config = AssistConfig::default();
        assert_eq!(format!("{:?}", config.converter), "SprintfConverter");
    }
}
