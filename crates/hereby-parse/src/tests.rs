use expect_test::{Expect, expect};
use hereby_yellow::SyntaxKind::{self, *};
use hereby_yellow::SyntaxNode;

use crate::{parse_fragment, parse_text};

fn check(text: &str, expect: Expect) {
    let parse = parse_text(text);
    expect.assert_eq(&parse.debug_tree());
}

fn find(root: SyntaxNode<'_>, kind: SyntaxKind) -> SyntaxNode<'_> {
    root.descendants().find(|node| node.kind() == kind).unwrap()
}

fn child_kinds(node: SyntaxNode<'_>) -> Vec<SyntaxKind> {
    node.children().map(SyntaxNode::kind).collect()
}

#[test]
fn ternary_assignment() {
    check(
        "<?php\n$x = $c ? 1 : 2;\n",
        expect![[r#"
            SOURCE_FILE@0..23
              OPEN_TAG@0..5 "<?php"
              EXPR_STMT@6..22
                ASSIGN_EXPR@6..21
                  VARIABLE@6..8
                    VARIABLE_NAME@6..8 "$x"
                  EQ@9..10 "="
                  TERNARY_EXPR@11..21
                    VARIABLE@11..13
                      VARIABLE_NAME@11..13 "$c"
                    QUESTION@14..15 "?"
                    LITERAL@16..17
                      INT_NUMBER@16..17 "1"
                    COLON@18..19 ":"
                    LITERAL@20..21
                      INT_NUMBER@20..21 "2"
                SEMICOLON@21..22 ";"
        "#]],
    );
}

#[test]
fn missing_operand() {
    check(
        "$x = ;",
        expect![[r#"
            SOURCE_FILE@0..6
              EXPR_STMT@0..6
                ASSIGN_EXPR@0..4
                  VARIABLE@0..2
                    VARIABLE_NAME@0..2 "$x"
                  EQ@3..4 "="
                SEMICOLON@5..6 ";"
            Errors:
              5..6 expected expression
        "#]],
    );
}

#[test]
fn concatenation_is_left_associative() {
    let parse = parse_text("<?php $a = \"x\" . f($y) . 'z';");
    assert!(!parse.has_errors(), "{:?}", parse.diagnostics());

    let outer = find(parse.syntax_node(), CONCAT_EXPR);
    assert_eq!(child_kinds(outer), [CONCAT_EXPR, STRING_LITERAL]);
    let inner = outer.children().next().unwrap();
    assert_eq!(child_kinds(inner), [STRING_LITERAL, CALL_EXPR]);
}

#[test]
fn assignment_binds_inside_concatenation() {
    let parse = parse_text("<?php echo \"a\" . $b = f();");
    assert!(!parse.has_errors(), "{:?}", parse.diagnostics());

    let concat = find(parse.syntax_node(), CONCAT_EXPR);
    assert_eq!(child_kinds(concat), [STRING_LITERAL, ASSIGN_EXPR]);
}

#[test]
fn keyword_operators_bind_below_assignment() {
    let parse = parse_text("<?php $a = true and false;");
    let stmt = find(parse.syntax_node(), EXPR_STMT);
    let binary = stmt.children().next().unwrap();
    assert_eq!(binary.kind(), BINARY_EXPR);
    assert_eq!(child_kinds(binary), [ASSIGN_EXPR, NAME_REF]);
}

#[test]
fn precedence_of_concatenation_and_arithmetic() {
    let parse = parse_text("<?php $s = 'n: ' . $a + 1 . '!';");
    let outer = find(parse.syntax_node(), CONCAT_EXPR);
    let inner = outer.children().next().unwrap();
    assert_eq!(child_kinds(inner), [STRING_LITERAL, BINARY_EXPR]);
}

#[test]
fn short_ternary_has_no_true_branch() {
    let parse = parse_text("<?php $a = $b ?: $c;");
    assert!(!parse.has_errors(), "{:?}", parse.diagnostics());
    let ternary = find(parse.syntax_node(), TERNARY_EXPR);
    assert_eq!(child_kinds(ternary), [VARIABLE, VARIABLE]);
}

#[test]
fn postfix_chains() {
    let parse = parse_text("<?php $a->b['c']::D()->e++;");
    assert!(!parse.has_errors(), "{:?}", parse.diagnostics());
    let stmt = find(parse.syntax_node(), EXPR_STMT);
    let postfix = stmt.children().next().unwrap();
    assert_eq!(postfix.kind(), POSTFIX_EXPR);
    assert_eq!(postfix.children().next().unwrap().kind(), MEMBER_EXPR);
}

#[test]
fn statements() {
    let text = r#"<?php
if ($a) { echo 1, 2; } elseif ($b) { return; } else { $c = [1, 'k' => 2]; }
while ($i < 10) $i++;
do { continue; } while (false);
for ($i = 0; $i < 3; $i++) { break; }
foreach ($items as $key => $item) {}
function greet(?string $name, &$out, $n = 1): string { return "Hi $name"; }
$obj = new Foo($x);
;
"#;
    let parse = parse_text(text);
    assert!(!parse.has_errors(), "{:?}", parse.diagnostics());
    assert_eq!(
        child_kinds(parse.syntax_node()),
        [
            IF_STMT,
            WHILE_STMT,
            DO_WHILE_STMT,
            FOR_STMT,
            FOREACH_STMT,
            FUNCTION_DEF,
            EXPR_STMT,
            EMPTY_STMT
        ]
    );

    let if_stmt = find(parse.syntax_node(), IF_STMT);
    assert_eq!(child_kinds(if_stmt), [VARIABLE, BLOCK, ELSEIF_CLAUSE, ELSE_CLAUSE]);
}

#[test]
fn heredoc_is_a_string_literal() {
    let parse = parse_text("<?php\n$a = <<<EOT\nHello $name\nEOT;\n");
    assert!(!parse.has_errors(), "{:?}", parse.diagnostics());
    let literal = find(parse.syntax_node(), STRING_LITERAL);
    assert_eq!(literal.first_token().unwrap().kind(), HEREDOC_STRING);
}

#[test]
fn tree_is_lossless() {
    let sources = [
        "<?php\n// leading\n$x = 1; # trailing\n\n/* tail */\n",
        "<?php $a = 'x' . ",
        "<?php if ($a) { ) $b = ] 2; }",
        "<?php\nfunction f( { echo $x",
        "<?php $s = \"unterminated",
    ];

    for text in sources {
        let parse = parse_text(text);
        assert_eq!(parse.syntax_node().text(), text);
    }
}

#[test]
fn recovery_keeps_going() {
    let parse = parse_text("<?php ) $b = 2;");
    let messages: Vec<_> = parse.diagnostics().iter().map(|it| it.message()).collect();
    assert_eq!(messages, ["expected statement"]);
    assert_eq!(child_kinds(parse.syntax_node()), [ERROR, EXPR_STMT]);
}

#[test]
fn fragments() {
    let parse = parse_fragment("$x = 0;\n$y = f();").unwrap();
    assert_eq!(child_kinds(parse.syntax_node()), [EXPR_STMT, EXPR_STMT]);

    let err = parse_fragment("$x = ;").unwrap_err();
    assert_eq!(err.diagnostics.len(), 1);
    assert_eq!(err.to_string(), "fragment does not parse: expected expression");

    let err = parse_fragment("$x = 1").unwrap_err();
    assert_eq!(err.diagnostics[0].message(), "expected `;`");
    assert_eq!(err.diagnostics[0].range(), text_size::TextRange::empty(6.into()));
}
