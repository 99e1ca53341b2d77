use hereby_yellow::SyntaxKind::{self, *};
use hereby_yellow::SyntaxSet;

use super::{delimited, member_name};
use crate::parser::{CompletedMarker, Parser};

pub(crate) const EXPR_FIRST: SyntaxSet = SyntaxSet::new([
    VARIABLE_NAME,
    NAME,
    INT_NUMBER,
    FLOAT_NUMBER,
    SINGLE_QUOTED_STRING,
    DOUBLE_QUOTED_STRING,
    HEREDOC_STRING,
    NOWDOC_STRING,
    LEFT_PAREN,
    LEFT_BRACKET,
    NEW_KW,
    OPERATOR,
]);

/// Tokens a failed primary expression leaves for the caller to consume.
const EXPR_RECOVERY: SyntaxSet =
    SyntaxSet::new([SEMICOLON, RIGHT_PAREN, RIGHT_BRACE, RIGHT_BRACKET, COMMA, EOF]);

const PREFIX_OPERATORS: [&str; 8] = ["!", "-", "+", "~", "@", "&", "++", "--"];

/// Right-hand side of an assignment: everything binding tighter than `and`.
const ASSIGN_RHS_BP: u8 = 7;
const TERNARY_BP: u8 = 7;
const PREFIX_BP: u8 = 33;

pub(crate) fn expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    expr_bp(p, 0)
}

fn expr_bp(p: &mut Parser<'_>, min_bp: u8) -> Option<CompletedMarker> {
    let mut lhs = unary_expr(p)?;

    loop {
        // An assignable left side always takes the assignment, whatever binds it.
        if matches!(p.peek_kind(), EQ | ASSIGN_OP) && is_assignable(lhs.kind()) {
            let m = lhs.precede(p);
            p.advance();
            expr_bp(p, ASSIGN_RHS_BP);
            lhs = m.complete(p, ASSIGN_EXPR);
            continue;
        }

        if p.at(QUESTION) {
            if TERNARY_BP < min_bp {
                break;
            }

            let m = lhs.precede(p);
            p.advance();
            if !p.at(COLON) {
                expr_bp(p, 0);
            }
            p.expect(COLON);
            expr_bp(p, TERNARY_BP + 1);
            lhs = m.complete(p, TERNARY_EXPR);
            continue;
        }

        let Some((l_bp, r_bp, kind)) = infix_binding_power(p) else {
            break;
        };
        if l_bp < min_bp {
            break;
        }

        let m = lhs.precede(p);
        p.advance();
        expr_bp(p, r_bp);
        lhs = m.complete(p, kind);
    }

    Some(lhs)
}

fn is_assignable(kind: SyntaxKind) -> bool {
    matches!(kind, VARIABLE | INDEX_EXPR | MEMBER_EXPR | STATIC_EXPR | ARRAY_EXPR)
}

fn infix_binding_power(p: &Parser<'_>) -> Option<(u8, u8, SyntaxKind)> {
    let bp = match p.peek_kind() {
        DOT => return Some((25, 26, CONCAT_EXPR)),
        OPERATOR => match p.peek_text().to_ascii_lowercase().as_str() {
            "or" => (1, 2),
            "xor" => (3, 4),
            "and" => (5, 6),
            "??" => (9, 9),
            "||" => (11, 12),
            "&&" => (13, 14),
            "|" => (15, 16),
            "^" => (17, 18),
            "&" => (19, 20),
            "==" | "!=" | "===" | "!==" | "<>" | "<=>" => (21, 22),
            "<" | ">" | "<=" | ">=" => (23, 24),
            "<<" | ">>" => (27, 28),
            "+" | "-" => (29, 30),
            "*" | "/" | "%" => (31, 32),
            "**" => (34, 34),
            _ => return None,
        },
        _ => return None,
    };
    Some((bp.0, bp.1, BINARY_EXPR))
}

fn unary_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    if p.at(OPERATOR) && PREFIX_OPERATORS.contains(&p.peek_text()) {
        let m = p.start();
        p.advance();
        expr_bp(p, PREFIX_BP);
        return Some(m.complete(p, PREFIX_EXPR));
    }

    postfix_expr(p)
}

fn postfix_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let mut lhs = primary_expr(p)?;

    loop {
        lhs = match p.peek_kind() {
            LEFT_PAREN => {
                let m = lhs.precede(p);
                arg_list(p);
                m.complete(p, CALL_EXPR)
            }
            LEFT_BRACKET => {
                let m = lhs.precede(p);
                p.advance();
                if !p.at(RIGHT_BRACKET) {
                    expr(p);
                }
                p.expect(RIGHT_BRACKET);
                m.complete(p, INDEX_EXPR)
            }
            ARROW => {
                let m = lhs.precede(p);
                p.advance();
                member_name(p);
                m.complete(p, MEMBER_EXPR)
            }
            DOUBLE_COLON => {
                let m = lhs.precede(p);
                p.advance();
                member_name(p);
                m.complete(p, STATIC_EXPR)
            }
            OPERATOR if matches!(p.peek_text(), "++" | "--") => {
                let m = lhs.precede(p);
                p.advance();
                m.complete(p, POSTFIX_EXPR)
            }
            _ => break,
        };
    }

    Some(lhs)
}

pub(crate) fn arg_list(p: &mut Parser<'_>) {
    let m = p.start();
    delimited(p, LEFT_PAREN, RIGHT_PAREN, COMMA, "expected argument", &EXPR_FIRST, |p| {
        p.at_set(&EXPR_FIRST) && expr(p).is_some()
    });
    m.complete(p, ARG_LIST);
}

fn primary_expr(p: &mut Parser<'_>) -> Option<CompletedMarker> {
    let kind = match p.peek_kind() {
        VARIABLE_NAME => VARIABLE,
        NAME => NAME_REF,
        INT_NUMBER | FLOAT_NUMBER => LITERAL,
        kind if kind.is_string() => STRING_LITERAL,
        LEFT_PAREN => return Some(paren_expr(p)),
        LEFT_BRACKET => return Some(array_expr(p)),
        NEW_KW => return Some(new_expr(p)),
        _ => {
            if p.at_set(&EXPR_RECOVERY) {
                p.error("expected expression");
            } else {
                p.error_and_bump("expected expression");
            }
            return None;
        }
    };

    let m = p.start();
    p.advance();
    Some(m.complete(p, kind))
}

fn paren_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    expr(p);
    p.expect(RIGHT_PAREN);
    m.complete(p, PAREN_EXPR)
}

fn array_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    delimited(p, LEFT_BRACKET, RIGHT_BRACKET, COMMA, "expected array item", &EXPR_FIRST, |p| {
        if !p.at_set(&EXPR_FIRST) {
            return false;
        }
        let item = p.start();
        expr(p);
        if p.eat(FAT_ARROW) {
            expr(p);
        }
        item.complete(p, ARRAY_ITEM);
        true
    });
    m.complete(p, ARRAY_EXPR)
}

fn new_expr(p: &mut Parser<'_>) -> CompletedMarker {
    let m = p.start();
    p.advance();
    match p.peek_kind() {
        NAME => {
            let name = p.start();
            p.advance();
            name.complete(p, NAME_REF);
        }
        VARIABLE_NAME => {
            let name = p.start();
            p.advance();
            name.complete(p, VARIABLE);
        }
        _ => p.error("expected class name"),
    }
    if p.at(LEFT_PAREN) {
        arg_list(p);
    }
    m.complete(p, NEW_EXPR)
}
