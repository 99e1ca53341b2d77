use hereby_yellow::SyntaxKind::{self, *};

use super::{exprs, items};
use crate::parser::Parser;

pub(crate) fn stmt_list(p: &mut Parser<'_>, end: SyntaxKind) {
    while !p.at(end) && !p.at(EOF) {
        let position = p.position();
        stmt(p);
        if p.position() == position {
            p.error_and_bump("expected statement");
        }
    }
}

pub(crate) fn stmt(p: &mut Parser<'_>) {
    match p.peek_kind() {
        LEFT_BRACE => block(p),
        ECHO_KW => echo_stmt(p),
        RETURN_KW => jump_stmt(p, RETURN_STMT),
        BREAK_KW => jump_stmt(p, BREAK_STMT),
        CONTINUE_KW => jump_stmt(p, CONTINUE_STMT),
        IF_KW => if_stmt(p),
        WHILE_KW => while_stmt(p),
        DO_KW => do_while_stmt(p),
        FOR_KW => for_stmt(p),
        FOREACH_KW => foreach_stmt(p),
        FUNCTION_KW => items::function_def(p),
        SEMICOLON => {
            let m = p.start();
            p.advance();
            m.complete(p, EMPTY_STMT);
        }
        OPEN_TAG => p.error_and_bump("unexpected open tag"),
        _ if p.at_set(&exprs::EXPR_FIRST) => expr_stmt(p),
        _ => p.error_and_bump("expected statement"),
    }
}

pub(crate) fn block(p: &mut Parser<'_>) {
    debug_assert_eq!(p.peek_kind(), LEFT_BRACE);

    let m = p.start();
    p.advance();
    stmt_list(p, RIGHT_BRACE);
    p.expect(RIGHT_BRACE);
    m.complete(p, BLOCK);
}

fn expr_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    exprs::expr(p);
    p.expect(SEMICOLON);
    m.complete(p, EXPR_STMT);
}

fn echo_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    exprs::expr(p);
    while p.eat(COMMA) {
        exprs::expr(p);
    }
    p.expect(SEMICOLON);
    m.complete(p, ECHO_STMT);
}

/// `return`, `break` and `continue`, each with an optional operand.
fn jump_stmt(p: &mut Parser<'_>, kind: SyntaxKind) {
    let m = p.start();
    p.advance();
    if !p.at(SEMICOLON) && p.at_set(&exprs::EXPR_FIRST) {
        exprs::expr(p);
    }
    p.expect(SEMICOLON);
    m.complete(p, kind);
}

fn condition(p: &mut Parser<'_>) {
    p.expect(LEFT_PAREN);
    exprs::expr(p);
    p.expect(RIGHT_PAREN);
}

fn body(p: &mut Parser<'_>) {
    if p.at(RIGHT_BRACE) || p.at(EOF) {
        p.error("expected statement");
    } else {
        stmt(p);
    }
}

fn if_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    condition(p);
    body(p);

    while p.at(ELSEIF_KW) {
        let clause = p.start();
        p.advance();
        condition(p);
        body(p);
        clause.complete(p, ELSEIF_CLAUSE);
    }

    if p.at(ELSE_KW) {
        let clause = p.start();
        p.advance();
        body(p);
        clause.complete(p, ELSE_CLAUSE);
    }

    m.complete(p, IF_STMT);
}

fn while_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    condition(p);
    body(p);
    m.complete(p, WHILE_STMT);
}

fn do_while_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    body(p);
    p.expect(WHILE_KW);
    condition(p);
    p.expect(SEMICOLON);
    m.complete(p, DO_WHILE_STMT);
}

fn for_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    p.expect(LEFT_PAREN);
    for terminator in [SEMICOLON, SEMICOLON, RIGHT_PAREN] {
        if !p.at(terminator) {
            exprs::expr(p);
            while p.eat(COMMA) {
                exprs::expr(p);
            }
        }
        p.expect(terminator);
    }
    body(p);
    m.complete(p, FOR_STMT);
}

fn foreach_stmt(p: &mut Parser<'_>) {
    let m = p.start();
    p.advance();
    p.expect(LEFT_PAREN);
    exprs::expr(p);
    p.expect(AS_KW);
    exprs::expr(p);
    if p.eat(FAT_ARROW) {
        exprs::expr(p);
    }
    p.expect(RIGHT_PAREN);
    body(p);
    m.complete(p, FOREACH_STMT);
}
