use hereby_yellow::SyntaxKind::*;
use hereby_yellow::SyntaxSet;

use super::{delimited, exprs, stmts};
use crate::parser::Parser;

const PARAM_FIRST: SyntaxSet = SyntaxSet::new([NAME, QUESTION, VARIABLE_NAME, OPERATOR]);

pub(crate) fn source_file(p: &mut Parser<'_>) {
    let m = p.start();
    p.eat(OPEN_TAG);
    stmts::stmt_list(p, EOF);
    p.eof();
    m.complete(p, SOURCE_FILE);
}

/// A fragment is a statement list without the open tag.
pub(crate) fn fragment(p: &mut Parser<'_>) {
    let m = p.start();
    stmts::stmt_list(p, EOF);
    p.eof();
    m.complete(p, SOURCE_FILE);
}

pub(crate) fn function_def(p: &mut Parser<'_>) {
    debug_assert_eq!(p.peek_kind(), FUNCTION_KW);

    let m = p.start();
    p.advance();
    if p.at_text(OPERATOR, "&") {
        p.advance();
    }

    if !p.eat(NAME) {
        p.error_recover("expected function name", &SyntaxSet::new([LEFT_PAREN, LEFT_BRACE]));
    }

    if p.at(LEFT_PAREN) {
        param_list(p);
    } else {
        p.error("expected function parameters");
    }

    if p.eat(COLON) {
        type_ref(p);
    }

    if p.at(LEFT_BRACE) {
        stmts::block(p);
    } else {
        p.error("expected function body");
    }

    m.complete(p, FUNCTION_DEF);
}

fn param_list(p: &mut Parser<'_>) {
    let m = p.start();
    delimited(p, LEFT_PAREN, RIGHT_PAREN, COMMA, "expected parameter", &PARAM_FIRST, param);
    m.complete(p, PARAM_LIST);
}

fn param(p: &mut Parser<'_>) -> bool {
    if !p.at_set(&PARAM_FIRST) {
        return false;
    }

    let m = p.start();
    if p.at(NAME) || p.at(QUESTION) {
        type_ref(p);
    }
    if p.at_text(OPERATOR, "&") {
        p.advance();
    }
    p.expect(VARIABLE_NAME);
    if p.eat(EQ) {
        exprs::expr(p);
    }
    m.complete(p, PARAM);
    true
}

fn type_ref(p: &mut Parser<'_>) {
    let m = p.start();
    p.eat(QUESTION);
    p.expect(NAME);
    while p.at_text(OPERATOR, "|") {
        p.advance();
        p.expect(NAME);
    }
    m.complete(p, TYPE_REF);
}
