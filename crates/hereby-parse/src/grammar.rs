use hereby_yellow::SyntaxKind::{self, *};
use hereby_yellow::SyntaxSet;

use crate::parser::Parser;

mod exprs;
pub(crate) mod items;
mod stmts;

pub(crate) fn delimited(
    p: &mut Parser<'_>,
    bra: SyntaxKind,
    ket: SyntaxKind,
    delim: SyntaxKind,
    unexpected_delim_message: &'static str,
    first_set: &SyntaxSet,
    mut parser: impl FnMut(&mut Parser<'_>) -> bool,
) {
    debug_assert_eq!(p.peek_kind(), bra);
    p.advance();

    while !p.at(ket) && !p.at(EOF) {
        if p.at(delim) {
            let m = p.start();
            p.error(unexpected_delim_message);
            p.advance();
            m.complete(p, ERROR);
            continue;
        }

        if !parser(p) {
            break;
        }

        if !p.eat(delim) {
            if first_set.contains(p.peek_kind()) {
                p.expect(delim);
            } else {
                break;
            }
        }
    }

    p.expect(ket);
}

/// Member and class names accept keywords, as in `$query->new` or `Foo::class`.
pub(crate) fn member_name(p: &mut Parser<'_>) {
    match p.peek_kind() {
        NAME => p.advance(),
        kind if kind.is_keyword() => p.advance(),
        VARIABLE_NAME => {
            let m = p.start();
            p.advance();
            m.complete(p, VARIABLE);
        }
        LEFT_BRACE => {
            p.advance();
            exprs::expr(p);
            p.expect(RIGHT_BRACE);
        }
        _ => p.error("expected member name"),
    }
}
