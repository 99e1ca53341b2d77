use drop_bomb::DropBomb;
use hereby_errors::Diagnostic;
use hereby_tokenizer::{Token, Tokenizer};
use hereby_yellow::{Builder, SyntaxKind, SyntaxSet};
use text_size::{TextRange, TextSize};

use crate::Parse;

pub(crate) struct Parser<'a> {
    text: &'a str,
    tokenizer: Tokenizer<'a>,
    events: Vec<Event>,
    diagnostics: Vec<Diagnostic>,
    /// End of the last consumed token; missing tokens are reported there.
    last_end: TextSize,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            tokenizer: Tokenizer::new(text),
            events: Vec::new(),
            diagnostics: Vec::new(),
            last_end: TextSize::new(0),
        }
    }

    pub(crate) fn peek_kind(&self) -> SyntaxKind {
        self.tokenizer.peek().kind
    }

    pub(crate) fn peek_range(&self) -> TextRange {
        self.tokenizer.peek().kind_range
    }

    pub(crate) fn peek_text(&self) -> &'a str {
        &self.text[self.peek_range()]
    }

    /// Position used to detect parse loops that stopped making progress.
    pub(crate) fn position(&self) -> TextSize {
        self.peek_range().start()
    }

    pub(crate) fn advance(&mut self) {
        if self.peek_kind() == SyntaxKind::EOF {
            return;
        }

        let token = self.tokenizer.next_token();
        self.last_end = token.kind_range.end();
        self.events.push(Event::Token(token));
    }

    /// Pushes the end-of-file token, which owns any trailing trivia of the file.
    pub(crate) fn eof(&mut self) {
        debug_assert_eq!(self.peek_kind(), SyntaxKind::EOF);
        let token = self.tokenizer.next_token();
        self.events.push(Event::Token(token));
    }

    pub(crate) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek_kind() == kind
    }

    pub(crate) fn at_set(&self, set: &SyntaxSet) -> bool {
        set.contains(self.peek_kind())
    }

    /// The current token is exactly `text`, for contextual operator spellings.
    pub(crate) fn at_text(&self, kind: SyntaxKind, text: &str) -> bool {
        self.at(kind) && self.peek_text().eq_ignore_ascii_case(text)
    }

    pub(crate) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            return true;
        }
        let message = format!("expected {}", kind.describe());
        self.diagnostics.push(Diagnostic::error(message, TextRange::empty(self.last_end)));
        false
    }

    pub(crate) fn start(&mut self) -> Marker {
        let pos = self.events.len() as u32;
        self.events.push(Event::TOMBSTONE);
        Marker::new(pos)
    }

    pub(crate) fn error(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(message, self.peek_range()));
    }

    pub(crate) fn error_and_bump(&mut self, message: &str) {
        let m = self.start();
        self.error(message);
        self.advance();
        m.complete(self, SyntaxKind::ERROR);
    }

    pub(crate) fn error_recover(&mut self, message: &str, recovery: &SyntaxSet) {
        if self.at_set(recovery)
            || matches!(self.peek_kind(), SyntaxKind::RIGHT_BRACE | SyntaxKind::EOF)
        {
            self.error(message);
        } else {
            self.error_and_bump(message);
        }
    }

    pub(crate) fn build_tree(self) -> Parse {
        let Parser { text, mut tokenizer, mut events, mut diagnostics, last_end: _ } = self;
        let mut builder = Builder::new(text);
        let mut forward_parents = Vec::new();

        for i in 0..events.len() {
            match std::mem::replace(&mut events[i], Event::TOMBSTONE) {
                Event::Start { kind, forward_parent } => {
                    if kind == SyntaxKind::TOMBSTONE {
                        continue;
                    }

                    forward_parents.push(kind);
                    let mut idx = i;
                    let mut fp = forward_parent;
                    while let Some(fwd) = fp {
                        idx += fwd as usize;

                        fp = match std::mem::replace(&mut events[idx], Event::TOMBSTONE) {
                            Event::Start { kind, forward_parent } => {
                                if kind != SyntaxKind::TOMBSTONE {
                                    forward_parents.push(kind);
                                }
                                forward_parent
                            }
                            _ => unreachable!(),
                        };
                    }

                    for kind in forward_parents.drain(..).rev() {
                        builder.start_node(kind);
                    }
                }
                Event::Finish => {
                    builder.finish_node();
                }
                Event::Token(Token { leading, kind, kind_range, trailing }) => {
                    builder.token(&leading, kind, kind_range.len(), &trailing);
                }
            }
        }

        let lex_errors = tokenizer.take_errors();
        diagnostics
            .extend(lex_errors.into_iter().map(|it| Diagnostic::error(it.message, it.range)));
        diagnostics.sort_by_key(|it| it.range().start());

        Parse { tree: builder.finish(), diagnostics }
    }
}

enum Event {
    Start { kind: SyntaxKind, forward_parent: Option<u32> },
    Token(Token),
    Finish,
}

impl Event {
    const TOMBSTONE: Self = Event::Start { kind: SyntaxKind::TOMBSTONE, forward_parent: None };
}

pub(crate) struct Marker {
    position: u32,
    bomb: DropBomb,
}

impl Marker {
    fn new(pos: u32) -> Marker {
        Marker {
            position: pos,
            bomb: DropBomb::new("Marker must be completed"),
        }
    }

    pub(crate) fn complete(mut self, p: &mut Parser<'_>, kind: SyntaxKind) -> CompletedMarker {
        self.bomb.defuse();

        match &mut p.events[self.position as usize] {
            Event::Start { kind: slot, .. } => {
                *slot = kind;
            }
            _ => unreachable!(),
        }

        p.events.push(Event::Finish);
        CompletedMarker::new(self.position, kind)
    }
}

#[derive(Clone, Copy)]
pub(crate) struct CompletedMarker {
    pos: u32,
    kind: SyntaxKind,
}

impl CompletedMarker {
    fn new(pos: u32, kind: SyntaxKind) -> Self {
        CompletedMarker { pos, kind }
    }

    pub(crate) fn kind(self) -> SyntaxKind {
        self.kind
    }

    pub(crate) fn precede(self, p: &mut Parser<'_>) -> Marker {
        let new_pos = p.start();

        match &mut p.events[self.pos as usize] {
            Event::Start { forward_parent, .. } => {
                *forward_parent = Some(new_pos.position - self.pos);
            }
            _ => unreachable!(),
        }

        new_pos
    }
}
