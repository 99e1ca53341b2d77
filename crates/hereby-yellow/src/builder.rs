//! Incremental builder for the immutable syntax tree.

use text_size::{TextRange, TextSize};

use crate::nodes::{Child, Node, Token, TreeInner};
use crate::{SyntaxKind, SyntaxTree, TriviaPiece};

struct Opened {
    node: u32,
    children: Vec<Child>,
}

/// Builds a `SyntaxTree` from parser events.
pub struct Builder {
    text: Box<str>,
    tokens: Vec<Token>,
    nodes: Vec<Node>,
    children: Vec<Child>,
    opened: Vec<Opened>,
    children_pool: Vec<Vec<Child>>,
    text_len: TextSize,
}

const DEFAULT_TREE_DEPTH: usize = 64;
const DEFAULT_TREE_SIZE: usize = 1024;
const DEFAULT_CHILDREN_LEN: usize = 8;

impl Builder {
    /// Creates a new builder for `text`.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.into(),
            tokens: Vec::with_capacity(DEFAULT_TREE_SIZE),
            nodes: Vec::with_capacity(DEFAULT_TREE_SIZE),
            children: Vec::with_capacity(DEFAULT_TREE_SIZE),
            opened: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            children_pool: Vec::with_capacity(DEFAULT_TREE_DEPTH),
            text_len: TextSize::new(0),
        }
    }

    /// Starts a new node of the given kind.
    pub fn start_node(&mut self, kind: SyntaxKind) {
        assert!(self.nodes.is_empty() || !self.opened.is_empty(), "a tree has exactly one root");

        let node = index(self.nodes.len());
        let tokens_start = index(self.tokens.len());
        self.nodes.push(Node {
            kind,
            parent: self.opened.last().map(|opened| opened.node),
            children_start: 0,
            children_len: 0,
            tokens_start,
            tokens_end: tokens_start,
            offset: self.text_len,
        });

        if let Some(parent) = self.opened.last_mut() {
            parent.children.push(Child::Node(node));
        }

        let children =
            self.children_pool.pop().unwrap_or_else(|| Vec::with_capacity(DEFAULT_CHILDREN_LEN));
        self.opened.push(Opened { node, children });
    }

    /// Finishes the most recently started node.
    pub fn finish_node(&mut self) {
        let Opened { node, mut children } = self.opened.pop().expect("no opened nodes?");

        let node = &mut self.nodes[node as usize];
        node.children_start = index(self.children.len());
        node.children_len = index(children.len());
        node.tokens_end = index(self.tokens.len());

        self.children.append(&mut children);
        self.children_pool.push(children);
    }

    /// Adds a token with its leading and trailing trivia.
    pub fn token(
        &mut self,
        leading: &[TriviaPiece],
        kind: SyntaxKind,
        len: TextSize,
        trailing: &[TriviaPiece],
    ) {
        let parent = self.opened.last().expect("token outside of a node").node;
        let owner = index(self.tokens.len() + leading.len());

        for piece in leading {
            let range = self.advance(piece.len);
            self.push_trivia(piece, range, parent, owner);
        }

        let range = self.advance(len);
        self.tokens.push(Token {
            kind,
            range,
            parent,
            owner,
            leading: index(leading.len()),
            trailing: index(trailing.len()),
        });
        if let Some(opened) = self.opened.last_mut() {
            opened.children.push(Child::Token(owner));
        }

        for piece in trailing {
            let range = self.advance(piece.len);
            self.push_trivia(piece, range, parent, owner);
        }
    }

    fn push_trivia(&mut self, piece: &TriviaPiece, range: TextRange, parent: u32, owner: u32) {
        self.tokens.push(Token {
            kind: piece.kind.syntax_kind(),
            range,
            parent,
            owner,
            leading: 0,
            trailing: 0,
        });
    }

    fn advance(&mut self, len: TextSize) -> TextRange {
        let range = TextRange::at(self.text_len, len);
        self.text_len += len;
        assert!(self.text.is_char_boundary(usize::from(self.text_len)));
        range
    }

    /// Finishes building and returns the immutable `SyntaxTree`.
    pub fn finish(self) -> SyntaxTree {
        assert!(self.opened.is_empty(), "you should finish every started node");
        assert!(!self.nodes.is_empty(), "a tree needs a root node");

        SyntaxTree {
            inner: TreeInner {
                text: self.text,
                tokens: self.tokens.into_boxed_slice(),
                nodes: self.nodes.into_boxed_slice(),
                children: self.children.into_boxed_slice(),
            },
        }
    }
}

#[inline]
fn index(len: usize) -> u32 {
    u32::try_from(len).expect("syntax tree too large")
}
