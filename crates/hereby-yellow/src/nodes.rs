//! Flat storage behind the syntax tree handles.
//!
//! Tokens (trivia included) are kept in source order. Nodes refer to a
//! contiguous slice of `children` and to the half-open span of tokens they
//! cover.

use text_size::{TextRange, TextSize};

use crate::SyntaxKind;

pub(crate) struct TreeInner {
    pub(crate) text: Box<str>,
    pub(crate) tokens: Box<[Token]>,
    pub(crate) nodes: Box<[Node]>,
    pub(crate) children: Box<[Child]>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Token {
    pub(crate) kind: SyntaxKind,
    pub(crate) range: TextRange,
    pub(crate) parent: u32,
    /// For trivia: index of the owning token. For other tokens: their own index.
    pub(crate) owner: u32,
    pub(crate) leading: u32,
    pub(crate) trailing: u32,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) kind: SyntaxKind,
    pub(crate) parent: Option<u32>,
    pub(crate) children_start: u32,
    pub(crate) children_len: u32,
    pub(crate) tokens_start: u32,
    pub(crate) tokens_end: u32,
    /// Offset used for empty nodes.
    pub(crate) offset: TextSize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Child {
    Node(u32),
    Token(u32),
}

impl TreeInner {
    pub(crate) fn token(&self, index: u32) -> &Token {
        &self.tokens[index as usize]
    }

    pub(crate) fn node(&self, index: u32) -> &Node {
        &self.nodes[index as usize]
    }

    pub(crate) fn children(&self, node: u32) -> &[Child] {
        let node = self.node(node);
        let start = node.children_start as usize;
        &self.children[start..start + node.children_len as usize]
    }

    pub(crate) fn node_range(&self, node: u32) -> TextRange {
        let node = self.node(node);
        if node.tokens_start == node.tokens_end {
            return TextRange::empty(node.offset);
        }
        let first = self.token(node.tokens_start);
        let last = self.token(node.tokens_end - 1);
        TextRange::new(first.range.start(), last.range.end())
    }

    /// Indices of the non-trivia tokens spanned by `node`.
    pub(crate) fn significant_tokens(&self, node: u32) -> impl DoubleEndedIterator<Item = u32> {
        let node = self.node(node);
        (node.tokens_start..node.tokens_end)
            .filter(move |&index| !self.token(index).kind.is_trivia())
    }

    /// Maps a trivia token to the token that owns it.
    pub(crate) fn owner(&self, index: u32) -> u32 {
        self.token(index).owner
    }
}
