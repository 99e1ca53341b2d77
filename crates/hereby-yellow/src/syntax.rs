//! Public syntax tree API built on immutable, parent-linked nodes.

use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};
use std::ops::Range;

use text_size::{TextRange, TextSize};

use crate::SyntaxKind;
use crate::nodes::{Child, TreeInner};

/// Owned syntax tree for a single source text.
pub struct SyntaxTree {
    pub(crate) inner: TreeInner,
}

impl SyntaxTree {
    /// Returns the root syntax node.
    #[inline]
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode { tree: &self.inner, index: 0 }
    }

    /// Returns the full source text for this tree.
    #[inline]
    pub fn text(&self) -> &str {
        &self.inner.text
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree").field("text_len", &self.text().len()).finish_non_exhaustive()
    }
}

/// Token handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxToken<'a> {
    tree: &'a TreeInner,
    index: u32,
}

impl<'a> SyntaxToken<'a> {
    /// Returns this token's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.token(self.index).kind
    }

    /// Returns `true` if this token is trivia.
    #[inline]
    pub fn is_trivia(self) -> bool {
        self.kind().is_trivia()
    }

    /// Returns the token text range including attached trivia.
    pub fn text_range(self) -> TextRange {
        let token = self.tree.token(self.index);
        let first = self.tree.token(self.index - token.leading);
        let last = self.tree.token(self.index + token.trailing);
        TextRange::new(first.range.start(), last.range.end())
    }

    /// Returns the token text range excluding trivia.
    #[inline]
    pub fn trimmed_range(self) -> TextRange {
        self.tree.token(self.index).range
    }

    /// Returns the token text including trivia.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the token text excluding trivia.
    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        &self.tree.text[self.trimmed_range()]
    }

    /// Returns the next non-trivia token if any.
    pub fn next_token(self) -> Option<Self> {
        let len = self.tree.tokens.len() as u32;
        (self.index + 1..len)
            .find(|&index| !self.tree.token(index).kind.is_trivia())
            .map(|index| Self { tree: self.tree, index })
    }

    /// Iterates over leading trivia tokens.
    #[inline]
    pub fn leading_trivia(self) -> TriviaIter<'a> {
        let token = self.tree.token(self.index);
        TriviaIter { tree: self.tree, tokens: self.index - token.leading..self.index }
    }

    /// Iterates over trailing trivia tokens.
    #[inline]
    pub fn trailing_trivia(self) -> TriviaIter<'a> {
        let token = self.tree.token(self.index);
        TriviaIter { tree: self.tree, tokens: self.index + 1..self.index + 1 + token.trailing }
    }

    /// Returns the parent node.
    #[inline]
    pub fn parent(self) -> SyntaxNode<'a> {
        SyntaxNode { tree: self.tree, index: self.tree.token(self.index).parent }
    }

    /// Returns an iterator of parent nodes, starting from the immediate parent.
    #[inline]
    pub fn parent_ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        self.parent().ancestors()
    }
}

impl PartialEq for SyntaxToken<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxToken<'_> {}

impl Hash for SyntaxToken<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.tree, state);
        self.index.hash(state);
    }
}

impl fmt::Debug for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?} {:?}", self.kind(), self.trimmed_range(), self.text_trimmed())
    }
}

impl fmt::Display for SyntaxToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text_trimmed())
    }
}

/// Iterator over trivia tokens.
#[derive(Clone)]
pub struct TriviaIter<'a> {
    tree: &'a TreeInner,
    tokens: Range<u32>,
}

impl<'a> Iterator for TriviaIter<'a> {
    type Item = SyntaxToken<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(SyntaxToken { tree: self.tree, index: self.tokens.next()? })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.tokens.size_hint()
    }
}

impl DoubleEndedIterator for TriviaIter<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        Some(SyntaxToken { tree: self.tree, index: self.tokens.next_back()? })
    }
}

impl ExactSizeIterator for TriviaIter<'_> {}

/// Node handle tied to the lifetime of the tree.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    tree: &'a TreeInner,
    index: u32,
}

impl<'a> SyntaxNode<'a> {
    /// Returns this node's kind.
    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.tree.node(self.index).kind
    }

    /// Returns the first non-trivia token spanned by this node.
    pub fn first_token(self) -> Option<SyntaxToken<'a>> {
        let index = self.tree.significant_tokens(self.index).next()?;
        Some(SyntaxToken { tree: self.tree, index })
    }

    /// Returns the last non-trivia token spanned by this node.
    pub fn last_token(self) -> Option<SyntaxToken<'a>> {
        let index = self.tree.significant_tokens(self.index).next_back()?;
        Some(SyntaxToken { tree: self.tree, index })
    }

    /// Returns the text range covered by this node, trivia included.
    #[inline]
    pub fn text_range(self) -> TextRange {
        self.tree.node_range(self.index)
    }

    /// Returns the range with leading/trailing trivia trimmed away.
    pub fn trimmed_range(self) -> TextRange {
        match (self.first_token(), self.last_token()) {
            (Some(first), Some(last)) => {
                TextRange::new(first.trimmed_range().start(), last.trimmed_range().end())
            }
            _ => TextRange::empty(self.text_range().start()),
        }
    }

    /// Returns the text slice covered by this node.
    #[inline]
    pub fn text(self) -> &'a str {
        &self.tree.text[self.text_range()]
    }

    /// Returns the text slice excluding leading/trailing trivia.
    #[inline]
    pub fn text_trimmed(self) -> &'a str {
        &self.tree.text[self.trimmed_range()]
    }

    /// Returns the full source text of the tree this node belongs to.
    #[inline]
    pub fn source_text(self) -> &'a str {
        &self.tree.text
    }

    /// Returns the parent node if any.
    #[inline]
    pub fn parent(self) -> Option<Self> {
        Some(Self { tree: self.tree, index: self.tree.node(self.index).parent? })
    }

    /// Returns an iterator of ancestors starting from this node.
    #[inline]
    pub fn ancestors(self) -> impl Iterator<Item = SyntaxNode<'a>> + Clone {
        std::iter::successors(Some(self), |it| it.parent())
    }

    /// Iterates children including non-trivia tokens.
    #[inline]
    pub fn children_with_tokens(self) -> ChildrenWithTokens<'a> {
        ChildrenWithTokens { tree: self.tree, children: self.tree.children(self.index).iter() }
    }

    /// Iterates child nodes, skipping tokens.
    #[inline]
    pub fn children(self) -> Children<'a> {
        Children { inner: self.children_with_tokens() }
    }

    /// Returns the first direct child token of `kind`.
    pub fn child_token(self, kind: SyntaxKind) -> Option<SyntaxToken<'a>> {
        self.children_with_tokens()
            .filter_map(NodeOrToken::into_token)
            .find(|token| token.kind() == kind)
    }

    /// Returns a preorder iterator over nodes.
    #[inline]
    pub fn preorder(self) -> Preorder<'a> {
        Preorder::new(self)
    }

    /// Iterates this node and all nodes below it.
    pub fn descendants(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    /// Iterates the non-trivia tokens spanned by this node.
    pub fn descendant_tokens(self) -> impl DoubleEndedIterator<Item = SyntaxToken<'a>> {
        let tree = self.tree;
        tree.significant_tokens(self.index).map(move |index| SyntaxToken { tree, index })
    }

    /// Returns the token at the given offset, if any.
    ///
    /// Trivia resolves to the token it is attached to.
    pub fn token_at_offset(self, offset: TextSize) -> TokenAtOffset<SyntaxToken<'a>> {
        if !self.text_range().contains_inclusive(offset) {
            return TokenAtOffset::None;
        }

        let node = self.tree.node(self.index);
        let base = node.tokens_start;
        let tokens = &self.tree.tokens[base as usize..node.tokens_end as usize];

        let at = tokens.partition_point(|token| token.range.end() < offset);
        let Some(token) = tokens.get(at) else {
            return TokenAtOffset::None;
        };
        if token.range.start() > offset {
            return TokenAtOffset::None;
        }

        let left = self.tree.owner(base + at as u32);
        let right = match tokens.get(at + 1) {
            Some(next) if token.range.end() == offset && next.range.start() == offset => {
                Some(self.tree.owner(base + at as u32 + 1))
            }
            _ => None,
        };

        let tree = self.tree;
        match right {
            Some(right) if right != left => TokenAtOffset::Between(
                SyntaxToken { tree, index: left },
                SyntaxToken { tree, index: right },
            ),
            _ => TokenAtOffset::Single(SyntaxToken { tree, index: left }),
        }
    }

    /// Renders the subtree one element per line, for tests and debugging.
    pub fn debug_dump(self) -> String {
        fn go(out: &mut String, element: SyntaxElement<'_>, depth: usize) {
            match element {
                NodeOrToken::Node(node) => {
                    _ = writeln!(out, "{:indent$}{node:?}", "", indent = depth * 2);
                    for child in node.children_with_tokens() {
                        go(out, child, depth + 1);
                    }
                }
                NodeOrToken::Token(token) if token.kind() == SyntaxKind::EOF => {}
                NodeOrToken::Token(token) => {
                    _ = writeln!(out, "{:indent$}{token:?}", "", indent = depth * 2);
                }
            }
        }

        let mut out = String::new();
        go(&mut out, NodeOrToken::Node(self), 0);
        out
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.index == other.index
    }
}

impl Eq for SyntaxNode<'_> {}

impl Hash for SyntaxNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.tree, state);
        self.index.hash(state);
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.trimmed_range())
    }
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text_trimmed())
    }
}

/// Node or token element inside the tree.
pub type SyntaxElement<'a> = NodeOrToken<SyntaxNode<'a>, SyntaxToken<'a>>;

/// Iterator over children including non-trivia tokens.
#[derive(Clone)]
pub struct ChildrenWithTokens<'a> {
    tree: &'a TreeInner,
    children: std::slice::Iter<'a, Child>,
}

impl<'a> ChildrenWithTokens<'a> {
    #[inline]
    fn map_child(tree: &'a TreeInner, child: &Child) -> SyntaxElement<'a> {
        match *child {
            Child::Node(index) => NodeOrToken::Node(SyntaxNode { tree, index }),
            Child::Token(index) => NodeOrToken::Token(SyntaxToken { tree, index }),
        }
    }
}

impl<'a> Iterator for ChildrenWithTokens<'a> {
    type Item = SyntaxElement<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let child = self.children.next()?;
        Some(Self::map_child(self.tree, child))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.children.size_hint()
    }
}

impl DoubleEndedIterator for ChildrenWithTokens<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let child = self.children.next_back()?;
        Some(Self::map_child(self.tree, child))
    }
}

impl ExactSizeIterator for ChildrenWithTokens<'_> {}

/// Iterator over child nodes only.
#[derive(Clone)]
pub struct Children<'a> {
    inner: ChildrenWithTokens<'a>,
}

impl<'a> Iterator for Children<'a> {
    type Item = SyntaxNode<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(NodeOrToken::into_node)
    }
}

impl DoubleEndedIterator for Children<'_> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().rev().find_map(NodeOrToken::into_node)
    }
}

/// Preorder traversal over nodes.
#[derive(Clone)]
pub struct Preorder<'a> {
    stack: Vec<Children<'a>>,
    root: Option<SyntaxNode<'a>>,
    pending_leave: Vec<SyntaxNode<'a>>,
}

impl<'a> Preorder<'a> {
    fn new(start: SyntaxNode<'a>) -> Self {
        Self { stack: Vec::with_capacity(32), root: Some(start), pending_leave: Vec::new() }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = WalkEvent<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let Some(children) = self.stack.last_mut() else {
            let root = self.root.take()?;
            self.stack.push(root.children());
            self.pending_leave.push(root);
            return Some(WalkEvent::Enter(root));
        };

        match children.next() {
            Some(child) => {
                self.stack.push(child.children());
                self.pending_leave.push(child);
                Some(WalkEvent::Enter(child))
            }
            None => {
                self.stack.pop();
                let node = self.pending_leave.pop().expect("should have an exited-from node");
                Some(WalkEvent::Leave(node))
            }
        }
    }
}

/// Preorder walk event for nodes.
#[derive(Clone, Copy, Debug)]
pub enum WalkEvent<'a> {
    Enter(SyntaxNode<'a>),
    Leave(SyntaxNode<'a>),
}

/// Node-or-token wrapper used throughout the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeOrToken<N, T> {
    Node(N),
    Token(T),
}

impl<N, T> NodeOrToken<N, T> {
    /// Converts into the node variant, if any.
    pub fn into_node(self) -> Option<N> {
        match self {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Converts into the token variant, if any.
    pub fn into_token(self) -> Option<T> {
        match self {
            NodeOrToken::Node(_) => None,
            NodeOrToken::Token(token) => Some(token),
        }
    }

}

/// There might be zero, one or two tokens at a given offset.
#[derive(Clone, Debug)]
pub enum TokenAtOffset<T> {
    /// No tokens at offset.
    None,
    /// Only a single token at offset.
    Single(T),
    /// Offset is exactly between two tokens.
    Between(T, T),
}

impl<T> Iterator for TokenAtOffset<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::None) {
            Self::None => None,
            Self::Single(token) => Some(token),
            Self::Between(left, right) => {
                *self = Self::Single(right);
                Some(left)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::None => (0, Some(0)),
            Self::Single(_) => (1, Some(1)),
            Self::Between(_, _) => (2, Some(2)),
        }
    }
}

impl<T> ExactSizeIterator for TokenAtOffset<T> {}
