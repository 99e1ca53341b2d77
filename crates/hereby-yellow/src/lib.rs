//! Lossless, immutable syntax tree with parent links and attached trivia.
//!
//! The tree is built once and then navigated by index-based, lifetime-guided
//! handles without allocation or refcounting.

/// Typed AST wrappers around the raw syntax tree.
pub mod ast;
mod builder;
mod nodes;
mod syntax;
mod syntax_kind;
mod syntax_set;
mod trivia;

/// Incremental builder for constructing a `SyntaxTree`.
pub use builder::Builder;
/// Primary syntax tree API types and adapters.
pub use syntax::{
    Children, ChildrenWithTokens, NodeOrToken, Preorder, SyntaxElement, SyntaxNode,
    SyntaxToken, SyntaxTree, TokenAtOffset, TriviaIter, WalkEvent,
};
/// Token and node kinds used throughout the tree.
pub use syntax_kind::SyntaxKind;
/// Compact set for grouping `SyntaxKind` values.
pub use syntax_set::SyntaxSet;
/// Trivia pieces attached to tokens.
pub use trivia::{TriviaPiece, TriviaPieceKind};
