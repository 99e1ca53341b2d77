//! Source rewrites offered at a cursor position.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use hereby_parse::ParseError;
use hereby_yellow::SyntaxKind::*;
use hereby_yellow::{SyntaxKind, SyntaxNode, SyntaxToken, TokenAtOffset};
use text_size::{TextRange, TextSize};
use tracing::{debug, instrument, warn};

mod classify;
mod converter;
mod handlers;
mod literal;
mod source_change;
mod splice;
mod synthesize;

pub use crate::classify::{ExprKind, classify};
pub use crate::converter::{FormatCall, FormatConverter, SprintfConverter, flatten};
pub use crate::source_change::{Indel, SourceChange};
pub use crate::splice::Splicer;
pub use crate::synthesize::{
    HEREDOC_DELIMITER, Hoist, NameAllocator, Resolution, Slot, count_placeholders, heredoc,
    normalize_specifiers, resolve_operands, strip_quotes, substitute,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssistId {
    TernaryToIfElse,
    ConcatToHeredoc,
}

impl AssistId {
    pub const ALL: [Self; 2] = [Self::TernaryToIfElse, Self::ConcatToHeredoc];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::TernaryToIfElse => "ternary-to-if-else",
            Self::ConcatToHeredoc => "concat-to-heredoc",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::TernaryToIfElse => "Convert ternary to if/else",
            Self::ConcatToHeredoc => "Convert concatenation to heredoc",
        }
    }
}

impl fmt::Display for AssistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown assist `{0}`")]
pub struct UnknownAssist(pub String);

impl FromStr for AssistId {
    type Err = UnknownAssist;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|id| id.as_str() == s).ok_or_else(|| UnknownAssist(s.to_owned()))
    }
}

/// A rewrite available at the cursor, before it is computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assist {
    pub id: AssistId,
    pub label: &'static str,
    pub target: TextRange,
}

#[derive(Debug, thiserror::Error)]
pub enum AssistError {
    #[error("assist is not applicable here")]
    NotApplicable,
    #[error("{0}")]
    StructuralMismatch(String),
    #[error("{0}")]
    MalformedLiteral(String),
    #[error("no resolution for {0:?} operands")]
    ClassifierGap(ExprKind),
    #[error("format conversion failed: {0}")]
    CollaboratorFailure(String),
    #[error("rewrite produced invalid code: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone)]
pub struct AssistConfig {
    pub converter: Arc<dyn FormatConverter>,
    /// Initializer of the declaration split off a ternary assignment;
    /// `None` emits a bare `$x;`.
    pub split_placeholder: Option<String>,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self { converter: Arc::new(SprintfConverter), split_placeholder: None }
    }
}

/// Read-only view of a tree around the cursor.
#[derive(Clone, Copy)]
pub struct AssistContext<'a> {
    root: SyntaxNode<'a>,
    offset: TextSize,
    config: &'a AssistConfig,
}

impl<'a> AssistContext<'a> {
    pub fn new(root: SyntaxNode<'a>, offset: TextSize, config: &'a AssistConfig) -> Self {
        Self { root, offset, config }
    }

    pub fn root(&self) -> SyntaxNode<'a> {
        self.root
    }

    pub fn offset(&self) -> TextSize {
        self.offset
    }

    pub fn config(&self) -> &'a AssistConfig {
        self.config
    }

    pub(crate) fn token(&self) -> Option<SyntaxToken<'a>> {
        pick_best_token(self.root.token_at_offset(self.offset), token_priority)
    }

    /// Nodes enclosing the cursor, innermost first.
    pub(crate) fn ancestors(&self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.token().into_iter().flat_map(SyntaxToken::parent_ancestors)
    }
}

pub fn pick_best_token<'a>(
    tokens: TokenAtOffset<SyntaxToken<'a>>,
    f: impl Fn(SyntaxKind) -> usize,
) -> Option<SyntaxToken<'a>> {
    tokens.max_by_key(|token| f(token.kind()))
}

fn token_priority(kind: SyntaxKind) -> usize {
    match kind {
        kind if kind.is_string() => 3,
        VARIABLE_NAME | NAME | INT_NUMBER | FLOAT_NUMBER => 3,
        DOT | QUESTION | COLON | EQ | ASSIGN_OP | OPERATOR => 2,
        EOF => 0,
        _ => 1,
    }
}

/// Rewrites available at the cursor.
#[instrument(skip_all, fields(offset = ?ctx.offset()))]
pub fn assists(ctx: &AssistContext<'_>) -> Vec<Assist> {
    let assists: Vec<_> = AssistId::ALL
        .into_iter()
        .filter_map(|id| {
            let target = handlers::target(id, ctx)?;
            Some(Assist { id, label: id.label(), target })
        })
        .collect();
    debug!(count = assists.len(), "collected assists");
    assists
}

pub fn is_applicable(id: AssistId, ctx: &AssistContext<'_>) -> bool {
    handlers::target(id, ctx).is_some()
}

/// Computes the whole edit of a rewrite without touching anything.
#[instrument(skip(ctx), fields(offset = ?ctx.offset()))]
pub fn apply(id: AssistId, ctx: &AssistContext<'_>) -> Result<SourceChange, AssistError> {
    let result = handlers::apply(id, ctx);
    match &result {
        Ok(change) => debug!(indels = change.indels().len(), "computed rewrite"),
        Err(AssistError::NotApplicable) => debug!("not applicable"),
        Err(error) => warn!(%error, "rewrite aborted"),
    }
    result
}
