use crate::SyntaxKind::{self, *};
use crate::{NodeOrToken, SyntaxNode, SyntaxToken};

pub trait Node<'a> {
    fn cast(syntax: SyntaxNode<'a>) -> Option<Self>
    where
        Self: Sized;

    fn syntax(self) -> SyntaxNode<'a>;
}

macro_rules! ast_node {
    ($($name:ident => $kind:ident),* $(,)?) => {$(
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name<'a>(SyntaxNode<'a>);

        impl<'a> Node<'a> for $name<'a> {
            fn cast(syntax: SyntaxNode<'a>) -> Option<Self> {
                (syntax.kind() == $kind).then_some(Self(syntax))
            }

            fn syntax(self) -> SyntaxNode<'a> {
                self.0
            }
        }
    )*};
}

ast_node! {
    SourceFile => SOURCE_FILE,
    Block => BLOCK,
    ExprStmt => EXPR_STMT,
    EchoStmt => ECHO_STMT,
    Variable => VARIABLE,
    CallExpr => CALL_EXPR,
    ArgList => ARG_LIST,
    AssignExpr => ASSIGN_EXPR,
    TernaryExpr => TERNARY_EXPR,
    ConcatExpr => CONCAT_EXPR,
    BinaryExpr => BINARY_EXPR,
    StringLiteral => STRING_LITERAL,
    ParenExpr => PAREN_EXPR,
    MemberExpr => MEMBER_EXPR,
    IndexExpr => INDEX_EXPR,
}

fn nth_child(node: SyntaxNode<'_>, n: usize) -> Option<SyntaxNode<'_>> {
    node.children().nth(n)
}

impl<'a> SourceFile<'a> {
    pub fn statements(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.0.children().filter(|node| node.kind().is_statement())
    }
}

impl<'a> Block<'a> {
    pub fn statements(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.0.children().filter(|node| node.kind().is_statement())
    }
}

impl<'a> ExprStmt<'a> {
    pub fn expr(self) -> Option<SyntaxNode<'a>> {
        self.0.children().next()
    }
}

impl<'a> EchoStmt<'a> {
    pub fn args(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.0.children()
    }
}

impl<'a> Variable<'a> {
    pub fn name(self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(VARIABLE_NAME)
    }
}

impl<'a> CallExpr<'a> {
    pub fn callee(self) -> Option<SyntaxNode<'a>> {
        nth_child(self.0, 0)
    }

    pub fn arg_list(self) -> Option<ArgList<'a>> {
        self.0.children().find_map(ArgList::cast)
    }
}

impl<'a> ArgList<'a> {
    pub fn args(self) -> impl Iterator<Item = SyntaxNode<'a>> {
        self.0.children()
    }
}

impl<'a> AssignExpr<'a> {
    pub fn lhs(self) -> Option<SyntaxNode<'a>> {
        nth_child(self.0, 0)
    }

    /// `=` or one of the compound assignment operators.
    pub fn op(self) -> Option<SyntaxToken<'a>> {
        self.0
            .children_with_tokens()
            .filter_map(NodeOrToken::into_token)
            .find(|token| matches!(token.kind(), EQ | ASSIGN_OP))
    }

    pub fn rhs(self) -> Option<SyntaxNode<'a>> {
        nth_child(self.0, 1)
    }
}

/// Position of a child relative to the `?` and `:` of a ternary.
#[derive(Clone, Copy, PartialEq, Eq)]
enum TernaryPart {
    Condition,
    TrueBranch,
    FalseBranch,
}

impl<'a> TernaryExpr<'a> {
    fn part(self, part: TernaryPart) -> Option<SyntaxNode<'a>> {
        let mut current = TernaryPart::Condition;
        for child in self.0.children_with_tokens() {
            match child {
                NodeOrToken::Token(token) if token.kind() == QUESTION => {
                    current = TernaryPart::TrueBranch;
                }
                NodeOrToken::Token(token) if token.kind() == COLON => {
                    current = TernaryPart::FalseBranch;
                }
                NodeOrToken::Node(node) if current == part => return Some(node),
                _ => {}
            }
        }
        None
    }

    pub fn condition(self) -> Option<SyntaxNode<'a>> {
        self.part(TernaryPart::Condition)
    }

    pub fn question(self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(QUESTION)
    }

    /// Missing for the short `a ?: b` form.
    pub fn true_branch(self) -> Option<SyntaxNode<'a>> {
        self.part(TernaryPart::TrueBranch)
    }

    pub fn colon(self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(COLON)
    }

    pub fn false_branch(self) -> Option<SyntaxNode<'a>> {
        self.part(TernaryPart::FalseBranch)
    }
}

impl<'a> ConcatExpr<'a> {
    pub fn lhs(self) -> Option<SyntaxNode<'a>> {
        nth_child(self.0, 0)
    }

    pub fn rhs(self) -> Option<SyntaxNode<'a>> {
        nth_child(self.0, 1)
    }
}

impl<'a> BinaryExpr<'a> {
    pub fn lhs(self) -> Option<SyntaxNode<'a>> {
        nth_child(self.0, 0)
    }

    pub fn op(self) -> Option<SyntaxToken<'a>> {
        self.0.child_token(OPERATOR)
    }

    pub fn rhs(self) -> Option<SyntaxNode<'a>> {
        nth_child(self.0, 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringKind {
    SingleQuoted,
    DoubleQuoted,
    Heredoc,
    Nowdoc,
}

impl StringKind {
    pub fn from_syntax(kind: SyntaxKind) -> Option<Self> {
        let kind = match kind {
            SINGLE_QUOTED_STRING => Self::SingleQuoted,
            DOUBLE_QUOTED_STRING => Self::DoubleQuoted,
            HEREDOC_STRING => Self::Heredoc,
            NOWDOC_STRING => Self::Nowdoc,
            _ => return None,
        };
        Some(kind)
    }
}

impl<'a> StringLiteral<'a> {
    pub fn token(self) -> Option<SyntaxToken<'a>> {
        self.0
            .children_with_tokens()
            .filter_map(NodeOrToken::into_token)
            .find(|token| token.kind().is_string())
    }

    pub fn kind(self) -> Option<StringKind> {
        self.token().and_then(|token| StringKind::from_syntax(token.kind()))
    }
}

impl<'a> ParenExpr<'a> {
    pub fn expr(self) -> Option<SyntaxNode<'a>> {
        nth_child(self.0, 0)
    }
}

impl<'a> MemberExpr<'a> {
    pub fn base(self) -> Option<SyntaxNode<'a>> {
        nth_child(self.0, 0)
    }
}

impl<'a> IndexExpr<'a> {
    pub fn base(self) -> Option<SyntaxNode<'a>> {
        nth_child(self.0, 0)
    }
}
