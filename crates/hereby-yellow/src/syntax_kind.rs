#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACKET,
    RIGHT_BRACKET,
    LEFT_BRACE,
    RIGHT_BRACE,
    SEMICOLON,
    COMMA,
    QUESTION,
    COLON,
    DOUBLE_COLON,
    ARROW,
    FAT_ARROW,
    DOT,
    EQ,
    ASSIGN_OP,
    OPERATOR,

    OPEN_TAG,
    VARIABLE_NAME,
    NAME,
    INT_NUMBER,
    FLOAT_NUMBER,
    SINGLE_QUOTED_STRING,
    DOUBLE_QUOTED_STRING,
    HEREDOC_STRING,
    NOWDOC_STRING,

    IF_KW,
    ELSE_KW,
    ELSEIF_KW,
    WHILE_KW,
    DO_KW,
    FOR_KW,
    FOREACH_KW,
    AS_KW,
    FUNCTION_KW,
    RETURN_KW,
    ECHO_KW,
    NEW_KW,
    BREAK_KW,
    CONTINUE_KW,

    WHITESPACE,
    NEWLINE,
    LINE_COMMENT,
    BLOCK_COMMENT,

    UNKNOWN,
    EOF,

    SOURCE_FILE,
    BLOCK,
    EXPR_STMT,
    ECHO_STMT,
    RETURN_STMT,
    IF_STMT,
    ELSEIF_CLAUSE,
    ELSE_CLAUSE,
    WHILE_STMT,
    DO_WHILE_STMT,
    FOR_STMT,
    FOREACH_STMT,
    FUNCTION_DEF,
    PARAM_LIST,
    PARAM,
    TYPE_REF,
    BREAK_STMT,
    CONTINUE_STMT,
    EMPTY_STMT,

    LITERAL,
    STRING_LITERAL,
    VARIABLE,
    NAME_REF,
    CALL_EXPR,
    ARG_LIST,
    MEMBER_EXPR,
    STATIC_EXPR,
    INDEX_EXPR,
    ASSIGN_EXPR,
    TERNARY_EXPR,
    CONCAT_EXPR,
    BINARY_EXPR,
    PREFIX_EXPR,
    POSTFIX_EXPR,
    PAREN_EXPR,
    ARRAY_EXPR,
    ARRAY_ITEM,
    NEW_EXPR,
    ERROR,
    TOMBSTONE,
}

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEWLINE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    pub fn is_string(self) -> bool {
        matches!(
            self,
            Self::SINGLE_QUOTED_STRING
                | Self::DOUBLE_QUOTED_STRING
                | Self::HEREDOC_STRING
                | Self::NOWDOC_STRING
        )
    }

    pub fn is_keyword(self) -> bool {
        (Self::IF_KW as u16..=Self::CONTINUE_KW as u16).contains(&(self as u16))
    }

    /// Kinds that may appear as a child of a block.
    pub fn is_statement(self) -> bool {
        use SyntaxKind::*;

        matches!(
            self,
            BLOCK
                | EXPR_STMT
                | ECHO_STMT
                | RETURN_STMT
                | IF_STMT
                | WHILE_STMT
                | DO_WHILE_STMT
                | FOR_STMT
                | FOREACH_STMT
                | FUNCTION_DEF
                | BREAK_STMT
                | CONTINUE_STMT
                | EMPTY_STMT
        )
    }

    pub fn is_expr(self) -> bool {
        use SyntaxKind::*;

        matches!(
            self,
            LITERAL
                | STRING_LITERAL
                | VARIABLE
                | NAME_REF
                | CALL_EXPR
                | MEMBER_EXPR
                | STATIC_EXPR
                | INDEX_EXPR
                | ASSIGN_EXPR
                | TERNARY_EXPR
                | CONCAT_EXPR
                | BINARY_EXPR
                | PREFIX_EXPR
                | POSTFIX_EXPR
                | PAREN_EXPR
                | ARRAY_EXPR
                | NEW_EXPR
        )
    }

    pub fn from_keyword(ident: &str) -> Option<Self> {
        let kind = match ident.to_ascii_lowercase().as_str() {
            "if" => Self::IF_KW,
            "else" => Self::ELSE_KW,
            "elseif" => Self::ELSEIF_KW,
            "while" => Self::WHILE_KW,
            "do" => Self::DO_KW,
            "for" => Self::FOR_KW,
            "foreach" => Self::FOREACH_KW,
            "as" => Self::AS_KW,
            "function" => Self::FUNCTION_KW,
            "return" => Self::RETURN_KW,
            "echo" => Self::ECHO_KW,
            "new" => Self::NEW_KW,
            "break" => Self::BREAK_KW,
            "continue" => Self::CONTINUE_KW,
            "and" | "or" | "xor" => Self::OPERATOR,
            _ => return None,
        };
        Some(kind)
    }

    /// Human readable spelling used in parser messages.
    pub fn describe(self) -> &'static str {
        use SyntaxKind::*;

        match self {
            LEFT_PAREN => "`(`",
            RIGHT_PAREN => "`)`",
            LEFT_BRACKET => "`[`",
            RIGHT_BRACKET => "`]`",
            LEFT_BRACE => "`{`",
            RIGHT_BRACE => "`}`",
            SEMICOLON => "`;`",
            COMMA => "`,`",
            QUESTION => "`?`",
            COLON => "`:`",
            DOUBLE_COLON => "`::`",
            ARROW => "`->`",
            FAT_ARROW => "`=>`",
            DOT => "`.`",
            EQ => "`=`",
            AS_KW => "`as`",
            WHILE_KW => "`while`",
            VARIABLE_NAME => "variable",
            NAME => "identifier",
            EOF => "end of file",
            _ => "token",
        }
    }
}
