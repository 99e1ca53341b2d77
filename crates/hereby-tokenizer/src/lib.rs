mod cursor;

use cursor::{Cursor, EOF_CHAR};
pub use hereby_yellow::SyntaxKind;
use hereby_yellow::SyntaxKind::*;
use hereby_yellow::{TriviaPiece, TriviaPieceKind};
use text_size::{TextRange, TextSize};

#[derive(Debug, Clone)]
pub struct Token {
    pub leading: Vec<TriviaPiece>,
    pub kind: SyntaxKind,
    pub kind_range: TextRange,
    pub trailing: Vec<TriviaPiece>,
}

impl Token {
    const EOF: Self = Self {
        kind: EOF,
        kind_range: TextRange::empty(TextSize::new(0)),
        leading: Vec::new(),
        trailing: Vec::new(),
    };
}

/// A malformed token, reported next to the token itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: &'static str,
    pub range: TextRange,
}

/// Punctuation and operators, longest spelling first.
const PUNCTUATION: &[(&str, SyntaxKind)] = &[
    ("<<=", ASSIGN_OP),
    (">>=", ASSIGN_OP),
    ("**=", ASSIGN_OP),
    ("??=", ASSIGN_OP),
    ("===", OPERATOR),
    ("!==", OPERATOR),
    ("<=>", OPERATOR),
    ("?->", ARROW),
    ("+=", ASSIGN_OP),
    ("-=", ASSIGN_OP),
    ("*=", ASSIGN_OP),
    ("/=", ASSIGN_OP),
    (".=", ASSIGN_OP),
    ("%=", ASSIGN_OP),
    ("&=", ASSIGN_OP),
    ("|=", ASSIGN_OP),
    ("^=", ASSIGN_OP),
    ("->", ARROW),
    ("=>", FAT_ARROW),
    ("::", DOUBLE_COLON),
    ("**", OPERATOR),
    ("&&", OPERATOR),
    ("||", OPERATOR),
    ("??", OPERATOR),
    ("==", OPERATOR),
    ("!=", OPERATOR),
    ("<>", OPERATOR),
    ("<=", OPERATOR),
    (">=", OPERATOR),
    ("++", OPERATOR),
    ("--", OPERATOR),
    ("<<", OPERATOR),
    (">>", OPERATOR),
    ("(", LEFT_PAREN),
    (")", RIGHT_PAREN),
    ("[", LEFT_BRACKET),
    ("]", RIGHT_BRACKET),
    ("{", LEFT_BRACE),
    ("}", RIGHT_BRACE),
    (";", SEMICOLON),
    (",", COMMA),
    ("?", QUESTION),
    (":", COLON),
    (".", DOT),
    ("=", EQ),
    ("+", OPERATOR),
    ("-", OPERATOR),
    ("*", OPERATOR),
    ("/", OPERATOR),
    ("%", OPERATOR),
    ("!", OPERATOR),
    ("<", OPERATOR),
    (">", OPERATOR),
    ("&", OPERATOR),
    ("|", OPERATOR),
    ("^", OPERATOR),
    ("~", OPERATOR),
    ("@", OPERATOR),
];

pub struct Tokenizer<'a> {
    text: &'a str,
    cursor: Cursor<'a>,
    current: Token,
    trivia_pieces: Vec<TriviaPiece>,
    errors: Vec<LexError>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut tokenizer = Self {
            text,
            cursor: Cursor::new(text),
            current: Token::EOF,
            trivia_pieces: Vec::with_capacity(4),
            errors: Vec::new(),
        };
        tokenizer.next_token();
        tokenizer
    }

    pub fn peek(&self) -> &Token {
        &self.current
    }

    /// Errors found in the tokens produced so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    fn offset(&self) -> TextSize {
        TextSize::of(self.text) - self.cursor.len()
    }

    fn range(&self) -> TextRange {
        let end = self.offset();
        TextRange::new(end - self.cursor.pos_within_token(), end)
    }

    fn text(&self) -> &'a str {
        &self.text[self.range()]
    }

    pub fn next_token(&mut self) -> Token {
        self.trivia(true);
        let trailing_start = self.trivia_pieces.len();
        let (kind, kind_range) = self.syntax_kind();
        if kind != EOF {
            self.trivia(false);
        }

        let (leading, trailing) = self.trivia_pieces.split_at(trailing_start);
        let leading = leading.to_vec();
        let trailing = trailing.to_vec();

        self.trivia_pieces.clear();
        std::mem::replace(&mut self.current, Token { leading, kind, kind_range, trailing })
    }

    /// Trailing trivia stops at the end of the line.
    fn trivia(&mut self, leading: bool) {
        loop {
            let kind = match self.cursor.peek() {
                '\n' | '\r' if leading => {
                    self.cursor.advance_while(|c| matches!(c, '\n' | '\r'));
                    TriviaPieceKind::Newline
                }
                ' ' | '\t' | '\u{c}' => {
                    self.cursor.advance_while(|c| matches!(c, ' ' | '\t' | '\u{c}'));
                    TriviaPieceKind::Whitespace
                }
                '/' if self.cursor.second() == '/' => {
                    self.cursor.advance_while(|c| c != '\n');
                    TriviaPieceKind::SingleLineComment
                }
                '#' => {
                    self.cursor.advance_while(|c| c != '\n');
                    TriviaPieceKind::SingleLineComment
                }
                '/' if self.cursor.second() == '*' => {
                    self.block_comment();
                    TriviaPieceKind::BlockComment
                }
                _ => break,
            };

            self.trivia_pieces.push(TriviaPiece::new(kind, self.cursor.pos_within_token()));
            self.cursor.reset_pos_within_token();
        }
    }

    fn block_comment(&mut self) {
        let start = self.offset();
        self.cursor.bump_bytes(2);
        match self.cursor.as_str().find("*/") {
            Some(end) => self.cursor.bump_bytes(end + 2),
            None => {
                self.cursor.bump_bytes(self.cursor.as_str().len());
                self.error("unterminated block comment", TextRange::new(start, self.offset()));
            }
        }
    }

    fn error(&mut self, message: &'static str, range: TextRange) {
        self.errors.push(LexError { message, range });
    }

    fn syntax_kind(&mut self) -> (SyntaxKind, TextRange) {
        let kind = match self.cursor.peek() {
            EOF_CHAR if self.cursor.is_eof() => EOF,
            '<' if starts_with_ignore_case(self.cursor.as_str(), "<?php") => {
                self.cursor.bump_bytes("<?php".len());
                OPEN_TAG
            }
            '<' if self.cursor.as_str().starts_with("<<<") => self.heredoc(),
            '$' if is_ident_start(self.cursor.second()) => {
                self.cursor.advance();
                self.cursor.advance_while(is_ident_continue);
                VARIABLE_NAME
            }
            '\'' => self.quoted_string('\'', SINGLE_QUOTED_STRING),
            '"' => self.quoted_string('"', DOUBLE_QUOTED_STRING),
            '.' if self.cursor.second().is_ascii_digit() => {
                self.cursor.advance();
                self.digits(false);
                self.float_exponent();
                FLOAT_NUMBER
            }
            first_char @ '0'..='9' => {
                self.cursor.advance();
                self.number(first_char)
            }
            c if is_ident_start(c) || (c == '\\' && is_ident_start(self.cursor.second())) => {
                self.name()
            }
            _ => self.punctuation(),
        };

        let range = self.range();
        self.cursor.reset_pos_within_token();

        (kind, range)
    }

    fn name(&mut self) -> SyntaxKind {
        loop {
            self.cursor.advance_while(is_ident_continue);
            if self.cursor.matches('\\') && is_ident_start(self.cursor.second()) {
                self.cursor.advance();
                continue;
            }
            break;
        }

        SyntaxKind::from_keyword(self.text()).unwrap_or(NAME)
    }

    fn punctuation(&mut self) -> SyntaxKind {
        let rest = self.cursor.as_str();
        match PUNCTUATION.iter().find(|(spelling, _)| rest.starts_with(spelling)) {
            Some(&(spelling, kind)) => {
                self.cursor.bump_bytes(spelling.len());
                kind
            }
            None => {
                self.cursor.advance();
                UNKNOWN
            }
        }
    }

    fn quoted_string(&mut self, quote: char, kind: SyntaxKind) -> SyntaxKind {
        let start = self.offset();
        self.cursor.advance();
        if !self.string_body(quote) {
            self.error("unterminated string literal", TextRange::new(start, self.offset()));
        }
        kind
    }

    /// Consumes up to and including the closing `quote`.
    fn string_body(&mut self, quote: char) -> bool {
        while !self.cursor.is_eof() {
            match self.cursor.advance() {
                '\\' => {
                    self.cursor.advance();
                }
                '{' if quote == '"' && self.cursor.matches('$') => self.interpolation(),
                c if c == quote => return true,
                _ => {}
            }
        }
        false
    }

    /// Skips a `{$...}` interpolation, which may contain quoted keys.
    fn interpolation(&mut self) {
        let mut depth = 1usize;
        while !self.cursor.is_eof() {
            match self.cursor.advance() {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return;
                    }
                }
                quote @ ('\'' | '"') => {
                    if !self.string_body(quote) {
                        return;
                    }
                }
                _ => {}
            }
        }
    }

    fn heredoc(&mut self) -> SyntaxKind {
        let start = self.offset();
        let rest = self.cursor.as_str();
        let after = rest[3..].trim_start_matches([' ', '\t']);
        let padding = rest.len() - 3 - after.len();

        let (quote, after_quote) = match after.chars().next() {
            Some(quote @ ('\'' | '"')) => (Some(quote), &after[1..]),
            _ => (None, after),
        };
        let label_len = after_quote
            .char_indices()
            .find(|&(i, c)| if i == 0 { !is_ident_start(c) } else { !is_ident_continue(c) })
            .map_or(after_quote.len(), |(i, _)| i);
        if label_len == 0 {
            self.cursor.bump_bytes(2);
            return OPERATOR;
        }
        let label = &after_quote[..label_len];
        let mut opener = 3 + padding + usize::from(quote.is_some()) + label_len;
        if let Some(quote) = quote {
            if !after_quote[label_len..].starts_with(quote) {
                self.cursor.bump_bytes(2);
                return OPERATOR;
            }
            opener += 1;
        }

        let line_end = &rest[opener..];
        let newline = if line_end.starts_with("\r\n") {
            2
        } else if line_end.starts_with('\n') {
            1
        } else {
            self.cursor.bump_bytes(2);
            return OPERATOR;
        };
        self.cursor.bump_bytes(opener + newline);

        loop {
            let rest = self.cursor.as_str();
            let line = rest.split_inclusive('\n').next().unwrap_or("");
            let trimmed = line.trim_start_matches([' ', '\t']);
            if let Some(after_label) = trimmed.strip_prefix(label)
                && !after_label.chars().next().is_some_and(is_ident_continue)
            {
                self.cursor.bump_bytes(line.len() - trimmed.len() + label.len());
                break;
            }
            if line.is_empty() {
                self.error("unterminated heredoc", TextRange::new(start, self.offset()));
                break;
            }
            self.cursor.bump_bytes(line.len());
        }

        if quote == Some('\'') { NOWDOC_STRING } else { HEREDOC_STRING }
    }

    fn number(&mut self, c: char) -> SyntaxKind {
        if c == '0' {
            match self.cursor.peek() {
                'b' | 'B' | 'o' | 'O' => {
                    self.cursor.advance();
                    self.digits(false);
                }
                'x' | 'X' => {
                    self.cursor.advance();
                    self.digits(true);
                    return INT_NUMBER;
                }
                '0'..='9' | '_' | '.' | 'e' | 'E' => {
                    self.digits(false);
                }
                _ => return INT_NUMBER,
            }
        } else {
            self.digits(false);
        }

        if self.cursor.matches('.') && self.cursor.second().is_ascii_digit() {
            self.cursor.advance();
            self.digits(false);
            self.float_exponent();
            return FLOAT_NUMBER;
        }

        if (self.cursor.matches('e') || self.cursor.matches('E'))
            && (self.cursor.second().is_ascii_digit() || matches!(self.cursor.second(), '-' | '+'))
        {
            self.float_exponent();
            return FLOAT_NUMBER;
        }

        INT_NUMBER
    }

    fn digits(&mut self, allow_hex: bool) {
        loop {
            match self.cursor.peek() {
                '_' | '0'..='9' => {
                    self.cursor.advance();
                }
                'a'..='f' | 'A'..='F' if allow_hex => {
                    self.cursor.advance();
                }
                _ => return,
            }
        }
    }

    fn float_exponent(&mut self) {
        if self.cursor.matches('e') || self.cursor.matches('E') {
            self.cursor.advance();
            if self.cursor.matches('-') || self.cursor.matches('+') {
                self.cursor.advance();
            }
            self.digits(false);
        }
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len()).is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

pub fn is_ident_continue(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_text<'a>(token: &Token, text: &'a str) -> &'a str {
        &text[token.kind_range]
    }

    fn kinds(text: &str) -> Vec<(SyntaxKind, &str)> {
        let mut tokenizer = Tokenizer::new(text);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token();
            if token.kind == EOF {
                break;
            }
            tokens.push((token.kind, token_text(&token, text)));
        }
        tokens
    }

    #[test]
    fn test_integer_literals() {
        let inputs = vec![
            ("123", INT_NUMBER),
            ("0", INT_NUMBER),
            ("0b1010", INT_NUMBER),
            ("0o755", INT_NUMBER),
            ("0x1f", INT_NUMBER),
            ("123_456", INT_NUMBER),
        ];

        for (input, expected_kind) in inputs {
            let mut tokenizer = Tokenizer::new(input);
            let kind = tokenizer.next_token().kind;
            assert_eq!(kind, expected_kind, "Input: '{input}'");
            assert!(tokenizer.cursor.is_eof(), "Tokenizer did not consume all input for '{input}'");
        }
    }

    #[test]
    fn test_float_literals() {
        let inputs = vec![
            ("123.456", FLOAT_NUMBER),
            ("0.0", FLOAT_NUMBER),
            ("1e10", FLOAT_NUMBER),
            ("1.0e-5", FLOAT_NUMBER),
            (".5", FLOAT_NUMBER),
        ];

        for (input, expected_kind) in inputs {
            let mut tokenizer = Tokenizer::new(input);
            let kind = tokenizer.next_token().kind;
            assert_eq!(kind, expected_kind, "Input: '{input}'");
            assert!(tokenizer.cursor.is_eof(), "Tokenizer did not consume all input for '{input}'");
        }
    }

    #[test]
    fn test_assignment() {
        let text = "$x = y;";
        let mut tokenizer = Tokenizer::new(text);

        let token = tokenizer.next_token();
        assert_eq!(token.kind, VARIABLE_NAME);
        assert_eq!(token_text(&token, text), "$x");

        let token = tokenizer.next_token();
        assert_eq!(token.kind, EQ);
        assert_eq!(token_text(&token, text), "=");

        let token = tokenizer.next_token();
        assert_eq!(token.kind, NAME);
        assert_eq!(token_text(&token, text), "y");

        assert_eq!(tokenizer.next_token().kind, SEMICOLON);
        assert_eq!(tokenizer.next_token().kind, EOF);
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            kinds("$a ??= $b ?-> c <=> d ?? e ?: f"),
            vec![
                (VARIABLE_NAME, "$a"),
                (ASSIGN_OP, "??="),
                (VARIABLE_NAME, "$b"),
                (ARROW, "?->"),
                (NAME, "c"),
                (OPERATOR, "<=>"),
                (NAME, "d"),
                (OPERATOR, "??"),
                (NAME, "e"),
                (QUESTION, "?"),
                (COLON, ":"),
                (NAME, "f"),
            ]
        );
        assert_eq!(kinds(".= ."), vec![(ASSIGN_OP, ".="), (DOT, ".")]);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        assert_eq!(
            kinds("IF Else echo AND foo"),
            vec![
                (IF_KW, "IF"),
                (ELSE_KW, "Else"),
                (ECHO_KW, "echo"),
                (OPERATOR, "AND"),
                (NAME, "foo")
            ]
        );
    }

    #[test]
    fn test_open_tag() {
        assert_eq!(
            kinds("<?php\n$x;"),
            vec![(OPEN_TAG, "<?php"), (VARIABLE_NAME, "$x"), (SEMICOLON, ";")]
        );
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            kinds(r#"'it\'s' "a \"b\" {$c["d"]}""#),
            vec![
                (SINGLE_QUOTED_STRING, r"'it\'s'"),
                (DOUBLE_QUOTED_STRING, r#""a \"b\" {$c["d"]}""#)
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let mut tokenizer = Tokenizer::new("'abc");
        let token = tokenizer.next_token();
        assert_eq!(token.kind, SINGLE_QUOTED_STRING);
        assert_eq!(token.kind_range, TextRange::new(0.into(), 4.into()));
        assert_eq!(tokenizer.errors()[0].message, "unterminated string literal");
    }

    #[test]
    fn test_heredoc_and_nowdoc() {
        let text = "<<<EOT\nHello $name\n  EOT;\n<<<'RAW'\n$not\nRAW\n";
        assert_eq!(
            kinds(text),
            vec![
                (HEREDOC_STRING, "<<<EOT\nHello $name\n  EOT"),
                (SEMICOLON, ";"),
                (NOWDOC_STRING, "<<<'RAW'\n$not\nRAW"),
            ]
        );
    }

    #[test]
    fn test_heredoc_label_needs_boundary() {
        let text = "<<<EOT\nEOTX\nEOT";
        assert_eq!(kinds(text), vec![(HEREDOC_STRING, text)]);
    }

    #[test]
    fn test_unterminated_heredoc() {
        let mut tokenizer = Tokenizer::new("<<<EOT\nbody\n");
        let token = tokenizer.next_token();
        assert_eq!(token.kind, HEREDOC_STRING);
        assert_eq!(tokenizer.errors()[0].message, "unterminated heredoc");
    }

    #[test]
    fn test_shift_is_not_heredoc() {
        assert_eq!(kinds("1 << 2"), vec![(INT_NUMBER, "1"), (OPERATOR, "<<"), (INT_NUMBER, "2")]);
    }

    #[test]
    fn test_trailing_trivia_stays_on_line() {
        let text = "$a; // note\n  $b";
        let mut tokenizer = Tokenizer::new(text);

        let a = tokenizer.next_token();
        assert!(a.leading.is_empty());

        let semicolon = tokenizer.next_token();
        let trailing: Vec<_> = semicolon.trailing.iter().map(|piece| piece.kind).collect();
        assert_eq!(trailing, [TriviaPieceKind::Whitespace, TriviaPieceKind::SingleLineComment]);

        let b = tokenizer.next_token();
        let leading: Vec<_> = b.leading.iter().map(|piece| piece.kind).collect();
        assert_eq!(leading, [TriviaPieceKind::Newline, TriviaPieceKind::Whitespace]);
        assert_eq!(token_text(&b, text), "$b");
    }

    #[test]
    fn test_hash_and_block_comments() {
        let text = "# one\n/* two\n */ $x";
        let mut tokenizer = Tokenizer::new(text);
        let token = tokenizer.next_token();
        let leading: Vec<_> = token.leading.iter().map(|piece| piece.kind).collect();
        assert_eq!(
            leading,
            [
                TriviaPieceKind::SingleLineComment,
                TriviaPieceKind::Newline,
                TriviaPieceKind::BlockComment,
                TriviaPieceKind::Whitespace,
            ]
        );
        assert_eq!(token.kind, VARIABLE_NAME);
    }
}
