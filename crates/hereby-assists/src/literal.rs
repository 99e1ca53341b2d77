//! Contents of string literals across quoting styles.
//!
//! Double quoted strings and heredocs share their escape sequences except for
//! `\"`, which only a double quoted string treats as an escaped quote.

use hereby_yellow::ast::{Node as _, StringKind, StringLiteral};

use crate::AssistError;

/// Text of a literal as it reads inside a double quoted string.
pub(crate) fn double_quoted_content(literal: StringLiteral<'_>) -> Result<String, AssistError> {
    let (kind, text) = parts(literal)?;
    let content = match kind {
        StringKind::SingleQuoted => {
            escape_double_quoted(&decode_single_quoted(quoted_inner(text, '\'')?))
        }
        StringKind::DoubleQuoted => quoted_inner(text, '"')?.to_owned(),
        StringKind::Nowdoc => escape_double_quoted(&doc_body(text)?),
        StringKind::Heredoc => heredoc_to_double_quoted(&doc_body(text)?),
    };
    Ok(content)
}

/// Text of a literal as it reads inside a heredoc body.
pub(crate) fn heredoc_content(literal: StringLiteral<'_>) -> Result<String, AssistError> {
    let (kind, text) = parts(literal)?;
    let content = match kind {
        StringKind::SingleQuoted => {
            escape_heredoc(&decode_single_quoted(quoted_inner(text, '\'')?))
        }
        StringKind::DoubleQuoted => double_quoted_to_heredoc(quoted_inner(text, '"')?),
        StringKind::Nowdoc => escape_heredoc(&doc_body(text)?),
        StringKind::Heredoc => doc_body(text)?,
    };
    Ok(content)
}

fn parts(literal: StringLiteral<'_>) -> Result<(StringKind, &str), AssistError> {
    let token = literal.token().ok_or_else(|| malformed(literal.syntax().text_trimmed()))?;
    let kind = literal.kind().ok_or_else(|| malformed(token.text_trimmed()))?;
    Ok((kind, token.text_trimmed()))
}

fn malformed(text: &str) -> AssistError {
    AssistError::MalformedLiteral(format!("malformed string literal `{text}`"))
}

fn quoted_inner(text: &str, quote: char) -> Result<&str, AssistError> {
    text.strip_prefix(quote)
        .and_then(|rest| rest.strip_suffix(quote))
        .filter(|inner| !ends_with_escape(inner))
        .ok_or_else(|| malformed(text))
}

/// `true` when `text` ends in an odd run of backslashes.
fn ends_with_escape(text: &str) -> bool {
    let run = text.len() - text.trim_end_matches('\\').len();
    run % 2 == 1
}

/// Body of a heredoc or nowdoc with the closing line's indentation removed.
fn doc_body(text: &str) -> Result<String, AssistError> {
    let (_, rest) = text.split_once('\n').ok_or_else(|| malformed(text))?;
    let (body, closing) = match rest.rsplit_once('\n') {
        Some((body, closing)) => (Some(body), closing),
        None => (None, rest),
    };
    let Some(body) = body else {
        return Ok(String::new());
    };

    let indent = &closing[..closing.len() - closing.trim_start_matches([' ', '\t']).len()];
    let lines: Vec<_> = body
        .split('\n')
        .map(|line| line.strip_prefix(indent).unwrap_or(line).trim_end_matches('\r'))
        .collect();
    Ok(lines.join("\n"))
}

pub(crate) fn decode_single_quoted(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && matches!(chars.peek(), Some('\\' | '\'')) {
            out.extend(chars.next());
        } else {
            out.push(c);
        }
    }
    out
}

fn escape_double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '"' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub(crate) fn escape_heredoc(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn heredoc_to_double_quoted(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('"') => out.push_str(r#"\\\""#),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn double_quoted_to_heredoc(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some(next) => {
                out.push('\\');
                out.push(next);
            }
            None => out.push('\\'),
        }
    }
    out
}
