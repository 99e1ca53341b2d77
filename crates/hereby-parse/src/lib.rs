use hereby_errors::Diagnostic;
use hereby_inputs::File;
use hereby_yellow::{SyntaxNode, SyntaxTree};
use salsa::Database;

mod grammar;
mod parser;
#[cfg(test)]
mod tests;

/// A lossless tree together with the errors found while building it.
#[derive(Debug)]
pub struct Parse {
    tree: SyntaxTree,
    diagnostics: Vec<Diagnostic>,
}

impl Parse {
    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn syntax_node(&self) -> SyntaxNode<'_> {
        self.tree.root()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Tree dump followed by the diagnostics, one per line.
    pub fn debug_tree(&self) -> String {
        let mut out = self.syntax_node().debug_dump();
        if self.has_errors() {
            out.push_str("Errors:\n");
            for diagnostic in &self.diagnostics {
                out.push_str(&format!("  {:?} {}\n", diagnostic.range(), diagnostic.message()));
            }
        }
        out
    }
}

unsafe impl salsa::Update for Parse {
    unsafe fn maybe_update(old_pointer: *mut Self, new_value: Self) -> bool {
        let old_value = unsafe { &mut *old_pointer };
        if old_value.tree.text() == new_value.tree.text() {
            false
        } else {
            *old_value = new_value;
            true
        }
    }
}

/// A fragment that did not parse cleanly.
#[derive(Debug, thiserror::Error)]
#[error("fragment does not parse: {}", .diagnostics.first().map_or("", |it| it.message()))]
pub struct ParseError {
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses a whole source file, open tag included.
pub fn parse_text(text: &str) -> Parse {
    let mut parser = parser::Parser::new(text);
    grammar::items::source_file(&mut parser);
    parser.build_tree()
}

/// Parses statements written without an open tag, such as `$x = 0;`.
pub fn parse_fragment(text: &str) -> Result<Parse, ParseError> {
    let mut parser = parser::Parser::new(text);
    grammar::items::fragment(&mut parser);
    let parse = parser.build_tree();
    if parse.has_errors() {
        return Err(ParseError { diagnostics: parse.diagnostics });
    }
    Ok(parse)
}

pub trait FileParse {
    fn parse(self, db: &dyn Database) -> &Parse;
}

#[salsa::tracked]
impl FileParse for File {
    #[salsa::tracked(returns(ref), no_eq)]
    fn parse(self, db: &dyn Database) -> Parse {
        parse_text(self.text(db))
    }
}
