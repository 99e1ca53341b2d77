use hereby_yellow::SyntaxNode;
use text_size::TextRange;
use tracing::debug;

use crate::AssistError;
use crate::source_change::{Indel, SourceChange};
use crate::synthesize::Hoist;

/// Collects the edits of one rewrite around its anchor statement.
pub struct Splicer<'a> {
    anchor: SyntaxNode<'a>,
    indels: Vec<Indel>,
}

impl<'a> Splicer<'a> {
    pub fn new(anchor: SyntaxNode<'a>) -> Self {
        Self { anchor, indels: Vec::new() }
    }

    /// Whitespace between the start of the anchor's line and its first token,
    /// or `None` when other code precedes the anchor on that line.
    fn indentation(&self) -> Option<&'a str> {
        let text = self.anchor.source_text();
        let start = usize::from(self.anchor.trimmed_range().start());
        let line_start = text[..start].rfind('\n').map_or(0, |it| it + 1);
        let prefix = &text[line_start..start];
        prefix.chars().all(|c| c == ' ' || c == '\t').then_some(prefix)
    }

    /// Inserts each hoisted statement, in order, on its own line above the anchor.
    pub fn insert_before(&mut self, hoists: &[Hoist]) {
        if hoists.is_empty() {
            return;
        }

        let separator = match self.indentation() {
            Some(indent) => format!("\n{indent}"),
            None => " ".to_owned(),
        };
        let text: String =
            hoists.iter().map(|hoist| format!("{}{separator}", hoist.text)).collect();
        debug!(count = hoists.len(), "hoisting statements");
        self.indels.push(Indel::insert(self.anchor.trimmed_range().start(), text));
    }

    pub fn replace(&mut self, range: TextRange, text: String) {
        self.indels.push(Indel::replace(range, text));
    }

    pub fn finish(mut self) -> Result<SourceChange, AssistError> {
        // Insertions sort before a replacement starting at the same offset.
        self.indels.sort_by_key(|indel| (indel.delete.start(), !indel.delete.is_empty()));
        if self.indels.windows(2).any(|w| w[0].delete.end() > w[1].delete.start()) {
            return Err(AssistError::StructuralMismatch("edits overlap".to_owned()));
        }
        Ok(SourceChange::new(self.indels))
    }
}
