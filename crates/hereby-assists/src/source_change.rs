use text_size::{TextRange, TextSize};

/// Replacement of `delete` by `insert`; an empty `delete` is a pure insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Indel {
    pub insert: String,
    pub delete: TextRange,
}

impl Indel {
    pub fn insert(offset: TextSize, text: String) -> Self {
        Self { insert: text, delete: TextRange::empty(offset) }
    }

    pub fn replace(range: TextRange, text: String) -> Self {
        Self { insert: text, delete: range }
    }
}

/// Sorted, non-overlapping edits against one version of a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceChange {
    indels: Vec<Indel>,
}

impl SourceChange {
    pub(crate) fn new(indels: Vec<Indel>) -> Self {
        debug_assert!(indels.windows(2).all(|w| w[0].delete.end() <= w[1].delete.start()));
        Self { indels }
    }

    pub fn indels(&self) -> &[Indel] {
        &self.indels
    }

    pub fn is_empty(&self) -> bool {
        self.indels.is_empty()
    }

    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut pos = 0;
        for indel in &self.indels {
            let start = usize::from(indel.delete.start());
            out.push_str(&text[pos..start]);
            out.push_str(&indel.insert);
            pos = indel.delete.end().into();
        }
        out.push_str(&text[pos..]);
        out
    }
}
