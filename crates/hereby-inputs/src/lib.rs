pub use line_index::{LineCol, LineIndex, TextSize};

#[salsa::input(debug)]
pub struct File {
    #[returns(ref)]
    pub path: camino::Utf8PathBuf,
    #[returns(deref)]
    pub text: String,
}

#[salsa::tracked]
impl File {
    #[salsa::tracked(returns(ref), no_eq)]
    pub fn line_index(self, db: &dyn salsa::Database) -> LineIndex {
        LineIndex::new(self.text(db))
    }
}

impl File {
    /// Converts a zero-based line and byte column into an offset.
    pub fn offset_at(self, db: &dyn salsa::Database, line: u32, col: u32) -> Option<TextSize> {
        let offset = self.line_index(db).offset(LineCol { line, col })?;
        (usize::from(offset) <= self.text(db).len()).then_some(offset)
    }
}

#[cfg(test)]
mod tests {
    use salsa::{DatabaseImpl, Setter as _};

    use super::File;

    #[test]
    fn offsets_follow_edits() {
        let mut db = DatabaseImpl::new();
        let file = File::new(&db, "a.php".into(), "<?php\n$x = 1;\n".to_owned());

        assert_eq!(file.offset_at(&db, 1, 1), Some(7.into()));

        file.set_text(&mut db).to("<?php\n\n$x = 1;\n".to_owned());
        assert_eq!(file.offset_at(&db, 2, 1), Some(8.into()));
    }
}
