pub use hereby_errors::Diagnostic;
use hereby_inputs::File;
use hereby_parse::FileParse as _;
use salsa::Database;

#[salsa::db]
#[derive(Clone, Default)]
pub struct RootDatabase {
    storage: salsa::Storage<Self>,
}

#[salsa::db]
impl Database for RootDatabase {}

/// Syntax diagnostics of `file`, ordered by position.
pub fn check_file(db: &dyn Database, file: File) -> &[Diagnostic] {
    file.parse(db).diagnostics()
}
