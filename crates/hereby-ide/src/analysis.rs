use camino::Utf8PathBuf;
use hereby_db::{Diagnostic, RootDatabase, check_file};
use hereby_inputs::File;

use crate::AssistConfig;

mod assists;

/// The database plus the configuration every request runs with.
#[derive(Default)]
pub struct Analysis {
    db: RootDatabase,
    config: AssistConfig,
}

impl Analysis {
    pub fn new(config: AssistConfig) -> Self {
        Self { db: RootDatabase::default(), config }
    }

    pub fn db(&self) -> &RootDatabase {
        &self.db
    }

    pub fn db_mut(&mut self) -> &mut RootDatabase {
        &mut self.db
    }

    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    pub fn add_file(&self, path: Utf8PathBuf, text: String) -> File {
        File::new(&self.db, path, text)
    }

    pub fn diagnostics(&self, file: File) -> &[Diagnostic] {
        check_file(&self.db, file)
    }
}
