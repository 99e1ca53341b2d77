use hereby_inputs::File;
use text_size::TextSize;

mod analysis;

pub use analysis::Analysis;
pub use hereby_assists::{
    Assist, AssistConfig, AssistError, AssistId, Indel, SourceChange, pick_best_token,
};
pub use hereby_db::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilePosition {
    pub file: File,
    pub offset: TextSize,
}
