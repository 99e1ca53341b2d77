use hereby_assists::AssistContext;
use hereby_parse::{FileParse as _, ParseError, parse_text};
use salsa::Setter as _;
use tracing::{info, instrument, warn};

use crate::{Assist, AssistError, AssistId, FilePosition, SourceChange};

impl super::Analysis {
    pub fn assists(&self, FilePosition { file, offset }: FilePosition) -> Vec<Assist> {
        let root = file.parse(self.db()).syntax_node();
        hereby_assists::assists(&AssistContext::new(root, offset, self.config()))
    }

    /// Computes the edit of `id` without applying it.
    pub fn resolve_assist(
        &self,
        FilePosition { file, offset }: FilePosition,
        id: AssistId,
    ) -> Result<SourceChange, AssistError> {
        let root = file.parse(self.db()).syntax_node();
        hereby_assists::apply(id, &AssistContext::new(root, offset, self.config()))
    }

    /// Applies `id` to the file text once the result is known to parse as
    /// well as the current text does.
    #[instrument(skip(self), fields(file = %position.file.path(self.db())))]
    pub fn apply_assist(
        &mut self,
        position: FilePosition,
        id: AssistId,
    ) -> Result<SourceChange, AssistError> {
        let file = position.file;
        let change = self.resolve_assist(position, id)?;

        let text = change.apply(file.text(self.db()));
        let previous = file.parse(self.db()).diagnostics().len();
        let reparsed = parse_text(&text);
        if reparsed.diagnostics().len() > previous {
            warn!(previous, now = reparsed.diagnostics().len(), "rewrite introduced errors");
            return Err(ParseError { diagnostics: reparsed.diagnostics().to_vec() }.into());
        }

        file.set_text(self.db_mut()).to(text);
        info!(%id, "applied assist");
        Ok(change)
    }
}
