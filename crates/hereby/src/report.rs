use camino::Utf8Path;
use hereby_ide::{Assist, SourceChange};
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct AssistReport {
    id: &'static str,
    label: &'static str,
    start: u32,
    end: u32,
    /// One-based line of `start`.
    line: usize,
}

#[derive(Serialize)]
pub(crate) struct ChangeReport<'a> {
    path: &'a str,
    edits: Vec<EditReport<'a>>,
}

#[derive(Serialize)]
struct EditReport<'a> {
    start: u32,
    end: u32,
    insert: &'a str,
}

pub(crate) fn assists(text: &str, assists: &[Assist]) -> Vec<AssistReport> {
    assists
        .iter()
        .map(|assist| {
            let start = assist.target.start();
            AssistReport {
                id: assist.id.as_str(),
                label: assist.label,
                start: start.into(),
                end: assist.target.end().into(),
                line: text[..usize::from(start)].matches('\n').count() + 1,
            }
        })
        .collect()
}

pub(crate) fn change<'a>(path: &'a Utf8Path, change: &'a SourceChange) -> ChangeReport<'a> {
    let edits = change
        .indels()
        .iter()
        .map(|indel| EditReport {
            start: indel.delete.start().into(),
            end: indel.delete.end().into(),
            insert: &indel.insert,
        })
        .collect();
    ChangeReport { path: path.as_str(), edits }
}
