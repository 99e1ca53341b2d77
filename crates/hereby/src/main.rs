mod report;

use std::io::{self, Write as _};
use std::process::ExitCode;

use anyhow::Context as _;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hereby_errors::Renderer;
use hereby_ide::{Analysis, AssistConfig, AssistId, FilePosition};
use hereby_inputs::File;
use text_size::TextSize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "hereby", version, about = "Rewrites PHP ternaries and string concatenations")]
struct Options {
    /// Log every decision to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Reports syntax errors.
    Check { path: Utf8PathBuf },
    /// Lists the rewrites available at a position.
    Assists {
        path: Utf8PathBuf,
        #[command(flatten)]
        cursor: Cursor,
        #[arg(long)]
        json: bool,
    },
    /// Applies one rewrite and prints the resulting file.
    Apply {
        path: Utf8PathBuf,
        assist: AssistId,
        #[command(flatten)]
        cursor: Cursor,
        /// Overwrite the file instead of printing it.
        #[arg(long)]
        write: bool,
        /// Initializer for the declaration split off a ternary assignment.
        #[arg(long)]
        placeholder: Option<String>,
        /// Print the edits as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct Cursor {
    /// Byte offset into the file.
    #[arg(long, conflicts_with_all = ["line", "column"])]
    offset: Option<u32>,
    /// One-based line.
    #[arg(long, requires = "column")]
    line: Option<u32>,
    /// One-based byte column.
    #[arg(long, requires = "line")]
    column: Option<u32>,
}

impl Cursor {
    fn position(&self, analysis: &Analysis, file: File) -> anyhow::Result<FilePosition> {
        let db = analysis.db();
        let offset = match (self.offset, self.line, self.column) {
            (Some(offset), _, _) => {
                let len = file.text(db).len();
                anyhow::ensure!(offset as usize <= len, "offset {offset} is past the end ({len})");
                TextSize::new(offset)
            }
            (None, Some(line), Some(column)) => line
                .checked_sub(1)
                .zip(column.checked_sub(1))
                .and_then(|(line, column)| file.offset_at(db, line, column))
                .with_context(|| format!("{line}:{column} is not a position in the file"))?,
            _ => anyhow::bail!("pass `--offset` or both `--line` and `--column`"),
        };
        Ok(FilePosition { file, offset })
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let options = Options::parse();
    init_tracing(options.verbose);

    match options.command {
        Command::Check { path } => check(&path),
        Command::Assists { path, cursor, json } => {
            let (analysis, file) = load(&path, AssistConfig::default())?;
            let position = cursor.position(&analysis, file)?;
            let assists = analysis.assists(position);
            debug!(count = assists.len(), "available assists");

            let mut stdout = io::stdout().lock();
            if json {
                let text = file.text(analysis.db());
                let reports = report::assists(text, &assists);
                serde_json::to_writer_pretty(&mut stdout, &reports)?;
                writeln!(stdout)?;
            } else {
                for assist in &assists {
                    writeln!(stdout, "{}\t{}", assist.id, assist.label)?;
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Apply { path, assist, cursor, write, placeholder, json } => {
            let config = AssistConfig { split_placeholder: placeholder, ..AssistConfig::default() };
            let (mut analysis, file) = load(&path, config)?;
            let position = cursor.position(&analysis, file)?;
            apply(&mut analysis, position, assist, &path, write, json)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("HEREBY_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load(path: &Utf8Path, config: AssistConfig) -> anyhow::Result<(Analysis, File)> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("failed to read `{path}`"))?;
    let analysis = Analysis::new(config);
    let file = analysis.add_file(path.to_owned(), text);
    Ok((analysis, file))
}

fn check(path: &Utf8Path) -> anyhow::Result<ExitCode> {
    let (analysis, file) = load(path, AssistConfig::default())?;
    let diagnostics = analysis.diagnostics(file);

    let renderer = Renderer::styled();
    let text = file.text(analysis.db());
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic.render(&renderer, path.as_str(), text));
    }

    Ok(if diagnostics.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn apply(
    analysis: &mut Analysis,
    position: FilePosition,
    id: AssistId,
    path: &Utf8Path,
    write: bool,
    json: bool,
) -> anyhow::Result<ExitCode> {
    let change = analysis
        .apply_assist(position, id)
        .with_context(|| format!("cannot apply `{id}` at offset {:?}", position.offset))?;
    let text = position.file.text(analysis.db());

    if write {
        std::fs::write(path, text).with_context(|| format!("failed to write `{path}`"))?;
    }

    let mut stdout = io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, &report::change(path, &change))?;
        writeln!(stdout)?;
    } else if !write {
        stdout.write_all(text.as_bytes())?;
    }
    Ok(ExitCode::SUCCESS)
}
