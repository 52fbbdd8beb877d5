use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tower_lsp::lsp_types::Position;
use tower_lsp::{LspService, Server};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use sailsnav_lsp::definition;
use sailsnav_lsp::{Backend, CursorQuery, ModuleIndex, Settings};

/// Go-to-definition for Sails.js services and models.
#[derive(Parser)]
#[command(name = "sailsnav", version, about)]
struct Cli {
    /// Communicate over stdin/stdout (the default; accepted for editor
    /// compatibility).
    #[arg(long = "stdio", global = true)]
    _stdio: bool,

    /// Directory to index, relative to the workspace root.  Repeat for
    /// several directories; later ones win on name clashes.  Replaces
    /// `definitionPaths` from any settings.
    #[arg(long = "definition-path", value_name = "DIR", global = true)]
    definition_paths: Vec<String>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve one position and print the location as JSON.
    Resolve {
        /// JavaScript file containing the reference.
        file: PathBuf,
        /// 0-based line of the cursor.
        line: u32,
        /// 0-based UTF-16 column of the cursor.
        column: u32,
        /// Workspace root the definition paths are relative to.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn run_resolve(
    file: PathBuf,
    line: u32,
    column: u32,
    root: PathBuf,
    overrides: &[String],
) -> ExitCode {
    let settings = Settings::load(Some(root.as_path()), None, overrides);
    let index = ModuleIndex::build(&root, &settings.definition_paths);

    let text = match std::fs::read_to_string(&file) {
        Ok(text) => text,
        Err(e) => {
            error!(file = %file.display(), error = %e, "cannot read file");
            return ExitCode::FAILURE;
        }
    };
    let query = CursorQuery {
        text: &text,
        position: Position {
            line,
            character: column,
        },
    };

    let location = match definition::resolve(&query, &index) {
        Ok(definition) => definition.to_location(),
        Err(e) => {
            warn!(error = %e, "no definition");
            return ExitCode::FAILURE;
        }
    };

    match location.map(|l| serde_json::to_string_pretty(&l)) {
        Some(Ok(json)) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Some(Err(e)) => {
            error!(error = %e, "cannot serialize location");
            ExitCode::FAILURE
        }
        None => {
            warn!("definition path is not absolute; pass an absolute --root");
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Some(Command::Resolve {
        file,
        line,
        column,
        root,
    }) = cli.command
    {
        let root = std::path::absolute(&root).unwrap_or(root);
        return run_resolve(file, line, column, root, &cli.definition_paths);
    }

    let overrides = cli.definition_paths;
    let (service, socket) =
        LspService::new(move |client| Backend::new(client).with_path_overrides(overrides));
    Server::new(tokio::io::stdin(), tokio::io::stdout(), socket)
        .serve(service)
        .await;
    ExitCode::SUCCESS
}
