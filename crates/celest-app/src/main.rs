//! Headless Celest host.
//!
//! `celest <project-dir> [status|touch|tree]` opens a project folder through
//! the native file storage. `celest shortcuts` lists canvas shortcuts.

mod shortcuts;

use celest_core::persistence::{SaveStatus, SaveUiState, ViewId};
use celest_core::{AutosaveConfig, FileStorage, PersistenceError, ProjectSession, ProjectStore, StorageError, Viewport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

const USAGE: &str = "usage: celest <project-dir> [status|touch|tree] | celest shortcuts";

#[derive(Debug, Error)]
enum AppError {
    #[error("missing project folder")]
    Usage,
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("cannot open project folder: {0}")]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("save failed: {0}")]
    SaveFailed(String),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Status,
    Touch,
    Tree,
}

impl Command {
    fn parse(arg: Option<&str>) -> Result<Self, AppError> {
        match arg {
            None | Some("status") => Ok(Command::Status),
            Some("touch") => Ok(Command::Touch),
            Some("tree") => Ok(Command::Tree),
            Some(other) => Err(AppError::UnknownCommand(other.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusReport {
    project: String,
    nodes: usize,
    edges: usize,
    active_view: ViewId,
    viewport: Viewport,
    selected: Vec<String>,
    save: SaveUiState,
}

fn project_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

fn run(args: &[String]) -> Result<(), AppError> {
    let Some(first) = args.first() else {
        return Err(AppError::Usage);
    };
    if first == "shortcuts" {
        shortcuts::print_all();
        return Ok(());
    }

    let dir = PathBuf::from(first);
    let command = Command::parse(args.get(1).map(String::as_str))?;

    let storage = Arc::new(FileStorage::new(&dir)?);
    let store = ProjectStore::new(storage, AutosaveConfig::default());
    let now = Instant::now();
    let mut session = pollster::block_on(ProjectSession::open(project_name(&dir), store, now))?;

    match command {
        Command::Status => {
            let report = StatusReport {
                project: session.id().to_string(),
                nodes: session.graph().node_count(),
                edges: session.graph().edge_count(),
                active_view: session.views().active_view_id,
                viewport: session.active_viewport(),
                selected: session.selection().iter().cloned().collect(),
                save: session.save_ui(),
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Touch => {
            pollster::block_on(session.flush(now));
            let save = session.save_ui();
            if save.status == SaveStatus::Error {
                return Err(AppError::SaveFailed(save.last_error.unwrap_or_default()));
            }
            log::info!("Wrote {}", dir.join(celest_core::persistence::STATE_DIR).display());
            println!("{}", save.label());
        }
        Command::Tree => {
            let snapshot = pollster::block_on(session.store().scan_tree())?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::Storage(StorageError::PermissionDenied(path))) => {
            log::error!("Permission denied opening {}", path);
            eprintln!("celest: permission denied: {}. Grant read/write access to the folder.", path);
            ExitCode::FAILURE
        }
        Err(e @ (AppError::Usage | AppError::UnknownCommand(_))) => {
            eprintln!("celest: {}\n{}", e, USAGE);
            ExitCode::from(2)
        }
        Err(e) => {
            log::error!("{}", e);
            eprintln!("celest: {}", e);
            ExitCode::FAILURE
        }
    }
}
