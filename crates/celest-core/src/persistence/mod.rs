//! Project persistence: file formats, versioning, backups and autosave.

mod autosave;
mod backup;
mod error;
mod format;
mod migrate;
mod store;

pub use autosave::{
    AutosaveConfig,
    AutosaveState,
    DEFAULT_AUTOSAVE_DEBOUNCE_MS,
    DEFAULT_MAX_BACKUPS,
    DirtySource,
    FlushTicket,
    SaveStatus,
    SaveUiState,
    ScheduledTask,
};
pub use backup::{backup_name, load_from_backups, rotate_backups};
pub use error::{ErrorKind, PersistenceError, PersistenceResult};
pub use format::{
    CURRENT_VERSION,
    CanvasUi,
    FileMeta,
    FsTreeUi,
    GraphFileV1,
    GraphsState,
    MAIN_GRAPH_FILE,
    MAIN_GRAPH_ID,
    UiState,
    ViewId,
    Viewports,
    ViewsState,
    WORKSPACE_FILE,
    WorkspaceFileV1,
    now_timestamp,
    state_path,
};
pub use migrate::{decode, file_version, migrate};
pub use store::ProjectStore;

pub use crate::storage::STATE_DIR;
