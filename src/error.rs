use std::io;
use std::path::PathBuf;

/// Fatal engine errors.
///
/// Anything that reaches `main` as an `Error` ends the process with a non-zero
/// status. Script failures inside callbacks and failed hot reloads are *not*
/// represented here: they are logged where they happen and the engine keeps
/// running.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("game path {0} should be a directory")]
    NotADirectory(PathBuf),

    #[error("expected a main.lua to exist in the game directory {0}")]
    MissingEntryScript(PathBuf),

    #[error("{0} already exists, refusing to overwrite it")]
    AlreadyExists(PathBuf),

    #[error("failed to allocate a {width}x{height} cell grid")]
    Allocation { width: usize, height: usize },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    ConfigValue(String),

    #[error("failed to decode font atlas {}: {source}", path.display())]
    Atlas {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("font atlas {}x{} is smaller than one {cell_w}x{cell_h} cell", size.0, size.1)]
    AtlasSize { size: (u32, u32), cell_w: u32, cell_h: u32 },

    #[error("failed to run {}: {source}", path.display())]
    Script {
        path: PathBuf,
        #[source]
        source: mlua::Error,
    },

    #[error("GPU setup failed: {0}")]
    Gpu(String),

    #[error(transparent)]
    Window(#[from] winit::error::OsError),

    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}
