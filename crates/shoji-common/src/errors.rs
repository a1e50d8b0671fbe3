use std::path::PathBuf;

use crate::id::ViewId;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failures of the cross-thread dispatcher itself.
///
/// A panic inside dispatched work is not represented here: it is re-raised
/// on the calling thread.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    #[error("shutdown in progress")]
    ShuttingDown,

    #[error("ui thread dropped the job before running it")]
    Abandoned,

    #[error("ui event loop is closed")]
    SchedulerClosed,
}

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("view creation failed: {0}")]
    CreationFailed(String),

    #[error("view {0} creation previously failed")]
    Unusable(ViewId),

    #[error("engine error: {0}")]
    Engine(String),
}

#[derive(Debug, thiserror::Error)]
pub enum MenuError {
    #[error("native menu error: {0}")]
    Native(String),

    #[error("icon error: {0}")]
    Icon(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("malformed bridge envelope: {0}")]
    MalformedEnvelope(String),

    #[error("unknown bridge channel: {0}")]
    UnknownChannel(String),

    #[error("channel {channel} rejected: {reason}")]
    Rejected {
        channel: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("window creation failed: {0}")]
    WindowCreation(String),

    #[error("not supported: {0}")]
    NotSupported(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Menu(#[from] MenuError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
