//! Error taxonomy.
//!
//! - `LogicError`: the sketch misused the API (fatal, reported at error level)
//! - `BackendError`: a renderer call failed (warning unless policy escalates)
//! - `DrawError`: what drawing-API calls hand back to sketch callbacks
//! - `StartupError`: bring-up failed before the scheduler started

use thiserror::Error;

/// Sketch-side misuse of the drawing API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogicError {
    #[error("begin_shape called while another shape is open")]
    ShapeAlreadyOpen,

    #[error("{0} called without an open shape")]
    NoOpenShape(&'static str),

    #[error("curve vertex needs a preceding vertex to start from")]
    CurveWithoutStart,

    #[error("unknown shape kind {0}")]
    UnknownShapeKind(i32),

    #[error("unknown close mode {0}")]
    UnknownCloseMode(i32),

    #[error("unknown anchor mode {0}")]
    UnknownAnchorMode(i32),

    #[error("unknown cursor type {0}")]
    UnknownCursor(i32),

    #[error("begin_camera called inside a camera block")]
    CameraBlockOpen,

    #[error("end_camera called without begin_camera")]
    NoCameraBlock,
}

/// Failure reported by a renderer implementation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BackendError {
    #[error("{backend} backend does not support {op}")]
    Unsupported {
        backend: &'static str,
        op: &'static str,
    },

    #[error("matrix stack underflow")]
    StackUnderflow,

    #[error("matrix stack overflow at depth {0}")]
    StackOverflow(usize),

    #[error("invalid argument to {op}: {reason}")]
    InvalidArgument { op: &'static str, reason: String },

    #[error("device error: {0}")]
    Device(String),
}

pub type BackendResult<T = ()> = Result<T, BackendError>;

/// Error returned from drawing-API calls.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DrawError {
    #[error(transparent)]
    Logic(#[from] LogicError),

    /// A backend failure the report policy classified as fatal.
    #[error("backend failure: {0}")]
    Backend(#[from] BackendError),
}

pub type DrawResult<T = ()> = Result<T, DrawError>;

/// Bring-up failures. None of these leave a partially started sketch behind.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("no backend registered as {name:?} (available: {available})")]
    BackendNotFound { name: String, available: String },

    #[error("backend {active:?} is already active; only one backend may run per process")]
    BackendAlreadyActive { active: String },

    #[error("backend {name:?} failed to initialize")]
    BackendInit {
        name: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("sketch has no setup callback")]
    MissingSetup,

    #[error("setup failed")]
    Setup(#[source] DrawError),
}
