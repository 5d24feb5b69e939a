use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors from the overlap filter (FOFN resolution, line parsing, worker pool).
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("malformed overlap line at {file}:{line}: {message}")]
    MalformedLine {
        file: PathBuf,
        line: usize,
        message: String,
    },
    #[error("worker pool error in {file}: {message}")]
    Worker { file: PathBuf, message: String },
}

/// Errors from string-graph construction and reduction.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("malformed node name {0:?}, expected \"<id>:B\", \"<id>:E\" or \"NA\"")]
    InvalidNodeName(String),
    #[error("malformed overlap record at line {line}: {message}")]
    MalformedOverlap { line: usize, message: String },
    #[error("invariant violated: edge ({0:?}, {1:?}) has no twin")]
    MissingTwin(String, String),
}

/// Errors from the unitig/bundle/contig stages and output serialization.
#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors surfaced from the FOFN / serialization container.
#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("unknown extension for {0:?}, expected .json or .msgpack")]
    UnknownExtension(PathBuf),
    #[error("failed to parse {0:?} as json: {1}")]
    Json(PathBuf, serde_json::Error),
    #[error("failed to parse {0:?} as msgpack: {1}")]
    Msgpack(PathBuf, rmp_serde::decode::Error),
}

/// Top-level error type returned from `main`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Container(#[from] ContainerError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("{0}")]
    Other(String),
}
