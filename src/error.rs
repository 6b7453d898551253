//! Error types for the benchmarking harness.

use std::path::PathBuf;

use thiserror::Error;

/// Problems found while resolving an [`EvaluationConfig`](crate::EvaluationConfig).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unrecognized reinit strategy '{0}' (expected immediate, delayed or one_init)")]
    UnknownStrategy(String),
    #[error("reinit strategy 'delayed' requires delay_frames >= 1")]
    MissingDelayFrames,
    #[error("invalid threshold {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("failed to read config file {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Ground-truth loading failures. These abort the whole run.
#[derive(Debug, Error)]
pub enum GroundTruthError {
    #[error("failed to read ground truth {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed ground truth row at line {line}: {message}")]
    MalformedRow { line: usize, message: String },
    #[error("ground truth contains no annotations")]
    Empty,
    #[error("dataset {0} has no ground truth file")]
    Missing(String),
}

/// Result export failures. Reported, never fatal.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("YAML error writing {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Frame source read failure. Terminates the current sequence's loop.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("frame read failed: {0}")]
pub struct FrameError(pub String);

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    GroundTruth(#[from] GroundTruthError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Frame(#[from] FrameError),
    #[error("no trackers registered")]
    NoTrackers,
    #[error("no frames available to initialize sequence")]
    NoFirstFrame,
    #[error("no ground truth for first frame")]
    NoInitialAnnotation,
    #[error("comparator is not initialized with a sequence")]
    NotInitialized,
}

pub type Result<T> = std::result::Result<T, Error>;
