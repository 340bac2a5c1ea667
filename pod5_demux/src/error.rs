//! Error type of the demultiplexing pipeline.
use read_container::ContainerError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemuxError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{}: record {record}: {reason}", .path.display())]
    Parse {
        path: PathBuf,
        record: usize,
        reason: String,
    },
    #[error("{}: {source}", .path.display())]
    Container {
        path: PathBuf,
        #[source]
        source: ContainerError,
    },
    #[error("{}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write {} (input {}): {source}", .output.display(), describe(.input))]
    GroupWrite {
        output: PathBuf,
        input: Option<PathBuf>,
        #[source]
        source: ContainerError,
    },
    #[error("task for {} panicked: {message}", .output.display())]
    Panicked { output: PathBuf, message: String },
    #[error("invalid configuration: {0}")]
    Config(String),
}

fn describe(input: &Option<PathBuf>) -> String {
    match input {
        Some(path) => path.display().to_string(),
        None => "none".to_string(),
    }
}

impl DemuxError {
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        DemuxError::Io {
            path: path.into(),
            source,
        }
    }
    pub fn container<P: Into<PathBuf>>(path: P, source: ContainerError) -> Self {
        DemuxError::Container {
            path: path.into(),
            source,
        }
    }
    pub fn csv<P: Into<PathBuf>>(path: P, source: csv::Error) -> Self {
        DemuxError::Csv {
            path: path.into(),
            source,
        }
    }
}
