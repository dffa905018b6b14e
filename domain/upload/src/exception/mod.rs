use std::path::PathBuf;

use crate::model::vo::MergeStep;

pub type UploadResult<T> = Result<T, UploadException>;

#[derive(Debug, thiserror::Error)]
pub enum UploadException {
    #[error("Invalid request: {description}")]
    InvalidRequest { description: String },

    #[error("Chunk {index} of file with hash: {hash} can't be staged: {source}")]
    ChunkWrite {
        hash: String,
        index: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("File with hash: {hash} has {actual} staged chunks but {expected} were declared, missing: {missing:?}.")]
    IncompleteUpload {
        hash: String,
        expected: u64,
        actual: u64,
        missing: Vec<u64>,
    },

    #[error("File with hash: {hash}{} doesn't exist.", display_file_name(.file_name))]
    NotFound {
        hash: String,
        file_name: Option<String>,
    },

    #[error("Merging file with hash: {hash} failed at {step}: {source}")]
    MergeFailed {
        hash: String,
        step: MergeStep,
        #[source]
        source: std::io::Error,
    },

    #[error("File index at {path:?} is corrupted and must be repaired manually: {source}")]
    IndexCorruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Upload store internal error: {source}")]
    InternalError {
        #[source]
        source: anyhow::Error,
    },
}

fn display_file_name(file_name: &Option<String>) -> String {
    match file_name {
        Some(name) => format!(" and name: {name}"),
        None => String::new(),
    }
}

impl UploadException {
    /// Status code of the exception, follows http semantics.
    pub fn status(&self) -> u16 {
        use UploadException::*;
        match self {
            InvalidRequest { .. } => 400,
            NotFound { .. } => 404,
            IncompleteUpload { .. } => 409,
            ChunkWrite { .. } | MergeFailed { .. } | IndexCorruption { .. } | InternalError { .. } => {
                500
            }
        }
    }

    pub fn invalid(description: impl Into<String>) -> Self {
        UploadException::InvalidRequest {
            description: description.into(),
        }
    }
}

impl From<anyhow::Error> for UploadException {
    fn from(e: anyhow::Error) -> Self {
        UploadException::InternalError { source: e }
    }
}

impl From<std::io::Error> for UploadException {
    fn from(e: std::io::Error) -> Self {
        UploadException::InternalError { source: e.into() }
    }
}
