use std::fmt;

use serde::Serialize;

use super::{ContentHash, FileName};

/// Outcome of a merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedFile {
    pub hash: ContentHash,
    pub file_name: FileName,
    /// The content was already stored, only the alias was registered.
    pub deduplicated: bool,
}

/// Step of a merge that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStep {
    CreateArtifact,
    AppendChunk { index: u64 },
    CommitArtifact,
    ClearStage,
}

impl fmt::Display for MergeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStep::CreateArtifact => write!(f, "creating the artifact"),
            MergeStep::AppendChunk { index } => write!(f, "appending chunk {index}"),
            MergeStep::CommitArtifact => write!(f, "committing the artifact"),
            MergeStep::ClearStage => write!(f, "clearing the staged chunks"),
        }
    }
}
