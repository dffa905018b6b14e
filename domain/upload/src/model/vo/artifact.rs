use serde::Serialize;

use super::{ContentHash, FileName};

/// One alias of stored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub hash: ContentHash,
    pub file_name: FileName,
}

/// A stored artifact opened for reading.
pub struct Artifact {
    pub file: tokio::fs::File,
    pub len: u64,
    /// Name of the file on disk.
    pub canonical: FileName,
    /// Name the client asked for.
    pub download_name: FileName,
}

/// What removing an alias did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasRemoval {
    /// The name wasn't an alias of the content.
    NotAnAlias,
    /// A non canonical alias was dropped, the artifact is untouched.
    Dropped,
    /// The canonical alias was dropped and the artifact now lives under `canonical`.
    Promoted { canonical: FileName },
    /// The last alias was dropped together with the artifact.
    Deleted,
}
