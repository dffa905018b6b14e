use actix_easy_multipart::{tempfile::Tempfile, text::Text, MultipartForm};
use domain_upload::model::vo::{AliasRemoval, FileName, MergedFile, ProbeResult, StoredFile};
use serde::{Deserialize, Serialize};

/// Identifies one alias of some content.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRequest {
    pub md5: String,
    pub file_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub md5: String,
    pub file_name: String,
    /// Number of chunks the client sent.
    pub total: u64,
}

#[derive(MultipartForm)]
pub struct UploadChunkForm {
    pub md5: Text<String>,
    pub index: Text<u64>,
    pub data: Vec<Tempfile>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub exist: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub chunk_list: Option<Vec<u64>>,
}

impl From<ProbeResult> for CheckResponse {
    fn from(probed: ProbeResult) -> Self {
        Self {
            exist: probed.exists(),
            chunk_list: probed.staged_chunks().map(<[u64]>::to_vec),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UploadChunkResponse {
    pub md5: String,
    pub chunk: u64,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct MergeResponse {
    pub md5: String,
    pub file_name: String,
    pub deduplicated: bool,
}

impl From<MergedFile> for MergeResponse {
    fn from(merged: MergedFile) -> Self {
        Self {
            md5: merged.hash.to_string(),
            file_name: merged.file_name.to_string(),
            deduplicated: merged.deduplicated,
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub md5: String,
    pub file_names: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RemovalKind {
    NotAnAlias,
    Dropped,
    Promoted,
    Deleted,
}

#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub md5: String,
    pub file_name: String,
    pub result: RemovalKind,
    /// Name the artifact is stored under after a promotion.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub canonical: Option<String>,
}

impl DeleteResponse {
    pub fn new(md5: String, file_name: &FileName, removal: AliasRemoval) -> Self {
        let (result, canonical) = match removal {
            AliasRemoval::NotAnAlias => (RemovalKind::NotAnAlias, None),
            AliasRemoval::Dropped => (RemovalKind::Dropped, None),
            AliasRemoval::Promoted { canonical } => {
                (RemovalKind::Promoted, Some(canonical.to_string()))
            }
            AliasRemoval::Deleted => (RemovalKind::Deleted, None),
        };
        Self {
            md5,
            file_name: file_name.to_string(),
            result,
            canonical,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FileStatus {
    Uploaded,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub md5: String,
    pub name: String,
    /// Always 100, stored files are complete.
    pub percent: u8,
    pub status: FileStatus,
}

impl From<StoredFile> for FileEntry {
    fn from(stored: StoredFile) -> Self {
        Self {
            md5: stored.hash.to_string(),
            name: stored.file_name.to_string(),
            percent: 100,
            status: FileStatus::Uploaded,
        }
    }
}
