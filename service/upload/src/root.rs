use std::path::{Path, PathBuf};

use domain_upload::{
    exception::{UploadException, UploadResult},
    model::vo::{ContentHash, FileName},
};
use typed_builder::TypedBuilder;
use uuid::Uuid;

/// Prefix of the temporary an artifact is assembled in.
pub(crate) const MERGING_PREFIX: &str = ".merging-";

/// Layout of the storage root: the index document, one staging directory per hash
/// and the artifacts, all side by side.
#[derive(TypedBuilder, Clone, Debug)]
pub struct StorageRoot {
    #[builder(setter(into))]
    base: PathBuf,
    #[builder(default = "md5.db".into(), setter(into))]
    index_file_name: String,
}

impl StorageRoot {
    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn index_file_name(&self) -> &str {
        &self.index_file_name
    }

    pub fn index_path(&self) -> PathBuf {
        self.base.join(&self.index_file_name)
    }

    pub fn stage_dir(&self, hash: &ContentHash) -> PathBuf {
        self.base.join(hash.as_str())
    }

    /// Where the artifact named `file_name` lives. The index document's name is refused.
    pub fn artifact_path(&self, file_name: &FileName) -> UploadResult<PathBuf> {
        if file_name.as_str() == self.index_file_name {
            return Err(UploadException::invalid(format!(
                r#"file name "{file_name}" is reserved"#
            )));
        }
        Ok(self.base.join(file_name.as_str()))
    }

    pub(crate) fn merge_temp_path(&self, hash: &ContentHash) -> PathBuf {
        self.base.join(format!("{MERGING_PREFIX}{hash}-{}", Uuid::new_v4()))
    }
}
