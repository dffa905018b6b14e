use std::io::ErrorKind;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use domain_upload::{
    exception::{UploadException, UploadResult},
    model::vo::{Artifact, ContentHash, FileName, StoredFile},
    repository::FileIndexRepo,
    service::ArtifactService,
};
use typed_builder::TypedBuilder;

use crate::{HashLocks, StorageRoot};

#[derive(TypedBuilder)]
pub struct ArtifactServiceImpl {
    index_repo: Arc<dyn FileIndexRepo>,
    locks: Arc<HashLocks>,
    root: StorageRoot,
}

#[async_trait]
impl ArtifactService for ArtifactServiceImpl {
    async fn list(&self) -> UploadResult<Vec<StoredFile>> {
        Ok(self.index_repo.load().await?.stored_files())
    }

    async fn fetch(&self, hash: &ContentHash, file_name: &FileName) -> UploadResult<Artifact> {
        let not_found = || UploadException::NotFound {
            hash: hash.to_string(),
            file_name: Some(file_name.to_string()),
        };
        // Held while opening so a concurrent removal can't pull the file away in between.
        let _guard = self.locks.lock(hash).await;
        let names = self.index_repo.lookup(hash).await?.ok_or_else(not_found)?;
        if !names.contains(file_name) {
            return Err(not_found());
        }
        let canonical = names[0].to_owned();
        let path = self.root.base().join(canonical.as_str());
        let file = match tokio::fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("{hash} is indexed as {canonical} but {path:?} is missing.");
                return Err(not_found());
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("can't open artifact {path:?}"))
                    .into())
            }
        };
        let len = file
            .metadata()
            .await
            .with_context(|| format!("can't stat artifact {path:?}"))?
            .len();
        Ok(Artifact {
            file,
            len,
            canonical,
            download_name: file_name.to_owned(),
        })
    }
}
