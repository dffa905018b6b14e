use std::sync::Arc;

use domain_upload::{
    repository::FileIndexRepo,
    service::{AliasService, ArtifactService, MergeService, UploadService},
};
use getset::Getters;
use infrastructure_file_index::JsonFileIndexRepo;
use service_upload::*;

use super::config::UploadConfig;

/// Every service of the store, built once and shared by all workers.
#[derive(Clone, Getters)]
#[getset(get = "pub")]
pub struct ServiceProvider {
    config: UploadConfig,
    storage_root: StorageRoot,
    index_repo: Arc<dyn FileIndexRepo>,
    upload_service: Arc<dyn UploadService>,
    merge_service: Arc<dyn MergeService>,
    alias_service: Arc<dyn AliasService>,
    artifact_service: Arc<dyn ArtifactService>,
}

impl ServiceProvider {
    pub fn build(config: UploadConfig) -> anyhow::Result<Self> {
        let storage = config.storage();
        if storage.root().is_empty() {
            anyhow::bail!("storage.root must not be empty");
        }
        let storage_root = StorageRoot::builder()
            .base(storage.root())
            .index_file_name(storage.index_file())
            .build();
        let index_repo: Arc<dyn FileIndexRepo> =
            Arc::new(JsonFileIndexRepo::new(storage_root.index_path()));
        let stage = Arc::new(LocalChunkStageServiceImpl::builder().base(storage.root()).build());
        // Shared, so uploads, merges and removals of one hash exclude each other.
        let locks = Arc::new(HashLocks::new());

        Ok(Self {
            upload_service: Arc::new(
                UploadServiceImpl::builder()
                    .index_repo(index_repo.clone())
                    .stage(stage.clone())
                    .locks(locks.clone())
                    .build(),
            ),
            merge_service: Arc::new(
                MergeServiceImpl::builder()
                    .index_repo(index_repo.clone())
                    .stage(stage)
                    .locks(locks.clone())
                    .root(storage_root.clone())
                    .build(),
            ),
            alias_service: Arc::new(
                AliasServiceImpl::builder()
                    .index_repo(index_repo.clone())
                    .locks(locks.clone())
                    .root(storage_root.clone())
                    .build(),
            ),
            artifact_service: Arc::new(
                ArtifactServiceImpl::builder()
                    .index_repo(index_repo.clone())
                    .locks(locks)
                    .root(storage_root.clone())
                    .build(),
            ),
            index_repo,
            storage_root,
            config,
        })
    }
}
