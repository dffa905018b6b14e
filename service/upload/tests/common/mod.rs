#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use domain_upload::{
    command::{MergeCommand, StageChunkCommand},
    model::vo::{ContentHash, FileName, MergedFile},
    service::{MergeService, UploadService},
};
use infrastructure_file_index::JsonFileIndexRepo;
use service_upload::{
    AliasServiceImpl, ArtifactServiceImpl, HashLocks, LocalChunkStageServiceImpl,
    MergeServiceImpl, StorageRoot, UploadServiceImpl,
};
use tempfile::TempDir;

/// All services wired on a temporary storage root, the way the server wires them.
pub struct Store {
    pub root: TempDir,
    pub incoming: TempDir,
    pub index_repo: Arc<JsonFileIndexRepo>,
    pub upload: UploadServiceImpl,
    pub merge: MergeServiceImpl,
    pub alias: AliasServiceImpl,
    pub artifact: ArtifactServiceImpl,
}

impl Store {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let incoming = tempfile::tempdir().unwrap();
        let storage_root = StorageRoot::builder().base(root.path()).build();
        let index_repo = Arc::new(JsonFileIndexRepo::new(storage_root.index_path()));
        let stage = Arc::new(LocalChunkStageServiceImpl::builder().base(root.path()).build());
        let locks = Arc::new(HashLocks::new());
        Self {
            upload: UploadServiceImpl::builder()
                .index_repo(index_repo.clone())
                .stage(stage.clone())
                .locks(locks.clone())
                .build(),
            merge: MergeServiceImpl::builder()
                .index_repo(index_repo.clone())
                .stage(stage)
                .locks(locks.clone())
                .root(storage_root.clone())
                .build(),
            alias: AliasServiceImpl::builder()
                .index_repo(index_repo.clone())
                .locks(locks.clone())
                .root(storage_root.clone())
                .build(),
            artifact: ArtifactServiceImpl::builder()
                .index_repo(index_repo.clone())
                .locks(locks)
                .root(storage_root)
                .build(),
            index_repo,
            root,
            incoming,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.root.path().join(name)
    }

    pub fn stage_dir(&self, hash: &ContentHash) -> PathBuf {
        self.path(hash.as_str())
    }

    /// Stage `content` as chunk `index`, the way the transport hands it over.
    pub async fn stage(&self, hash: &ContentHash, index: u64, content: &[u8]) {
        let source = self.incoming.path().join(format!("{hash}-{index}-{}", content.len()));
        std::fs::write(&source, content).unwrap();
        let staged = self
            .upload
            .stage_chunk(StageChunkCommand {
                hash: hash.to_owned(),
                index,
                source,
            })
            .await
            .unwrap();
        assert_eq!(staged, index);
    }

    /// Stage every chunk of `chunks` and merge them into `file_name`.
    pub async fn upload(
        &self,
        hash: &ContentHash,
        file_name: &str,
        chunks: &[&[u8]],
    ) -> MergedFile {
        for (index, chunk) in chunks.iter().enumerate() {
            self.stage(hash, index as u64, chunk).await;
        }
        self.merge
            .merge(MergeCommand {
                hash: hash.to_owned(),
                file_name: name(file_name),
                expected_total: chunks.len() as u64,
            })
            .await
            .unwrap()
    }

    /// Files directly under the storage root, index and staging directories excluded.
    pub fn artifacts(&self) -> Vec<String> {
        let mut names: Vec<_> = std::fs::read_dir(self.root.path())
            .unwrap()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().unwrap().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n != "md5.db")
            .collect();
        names.sort();
        names
    }
}

pub fn hash(n: u32) -> ContentHash {
    format!("{n:032x}").parse().unwrap()
}

pub fn name(s: &str) -> FileName {
    s.parse().unwrap()
}

pub fn read(path: &Path) -> Vec<u8> {
    std::fs::read(path).unwrap()
}
