use std::collections::BTreeSet;

use async_trait::async_trait;
use mockall::mock;

use crate::{
    command::StageChunkCommand,
    exception::UploadResult,
    model::{
        entity::FileIndex,
        vo::{ContentHash, FileName},
    },
    repository::FileIndexRepo,
    service::ChunkStageService,
};

mock! {
    pub FileIndexRepo {}
    #[async_trait]
    impl FileIndexRepo for FileIndexRepo {
        async fn load(&self) -> UploadResult<FileIndex>;
        async fn lookup(&self, hash: &ContentHash) -> UploadResult<Option<Vec<FileName>>>;
        async fn put_alias(&self, hash: &ContentHash, file_name: &FileName)
            -> UploadResult<Vec<FileName>>;
        async fn drop_alias(
            &self,
            hash: &ContentHash,
            file_name: &FileName,
        ) -> UploadResult<Option<Vec<FileName>>>;
    }
}

mock! {
    pub ChunkStageService {}
    #[async_trait]
    impl ChunkStageService for ChunkStageService {
        async fn has_chunk(&self, hash: &ContentHash, index: u64) -> UploadResult<bool>;
        async fn is_staged(&self, hash: &ContentHash) -> UploadResult<bool>;
        async fn write_chunk(&self, cmd: &StageChunkCommand) -> UploadResult<()>;
        async fn list_chunks(&self, hash: &ContentHash) -> UploadResult<BTreeSet<u64>>;
        async fn open_chunk(&self, hash: &ContentHash, index: u64) -> std::io::Result<tokio::fs::File>;
        async fn clear(&self, hash: &ContentHash) -> std::io::Result<()>;
    }
}
