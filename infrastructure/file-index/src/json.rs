use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use domain_upload::{
    exception::{UploadException, UploadResult},
    model::{
        entity::FileIndex,
        vo::{ContentHash, FileName},
    },
    repository::FileIndexRepo,
};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

/// File index kept in a single json object `{hash: [names]}`.
///
/// The document is cached after the first successful read. All accesses go through
/// one mutex, and a mutation only reaches the cache after it reached the disk.
pub struct JsonFileIndexRepo {
    path: PathBuf,
    document: Mutex<Option<FileIndex>>,
}

impl JsonFileIndexRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> UploadResult<FileIndex> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("File index {:?} doesn't exist, initializing it.", self.path);
                let index = FileIndex::default();
                self.persist(&index).await?;
                return Ok(index);
            }
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("can't read file index {:?}", self.path))
                    .into())
            }
        };
        // An empty document is a truncated write, not an empty index.
        serde_json::from_slice(&bytes).map_err(|source| UploadException::IndexCorruption {
            path: self.path.to_owned(),
            source,
        })
    }

    /// Write to a sibling temporary then rename over the document, so readers see
    /// either the old or the new index.
    async fn persist(&self, index: &FileIndex) -> UploadResult<()> {
        let content = serde_json::to_vec(index).context("can't serialize file index")?;
        let file_name = self
            .path
            .file_name()
            .with_context(|| format!("file index path {:?} has no file name", self.path))?;
        let temp_path = self
            .path
            .with_file_name(format!(".{}.tmp.{}", file_name.to_string_lossy(), Uuid::new_v4()));
        let written = async {
            let mut file = tokio::fs::File::create(&temp_path).await?;
            file.write_all(&content).await?;
            file.sync_all().await?;
            tokio::fs::rename(&temp_path, &self.path).await
        }
        .await;
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(anyhow::Error::new(e)
                .context(format!("can't persist file index {:?}", self.path))
                .into());
        }
        Ok(())
    }

    /// Run `f` on the cached index, reading the document on first use.
    async fn inspect<T>(&self, f: impl FnOnce(&FileIndex) -> T) -> UploadResult<T> {
        let mut document = self.document.lock().await;
        let index = match &mut *document {
            Some(index) => index,
            empty => empty.insert(self.read().await?),
        };
        Ok(f(index))
    }

    /// Run `f` on a copy of the index, persisting and caching the copy if `f`
    /// reports a change.
    async fn modify<T>(&self, f: impl FnOnce(&mut FileIndex) -> (bool, T)) -> UploadResult<T> {
        let mut document = self.document.lock().await;
        let mut index = match document.as_ref() {
            Some(index) => index.to_owned(),
            None => self.read().await?,
        };
        let (changed, output) = f(&mut index);
        if changed {
            self.persist(&index).await?;
        }
        *document = Some(index);
        Ok(output)
    }
}

#[async_trait]
impl FileIndexRepo for JsonFileIndexRepo {
    async fn load(&self) -> UploadResult<FileIndex> {
        self.inspect(FileIndex::clone).await
    }

    async fn lookup(&self, hash: &ContentHash) -> UploadResult<Option<Vec<FileName>>> {
        self.inspect(|index| index.lookup(hash).map(<[FileName]>::to_vec)).await
    }

    async fn put_alias(
        &self,
        hash: &ContentHash,
        file_name: &FileName,
    ) -> UploadResult<Vec<FileName>> {
        self.modify(|index| {
            let changed = index.put_alias(hash, file_name);
            let names = index.lookup(hash).map(<[FileName]>::to_vec).unwrap_or_default();
            (changed, names)
        })
        .await
    }

    async fn drop_alias(
        &self,
        hash: &ContentHash,
        file_name: &FileName,
    ) -> UploadResult<Option<Vec<FileName>>> {
        self.modify(|index| {
            let remaining = index.drop_alias(hash, file_name);
            (remaining.is_some(), remaining)
        })
        .await
    }
}
