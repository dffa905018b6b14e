use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use domain_upload::{
    exception::{UploadException, UploadResult},
    model::vo::{AliasRemoval, ContentHash, FileName},
    repository::FileIndexRepo,
    service::AliasService,
};
use typed_builder::TypedBuilder;

use crate::{HashLocks, StorageRoot};

#[derive(TypedBuilder)]
pub struct AliasServiceImpl {
    index_repo: Arc<dyn FileIndexRepo>,
    locks: Arc<HashLocks>,
    root: StorageRoot,
}

/// How an artifact became reachable under its new name.
enum Relinked {
    /// Both names point at the artifact, the old one still has to be removed.
    HardLink,
    Renamed,
}

/// Make the artifact at `from` reachable at `to`, never replacing an existing `to`.
async fn relink(from: &Path, to: &Path) -> std::io::Result<Relinked> {
    match tokio::fs::hard_link(from, to).await {
        Ok(()) => Ok(Relinked::HardLink),
        Err(e) if e.kind() == ErrorKind::AlreadyExists || e.kind() == ErrorKind::NotFound => {
            Err(e)
        }
        Err(e) => {
            tracing::debug!("Can't hard link {from:?} to {to:?}, renaming it: {e}");
            tokio::fs::rename(from, to).await.map(|_| Relinked::Renamed)
        }
    }
}

async fn remove_artifact(path: &Path) -> UploadResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!("Artifact {path:?} was already missing.");
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e)
            .context(format!("can't remove artifact {path:?}"))
            .into()),
    }
}

#[async_trait]
impl AliasService for AliasServiceImpl {
    async fn link(&self, hash: &ContentHash, file_name: &FileName) -> UploadResult<Vec<FileName>> {
        self.root.artifact_path(file_name)?;
        let _guard = self.locks.lock(hash).await;
        if self.index_repo.lookup(hash).await?.is_none() {
            return Err(UploadException::NotFound {
                hash: hash.to_string(),
                file_name: None,
            });
        }
        let names = self.index_repo.put_alias(hash, file_name).await?;
        tracing::info!("Linked {file_name} to {hash}: {names:?}.");
        Ok(names)
    }

    async fn remove(&self, hash: &ContentHash, file_name: &FileName) -> UploadResult<AliasRemoval> {
        let _guard = self.locks.lock(hash).await;
        let names = self.index_repo.lookup(hash).await?.ok_or_else(|| UploadException::NotFound {
            hash: hash.to_string(),
            file_name: None,
        })?;
        let Some(position) = names.iter().position(|n| n == file_name) else {
            return Ok(AliasRemoval::NotAnAlias);
        };
        if position > 0 {
            self.index_repo.drop_alias(hash, file_name).await?;
            tracing::info!("Dropped alias {file_name} of {hash}.");
            return Ok(AliasRemoval::Dropped);
        }

        let current = self.root.base().join(file_name.as_str());
        let removal = match names.get(1) {
            None => {
                // Unregister first, a crash in between leaves an orphan, not a dangling alias.
                self.index_repo.drop_alias(hash, file_name).await?;
                remove_artifact(&current).await?;
                tracing::info!("Removed {file_name}, the last alias of {hash}.");
                AliasRemoval::Deleted
            }
            Some(next) => {
                let promoted = self.root.artifact_path(next)?;
                match relink(&current, &promoted).await {
                    Ok(relinked) => {
                        self.index_repo.drop_alias(hash, file_name).await?;
                        if let Relinked::HardLink = relinked {
                            remove_artifact(&current).await?;
                        }
                    }
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        tracing::warn!(
                            "Artifact {current:?} of {hash} is missing, only unregistering {file_name}."
                        );
                        self.index_repo.drop_alias(hash, file_name).await?;
                    }
                    Err(e) => {
                        return Err(anyhow::Error::new(e)
                            .context(format!("can't move artifact {current:?} to {promoted:?}"))
                            .into())
                    }
                }
                tracing::info!("Removed {file_name}, {next} is now canonical for {hash}.");
                AliasRemoval::Promoted {
                    canonical: next.to_owned(),
                }
            }
        };
        Ok(removal)
    }
}
