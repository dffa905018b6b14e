use std::path::{Path, PathBuf};

use anyhow::Context;
use domain_upload::{
    exception::UploadResult,
    model::vo::{ContentHash, StoredFile},
    repository::FileIndexRepo,
};

use crate::{root::MERGING_PREFIX, StorageRoot};

/// What the startup sweep found.
#[derive(Debug, Default)]
pub struct SweepReport {
    /// Temporaries left behind by interrupted merges, chunk copies and index writes.
    pub removed: Vec<PathBuf>,
    /// Index entries whose canonical artifact is missing on disk.
    pub dangling: Vec<StoredFile>,
}

fn is_root_temporary(name: &str) -> bool {
    name.starts_with(MERGING_PREFIX) || (name.starts_with('.') && name.contains(".tmp."))
}

async fn remove_temporary(path: PathBuf, report: &mut SweepReport) {
    match tokio::fs::remove_file(&path).await {
        Ok(()) => report.removed.push(path),
        Err(e) => tracing::warn!("Can't remove temporary {path:?}: {e}"),
    }
}

async fn sweep_stage(dir: &Path, report: &mut SweepReport) -> UploadResult<()> {
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("can't read staging directory {dir:?}"))?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_name().to_string_lossy().starts_with('.') {
            remove_temporary(entry.path(), report).await;
        }
    }
    Ok(())
}

/// Clean up after an unclean shutdown.
///
/// Staged chunks and artifacts are kept; only hidden temporaries are removed, and
/// index entries pointing at missing artifacts are reported, never dropped.
pub async fn sweep(
    root: &StorageRoot,
    index_repo: &dyn FileIndexRepo,
) -> UploadResult<SweepReport> {
    let mut report = SweepReport::default();
    tokio::fs::create_dir_all(root.base())
        .await
        .with_context(|| format!("can't create storage root {:?}", root.base()))?;
    let index = index_repo.load().await?;

    let mut entries = tokio::fs::read_dir(root.base())
        .await
        .with_context(|| format!("can't read storage root {:?}", root.base()))?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let file_type = entry.file_type().await?;
        if file_type.is_dir() && ContentHash::is_well_formed(&name) {
            sweep_stage(&entry.path(), &mut report).await?;
        } else if file_type.is_file() && is_root_temporary(&name) {
            remove_temporary(entry.path(), &mut report).await;
        }
    }

    for hash in index.hashes() {
        let Some(canonical) = index.canonical(hash) else {
            continue;
        };
        let path = root.base().join(canonical.as_str());
        if !tokio::fs::try_exists(&path).await? {
            tracing::warn!("{hash} is indexed as {canonical} but {path:?} is missing.");
            report.dangling.push(StoredFile {
                hash: hash.to_owned(),
                file_name: canonical.to_owned(),
            });
        }
    }
    tracing::info!(
        "Swept storage root {:?}: {} temporaries removed, {} dangling entries.",
        root.base(),
        report.removed.len(),
        report.dangling.len()
    );
    Ok(report)
}
