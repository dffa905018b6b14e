mod alias;
mod artifact;
mod lock;
mod merge;
mod root;
mod stage;
mod sweep;
mod upload;

#[rustfmt::skip]
pub use {
    alias::AliasServiceImpl,
    artifact::ArtifactServiceImpl,
    lock::{HashGuard, HashLocks},
    merge::{MergeServiceImpl, MAX_REPORTED_MISSING},
    root::StorageRoot,
    stage::LocalChunkStageServiceImpl,
    sweep::{sweep, SweepReport},
    upload::UploadServiceImpl,
};
