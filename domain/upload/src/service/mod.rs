mod alias;
mod artifact;
mod chunk_stage;
mod merge;
mod upload;

#[rustfmt::skip]
pub use {
    alias::AliasService,
    artifact::ArtifactService,
    chunk_stage::ChunkStageService,
    merge::MergeService,
    upload::UploadService,
};
