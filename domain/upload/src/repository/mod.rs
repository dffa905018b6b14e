mod file_index;

#[rustfmt::skip]
pub use {
    file_index::FileIndexRepo,
};
