mod file_index;

pub use file_index::FileIndex;
