//! File index persisted as one json document.

mod json;

pub use json::JsonFileIndexRepo;
