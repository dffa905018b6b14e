//! Domain model of the resumable, content-deduplicating upload store.
//!
//! Content is identified by its md5 digest. Chunks of a file are staged per
//! hash, merged once all of them arrived, and the resulting artifact is
//! registered in a file index under one or more aliases.

pub mod command;
pub mod exception;
#[cfg(feature = "mock")]
pub mod mock;
pub mod model;
pub mod repository;
pub mod service;
