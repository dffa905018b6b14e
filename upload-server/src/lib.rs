//! HTTP shell of the chunk upload store.

pub mod api;
pub mod infrastructure;
pub mod server;
