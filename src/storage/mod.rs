//! Decentralized storage access through the upload gateway.

pub mod client;
pub mod types;

pub use client::StorageClient;
pub use types::{StorageError, StorageResult};
