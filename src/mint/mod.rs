//! Token creation.
//!
//! # Data Flow
//!
//! 1. The HTTP layer hands [`engine::MintEngine`] a validated
//!    [`types::MintRequest`] and the uploaded image
//! 2. The engine uploads the image and the [`metadata`] document through
//!    the storage gateway
//! 3. It then creates the mint account, the metadata account, and the
//!    initial supply on chain, one confirmed transaction per step
//! 4. [`cost`] answers the cost-estimate endpoint from the same account
//!    sizes the sequence allocates

pub mod cost;
pub mod engine;
pub mod metadata;
pub mod types;

pub use engine::MintEngine;
pub use types::{MintError, MintOutcome, MintRequest, MintStep, UploadedImage};
