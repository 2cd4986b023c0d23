//! Mintly backend library.
//!
//! An HTTP service that turns a token-creation form into an SPL token: the
//! uploaded image and a metadata document go to decentralized storage, and
//! a service-held wallet pays for and signs the on-chain mint sequence.

pub mod chain;
pub mod config;
pub mod http;
pub mod mint;
pub mod observability;
pub mod storage;

pub use config::MintlyConfig;
pub use http::HttpServer;
