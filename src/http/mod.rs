//! HTTP surface of the mint service.
//!
//! # Data Flow
//!
//! 1. [`server::HttpServer`] assembles the router and middleware stack
//! 2. [`request`] parses and validates the multipart mint form
//! 3. [`handlers`] drive the mint engine and pick the response shape
//! 4. [`response`] maps outcomes and failures onto the JSON contract

pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use server::{AppState, HttpServer};
