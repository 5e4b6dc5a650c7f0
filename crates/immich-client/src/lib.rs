//! immich-client — upstream client for the Immich administrative API.
//!
//! Wraps the three admin endpoints the exporter polls and decodes their
//! JSON bodies into typed values. Every failure is reported through a
//! single [`ClientError`] taxonomy so callers can treat transport,
//! status, and decode problems uniformly.
//!
//! # Architecture
//!
//! ```text
//! ImmichClient
//!   ├── fetch_jobs()       → GET /api/jobs
//!   ├── fetch_statistics() → GET /api/server/statistics
//!   ├── fetch_storage()    → GET /api/server/storage
//!   └── ping()             → fetch_jobs(), result discarded
//! ```
//!
//! Requests carry the `x-api-key` credential and are bounded by a fixed
//! client-side timeout. There are no retries and nothing is cached.

pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_TIMEOUT, ImmichClient};
pub use error::{ClientError, ClientResult};
pub use types::*;
