//! immich-metrics — snapshot collection for the Immich exporter.
//!
//! Fetches the three admin resources concurrently, maps them onto a
//! fixed catalog of gauge families, and renders the result in the
//! Prometheus text exposition format.
//!
//! # Architecture
//!
//! ```text
//! Collector
//!   ├── Catalog        ← declared once, 20 gauge families
//!   └── snapshot()     → Snapshot (samples + ScrapeOutcome)
//!         ├── fetch_jobs()       ┐
//!         ├── fetch_statistics() ├ joined concurrently
//!         └── fetch_storage()    ┘
//!
//! Prometheus exposition
//!   ├── render_prometheus()  → text/plain for /metrics
//!   └── render_build_info()  → immich_exporter_build_info
//! ```
//!
//! A failed resource only removes its own families from the snapshot;
//! `immich_scrape_success` is the aggregate signal to alert on.

pub mod catalog;
pub mod collector;
pub mod prometheus;
pub mod snapshot;

pub use catalog::{Catalog, Desc, Metric};
pub use collector::Collector;
pub use prometheus::{BuildInfo, render_build_info, render_prometheus};
pub use snapshot::{Sample, ScrapeOutcome, Snapshot};
