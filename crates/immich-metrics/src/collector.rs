//! Snapshot collector — one concurrent fan-out per scrape.
//!
//! The three upstream fetches share nothing but the read-only client.
//! Each result is captured on its own and combined only after all three
//! have finished, so a slow or failing resource never corrupts the others.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use immich_client::{ClientResult, ImmichClient, JobsResponse, LibraryStatistics, StorageStatus};

use crate::catalog::{Catalog, Metric};
use crate::snapshot::{Sample, ScrapeOutcome, Snapshot};

/// Produces metrics snapshots from the Immich admin API.
pub struct Collector {
    client: Arc<ImmichClient>,
    catalog: Catalog,
}

impl Collector {
    /// Create a collector. The metric catalog is declared here, once.
    pub fn new(client: Arc<ImmichClient>) -> Self {
        Self {
            client,
            catalog: Catalog::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn client(&self) -> &ImmichClient {
        &self.client
    }

    /// Gather all three resources concurrently and build one snapshot.
    ///
    /// Never fails: a resource that cannot be fetched is logged and its
    /// families are left out. The two scrape self-metrics are always present.
    pub async fn snapshot(&self) -> Snapshot {
        let start = Instant::now();

        let (jobs, statistics, storage) = tokio::join!(
            self.client.fetch_jobs(),
            self.client.fetch_statistics(),
            self.client.fetch_storage(),
        );

        let mut builder = SnapshotBuilder::new(&self.catalog);
        let mut outcome = ScrapeOutcome::default();

        if let Some(jobs) = ok_or_log("jobs", jobs) {
            builder.record_jobs(&jobs);
            outcome.jobs = true;
        }
        if let Some(statistics) = ok_or_log("statistics", statistics) {
            builder.record_statistics(&statistics);
            outcome.statistics = true;
        }
        if let Some(storage) = ok_or_log("storage", storage) {
            builder.record_storage(&storage);
            outcome.storage = true;
        }

        outcome.elapsed = start.elapsed();
        builder.gauge(Metric::ScrapeDuration, &[], outcome.elapsed.as_secs_f64());
        builder.gauge(Metric::ScrapeSuccess, &[], bool_to_f64(outcome.success()));

        debug!(
            success = outcome.success(),
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            samples = builder.samples.len(),
            "snapshot collected"
        );

        Snapshot::new(builder.samples, outcome)
    }
}

fn ok_or_log<T>(resource: &'static str, result: ClientResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(resource, kind = e.kind(), error = %e, "failed to fetch upstream resource");
            None
        }
    }
}

/// Accumulates samples for one snapshot against the catalog.
struct SnapshotBuilder<'a> {
    catalog: &'a Catalog,
    samples: Vec<Sample>,
}

impl<'a> SnapshotBuilder<'a> {
    fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            samples: Vec::new(),
        }
    }

    fn gauge(&mut self, metric: Metric, label_values: &[&str], value: f64) {
        debug_assert_eq!(
            self.catalog.desc(metric).label_names.len(),
            label_values.len(),
            "label cardinality mismatch for {metric:?}"
        );
        self.samples.push(Sample {
            metric,
            label_values: label_values.iter().map(|v| v.to_string()).collect(),
            value,
        });
    }

    fn record_jobs(&mut self, jobs: &JobsResponse) {
        for (queue, status) in jobs {
            let labels = [queue.as_str()];
            let counts = &status.job_counts;
            self.gauge(Metric::JobActive, &labels, counts.active as f64);
            self.gauge(Metric::JobWaiting, &labels, counts.waiting as f64);
            self.gauge(Metric::JobFailed, &labels, counts.failed as f64);
            self.gauge(Metric::JobDelayed, &labels, counts.delayed as f64);
            self.gauge(Metric::JobPaused, &labels, counts.paused as f64);
            self.gauge(Metric::JobCompleted, &labels, counts.completed as f64);
            self.gauge(
                Metric::QueueActive,
                &labels,
                bool_to_f64(status.queue_status.is_active),
            );
            self.gauge(
                Metric::QueuePaused,
                &labels,
                bool_to_f64(status.queue_status.is_paused),
            );
        }
    }

    fn record_statistics(&mut self, stats: &LibraryStatistics) {
        self.gauge(Metric::LibraryPhotos, &[], stats.photos as f64);
        self.gauge(Metric::LibraryVideos, &[], stats.videos as f64);
        self.gauge(Metric::LibraryBytes, &[], stats.usage as f64);

        for user in &stats.usage_by_user {
            let labels = [user.user_name.as_str()];
            self.gauge(Metric::UserPhotos, &labels, user.photos as f64);
            self.gauge(Metric::UserVideos, &labels, user.videos as f64);
            self.gauge(Metric::UserBytes, &labels, user.usage as f64);
        }
    }

    fn record_storage(&mut self, storage: &StorageStatus) {
        self.gauge(Metric::StorageTotal, &[], storage.total_bytes as f64);
        self.gauge(Metric::StorageUsed, &[], storage.used_bytes as f64);
        self.gauge(Metric::StorageAvailable, &[], storage.available_bytes as f64);
        self.gauge(Metric::StorageUsagePercent, &[], storage.usage_percentage);
    }
}

fn bool_to_f64(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}
