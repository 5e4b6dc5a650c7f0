//! The fixed catalog of gauge families the exporter publishes.
//!
//! Every snapshot emits a subset of instances of this catalog. Names,
//! help text and label schemas never change between scrapes.

/// Metric namespace shared by every family.
pub const NAMESPACE: &str = "immich";

/// Identifies one gauge family in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Metric {
    // Per-queue job counts.
    JobActive,
    JobWaiting,
    JobFailed,
    JobDelayed,
    JobPaused,
    JobCompleted,
    QueueActive,
    QueuePaused,
    // Library totals and per-user usage.
    LibraryPhotos,
    LibraryVideos,
    LibraryBytes,
    UserPhotos,
    UserVideos,
    UserBytes,
    // Disk.
    StorageTotal,
    StorageUsed,
    StorageAvailable,
    StorageUsagePercent,
    // Exporter self-metrics.
    ScrapeDuration,
    ScrapeSuccess,
}

impl Metric {
    /// Every family, in declaration (and exposition) order.
    pub const ALL: [Metric; 20] = [
        Metric::JobActive,
        Metric::JobWaiting,
        Metric::JobFailed,
        Metric::JobDelayed,
        Metric::JobPaused,
        Metric::JobCompleted,
        Metric::QueueActive,
        Metric::QueuePaused,
        Metric::LibraryPhotos,
        Metric::LibraryVideos,
        Metric::LibraryBytes,
        Metric::UserPhotos,
        Metric::UserVideos,
        Metric::UserBytes,
        Metric::StorageTotal,
        Metric::StorageUsed,
        Metric::StorageAvailable,
        Metric::StorageUsagePercent,
        Metric::ScrapeDuration,
        Metric::ScrapeSuccess,
    ];

    /// (subsystem, name, help, label names)
    fn schema(self) -> (&'static str, &'static str, &'static str, &'static [&'static str]) {
        const QUEUE: &[&str] = &["queue"];
        const USER: &[&str] = &["user"];
        const NONE: &[&str] = &[];

        match self {
            Metric::JobActive => ("job", "active", "Number of active jobs", QUEUE),
            Metric::JobWaiting => ("job", "waiting", "Number of waiting jobs", QUEUE),
            Metric::JobFailed => ("job", "failed", "Number of failed jobs", QUEUE),
            Metric::JobDelayed => ("job", "delayed", "Number of delayed jobs", QUEUE),
            Metric::JobPaused => ("job", "paused", "Number of paused jobs", QUEUE),
            Metric::JobCompleted => ("job", "completed", "Number of completed jobs", QUEUE),
            Metric::QueueActive => (
                "queue",
                "active",
                "Whether queue is active (1=yes, 0=no)",
                QUEUE,
            ),
            Metric::QueuePaused => (
                "queue",
                "paused",
                "Whether queue is paused (1=yes, 0=no)",
                QUEUE,
            ),
            Metric::LibraryPhotos => ("library", "photos", "Total photos", NONE),
            Metric::LibraryVideos => ("library", "videos", "Total videos", NONE),
            Metric::LibraryBytes => ("library", "bytes", "Total storage usage in bytes", NONE),
            Metric::UserPhotos => ("user", "photos", "Photos per user", USER),
            Metric::UserVideos => ("user", "videos", "Videos per user", USER),
            Metric::UserBytes => ("user", "bytes", "Storage per user in bytes", USER),
            Metric::StorageTotal => ("storage", "total_bytes", "Total disk size", NONE),
            Metric::StorageUsed => ("storage", "used_bytes", "Disk used", NONE),
            Metric::StorageAvailable => ("storage", "available_bytes", "Disk available", NONE),
            Metric::StorageUsagePercent => {
                ("storage", "usage_percent", "Disk usage percentage", NONE)
            }
            Metric::ScrapeDuration => ("scrape", "duration_seconds", "Time taken to scrape", NONE),
            Metric::ScrapeSuccess => (
                "scrape",
                "success",
                "Whether scrape succeeded (1=yes, 0=no)",
                NONE,
            ),
        }
    }
}

/// Descriptor for one gauge family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desc {
    pub metric: Metric,
    /// Fully-qualified name, e.g. `immich_job_active`.
    pub name: String,
    pub help: &'static str,
    pub label_names: &'static [&'static str],
}

/// All gauge families, built once and shared by every snapshot.
#[derive(Debug, Clone)]
pub struct Catalog {
    descs: Vec<Desc>,
}

impl Catalog {
    pub fn new() -> Self {
        let descs = Metric::ALL
            .iter()
            .map(|&metric| {
                let (subsystem, name, help, label_names) = metric.schema();
                Desc {
                    metric,
                    name: fq_name(NAMESPACE, subsystem, name),
                    help,
                    label_names,
                }
            })
            .collect();
        Self { descs }
    }

    /// Descriptor for a family.
    pub fn desc(&self, metric: Metric) -> &Desc {
        // `descs` is built from `Metric::ALL`, whose order matches the enum.
        &self.descs[metric as usize]
    }

    /// All descriptors in declaration order.
    pub fn descs(&self) -> &[Desc] {
        &self.descs
    }

    pub fn len(&self) -> usize {
        self.descs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descs.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Join non-empty name parts with `_`.
pub fn fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}
