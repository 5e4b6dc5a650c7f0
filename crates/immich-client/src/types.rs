//! Response types for the Immich admin endpoints.
//!
//! Each type is decoded from one upstream response and never mutated
//! afterwards. Fields the server omits or sends as `null` decode as
//! zero/false/empty, so an empty server is indistinguishable from a
//! successfully fetched empty one.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Decodes a field, treating an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Queue name → status, as returned by `GET /api/jobs`.
///
/// Ordered so that metric output is stable across scrapes.
pub type JobsResponse = BTreeMap<String, JobQueueStatus>;

// ── Jobs ───────────────────────────────────────────────────────────

/// Status of a single named job queue.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct JobQueueStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub job_counts: JobCounts,
    #[serde(deserialize_with = "null_as_default")]
    pub queue_status: QueueStatus,
}

/// Job counts per state for one queue.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JobCounts {
    #[serde(deserialize_with = "null_as_default")]
    pub active: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub waiting: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub failed: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub delayed: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub paused: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub completed: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct QueueStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub is_active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub is_paused: bool,
}

// ── Statistics ─────────────────────────────────────────────────────

/// Library-wide asset counts, as returned by `GET /api/server/statistics`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct LibraryStatistics {
    #[serde(deserialize_with = "null_as_default")]
    pub photos: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub videos: u64,
    /// Total storage usage in bytes.
    #[serde(deserialize_with = "null_as_default")]
    pub usage: u64,
    /// Per-user breakdown, in upstream order.
    #[serde(deserialize_with = "null_as_default")]
    pub usage_by_user: Vec<UserUsage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct UserUsage {
    #[serde(deserialize_with = "null_as_default")]
    pub user_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub photos: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub videos: u64,
    /// Storage usage in bytes.
    #[serde(deserialize_with = "null_as_default")]
    pub usage: u64,
}

// ── Storage ────────────────────────────────────────────────────────

/// Disk usage of the server's media volume, as returned by
/// `GET /api/server/storage`.
///
/// Only the raw byte fields are decoded; the human-readable strings the
/// server also sends are ignored.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageStatus {
    #[serde(rename = "diskSizeRaw", deserialize_with = "null_as_default")]
    pub total_bytes: u64,
    #[serde(rename = "diskUseRaw", deserialize_with = "null_as_default")]
    pub used_bytes: u64,
    #[serde(rename = "diskAvailableRaw", deserialize_with = "null_as_default")]
    pub available_bytes: u64,
    /// Usage percentage (0-100) as reported by the server, not derived.
    #[serde(rename = "diskUsagePercentage", deserialize_with = "null_as_default")]
    pub usage_percentage: f64,
}
