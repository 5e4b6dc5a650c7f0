//! The result of one scrape: gauge samples plus the fetch outcome.

use std::time::Duration;

use crate::catalog::Metric;

/// One gauge observation of a catalog family.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub metric: Metric,
    /// Label values, positionally matching the family's label names.
    pub label_values: Vec<String>,
    pub value: f64,
}

/// Per-resource success flags and elapsed gather time for one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeOutcome {
    pub jobs: bool,
    pub statistics: bool,
    pub storage: bool,
    pub elapsed: Duration,
}

impl ScrapeOutcome {
    /// True only if all three upstream fetches succeeded.
    pub fn success(&self) -> bool {
        self.jobs && self.statistics && self.storage
    }
}

/// A complete, immutable metrics snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    samples: Vec<Sample>,
    outcome: ScrapeOutcome,
}

impl Snapshot {
    pub(crate) fn new(samples: Vec<Sample>, outcome: ScrapeOutcome) -> Self {
        Self { samples, outcome }
    }

    /// All samples in emission order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn outcome(&self) -> ScrapeOutcome {
        self.outcome
    }

    /// Samples belonging to one family, in emission order.
    pub fn family(&self, metric: Metric) -> impl Iterator<Item = &Sample> {
        self.samples.iter().filter(move |s| s.metric == metric)
    }

    /// Number of samples emitted for a family.
    pub fn count(&self, metric: Metric) -> usize {
        self.family(metric).count()
    }

    /// Value of the sample with exactly these label values, if emitted.
    pub fn get(&self, metric: Metric, label_values: &[&str]) -> Option<f64> {
        self.family(metric)
            .find(|s| {
                s.label_values.len() == label_values.len()
                    && s.label_values.iter().zip(label_values).all(|(a, b)| a == b)
            })
            .map(|s| s.value)
    }
}
