//! Test data builders for creating test objects

use binnacle::{Sample, SnapshotBackend};

/// Builder for snapshot backends
pub struct SnapshotBuilder {
    samples: Vec<Sample>,
    max_samples: Option<usize>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            max_samples: None,
        }
    }

    pub fn sample(mut self, metric: &str, value: f64) -> Self {
        self.samples.push(Sample::new(metric, value));
        self
    }

    pub fn max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    pub fn build(self) -> SnapshotBackend {
        let backend = SnapshotBackend::new(self.samples);
        match self.max_samples {
            Some(max) => backend.with_max_samples(max),
            None => backend,
        }
    }
}

/// Snapshot with a few `up` series and one request counter
pub fn node_snapshot() -> SnapshotBackend {
    SnapshotBuilder::new()
        .sample("up{job=\"node\",instance=\"a\"}", 1.0)
        .sample("up{job=\"node\",instance=\"b\"}", 0.0)
        .sample("up{job=\"api\",instance=\"c\"}", 1.0)
        .sample("http_requests_total{code=\"200\"}", 1027.0)
        .build()
}
