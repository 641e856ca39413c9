//! JSON export of chain mesh metrics for CI artifacts.

use anyhow::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::ChainMeshMetric;

/// Summary written alongside per-chain metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshMetricsReport<'a> {
    /// Number of chains rendered.
    pub chains: usize,
    /// Quads across all chains.
    pub total_quads: usize,
    /// Chains served from the mesh cache.
    pub cache_hits: usize,
    /// Per-chain records.
    pub meshes: &'a [ChainMeshMetric],
}

impl<'a> MeshMetricsReport<'a> {
    /// Summarise `meshes`.
    pub fn from_metrics(meshes: &'a [ChainMeshMetric]) -> Self {
        Self {
            chains: meshes.len(),
            total_quads: meshes.iter().map(|m| m.quads).sum(),
            cache_hits: meshes.iter().filter(|m| m.cached).count(),
            meshes,
        }
    }
}

/// Writes chain mesh metrics to JSON for CI artifacts.
pub struct MeshMetricSink {
    file: File,
}

impl MeshMetricSink {
    /// Create a sink pointed at the supplied path, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Persist the provided metrics, with a summary, as pretty JSON.
    pub fn write(&mut self, metrics: &[ChainMeshMetric]) -> Result<()> {
        let report = MeshMetricsReport::from_metrics(metrics);
        let json = serde_json::to_string_pretty(&report)?;
        self.file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn metric(quads: usize, cached: bool) -> ChainMeshMetric {
        ChainMeshMetric {
            span: [3.0, -2.0, 4.0],
            quads,
            cached,
            hash: "deadbeef".into(),
        }
    }

    #[test]
    fn report_summarises_metrics() {
        let metrics = vec![metric(10, false), metric(10, true), metric(4, false)];
        let report = MeshMetricsReport::from_metrics(&metrics);
        assert_eq!(report.chains, 3);
        assert_eq!(report.total_quads, 24);
        assert_eq!(report.cache_hits, 1);
    }

    #[test]
    fn mesh_metric_sink_writes_file() {
        let path = std::env::temp_dir().join(format!(
            "chain-metrics-{}.json",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let metrics = vec![metric(12, false)];
        let mut sink = MeshMetricSink::create(&path).expect("sink create");
        sink.write(&metrics).expect("write succeeds");
        let contents = fs::read_to_string(&path).expect("file readable");
        assert!(contents.contains("deadbeef"));
        assert!(contents.contains("total_quads"));
    }
}
