#![warn(missing_docs)]
//! Metric records and sinks shared by the CLI and integration tests.

mod metrics;

pub use metrics::*;

use serde::Serialize;

/// Mesh metric snapshot for one rendered chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainMeshMetric {
    /// Span vector `[dx, dy, dz]` between the anchors.
    pub span: [f32; 3],
    /// Quad count across both faces.
    pub quads: usize,
    /// Whether the mesh was served from the cache.
    pub cached: bool,
    /// Mesh hash (hex string) for deterministic comparisons.
    pub hash: String,
}
