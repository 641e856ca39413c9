use std::path::Path;

use anyhow::Result;
use glam::Vec3;
use hangchain_assets::{ChainTypeId, ChainTypeRegistry};
use hangchain_testkit::{ChainMeshMetric, MeshMetricSink};
use tracing::warn;

use crate::{ChainRenderer, LightPair, MeshHash, VertexSink};

/// One chain to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainRequest {
    /// Near anchor in world (or camera-relative) space.
    pub origin: Vec3,
    /// Far anchor minus near anchor.
    pub span: Vec3,
    /// Registered chain type.
    pub chain_type: ChainTypeId,
    /// Light at the near anchor.
    pub light0: LightPair,
    /// Light at the far anchor.
    pub light1: LightPair,
}

/// Mesh stats for one rendered chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainBakeStat {
    /// Span the chain covered.
    pub span: Vec3,
    /// Quads across both faces.
    pub quads: usize,
    /// Mesh hash for determinism comparisons.
    pub hash: MeshHash,
    /// Whether the mesh came from the cache.
    pub cached: bool,
}

/// Feeds a batch of chain requests through a renderer into one sink.
pub struct ChainBakeDriver<'a> {
    renderer: &'a mut ChainRenderer,
    registry: &'a ChainTypeRegistry,
}

impl<'a> ChainBakeDriver<'a> {
    /// Create a new driver spanning renderer/registry.
    pub fn new(renderer: &'a mut ChainRenderer, registry: &'a ChainTypeRegistry) -> Self {
        Self { renderer, registry }
    }

    /// Render every request and return per-chain stats.
    ///
    /// Requests naming an unregistered chain type are skipped.
    pub fn process<S>(&mut self, requests: &[ChainRequest], sink: &mut S) -> Vec<ChainBakeStat>
    where
        S: VertexSink + ?Sized,
    {
        let mut stats = Vec::with_capacity(requests.len());
        for request in requests {
            let Some(chain_type) = self.registry.get(request.chain_type) else {
                warn!(id = request.chain_type, "skipping chain with unknown type");
                continue;
            };
            let hits_before = self.renderer.cache().stats().hits;
            let mesh = self.renderer.render_baked(
                sink,
                request.origin,
                request.span,
                chain_type,
                request.light0,
                request.light1,
            );
            stats.push(ChainBakeStat {
                span: request.span,
                quads: mesh.quad_count(),
                hash: mesh.hash(),
                cached: self.renderer.cache().stats().hits > hits_before,
            });
        }
        stats
    }

    /// Convert stats into serializable metrics for CI artifacts.
    pub fn stats_to_metrics(stats: &[ChainBakeStat]) -> Vec<ChainMeshMetric> {
        stats
            .iter()
            .map(|stat| ChainMeshMetric {
                span: stat.span.to_array(),
                quads: stat.quads,
                cached: stat.cached,
                hash: stat.hash.0.iter().map(|b| format!("{b:02x}")).collect(),
            })
            .collect()
    }

    /// Write metrics to disk using the testkit sink.
    pub fn write_metrics_to_file<P: AsRef<Path>>(stats: &[ChainBakeStat], path: P) -> Result<()> {
        let metrics = Self::stats_to_metrics(stats);
        let mut sink = MeshMetricSink::create(path)?;
        sink.write(&metrics)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::LitVertex;

    fn request(span: Vec3, chain_type: ChainTypeId) -> ChainRequest {
        ChainRequest {
            origin: Vec3::ZERO,
            span,
            chain_type,
            light0: LightPair::FULL,
            light1: LightPair::FULL,
        }
    }

    #[test]
    fn driver_reports_cache_reuse() {
        let registry = ChainTypeRegistry::with_defaults();
        let mut renderer = ChainRenderer::default();
        let mut out: Vec<LitVertex> = Vec::new();
        let mut driver = ChainBakeDriver::new(&mut renderer, &registry);
        let stats = driver.process(
            &[
                request(Vec3::new(3.0, -1.0, 4.0), 0),
                request(Vec3::new(0.0, -1.0, 5.0), 0),
                request(Vec3::new(2.0, 0.0, 0.0), 7),
            ],
            &mut out,
        );
        assert_eq!(stats.len(), 2);
        assert!(!stats[0].cached);
        assert!(stats[1].cached);
        assert_eq!(stats[0].hash, stats[1].hash);
        assert!(stats[0].quads > 0);
        assert_eq!(out.len(), stats[0].quads * 4 * 2);
    }

    #[test]
    fn write_metrics_to_file_outputs_json() {
        let stats = vec![ChainBakeStat {
            span: Vec3::new(1.0, -2.0, 0.5),
            quads: 12,
            hash: MeshHash([0xab; 32]),
            cached: false,
        }];
        let path = std::env::temp_dir().join("hangchain-driver-metrics.json");
        ChainBakeDriver::write_metrics_to_file(&stats, &path).expect("metrics write");
        let contents = fs::read_to_string(&path).expect("read metrics");
        assert!(contents.contains("\"quads\""));
        assert!(contents.contains("abab"));
    }
}
