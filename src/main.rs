//! hangchain - catenary chain meshes for block-based renderers
//!
//! Bakes chain meshes for a set of spans and reports their stats

mod config;

use anyhow::{Context, Result};
use config::ChainsConfig;
use glam::Vec3;
use hangchain_assets::{ChainTypeRegistry, DEFAULT_CHAIN_TYPE};
use hangchain_render::{
    ChainBakeDriver, ChainBakeStat, ChainRenderer, ChainRequest, LightPair, LitVertex,
};
use std::{env, path::PathBuf};
use tracing::info;

/// Spans rendered when none are given on the command line.
const DEMO_SPANS: [[f32; 3]; 3] = [[3.0, -2.0, 4.0], [-5.0, -2.0, 0.0], [0.0, -10.0, 0.0]];

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    info!("Starting hangchain v{}", env!("CARGO_PKG_VERSION"));

    let cli = CliOptions::parse(env::args().skip(1));
    let mut chains = match &cli.config {
        Some(path) => ChainsConfig::load_from_path(path),
        None => ChainsConfig::load(),
    };
    if let Some(quality) = cli.quality {
        chains.quality = quality;
        chains = chains.sanitized();
    }
    if cli.no_bake {
        chains.bake = false;
    }
    if let Some(path) = &cli.write_config {
        chains
            .save_to_path(path)
            .with_context(|| format!("writing chain config to {}", path.display()))?;
        info!(path = %path.display(), "effective chain config written");
    }

    let registry = match &cli.chain_types {
        Some(path) => config::load_chain_types_from_path(path),
        None => config::load_chain_types(),
    };
    let type_name = cli.chain_type.as_deref().unwrap_or(DEFAULT_CHAIN_TYPE);
    let chain_type = registry
        .id_by_name(type_name)
        .with_context(|| format!("unknown chain type {type_name:?}"))?;

    let spans = if cli.spans.is_empty() {
        DEMO_SPANS.iter().copied().map(Vec3::from_array).collect()
    } else {
        cli.spans.clone()
    };
    let requests: Vec<ChainRequest> = spans
        .into_iter()
        .map(|span| ChainRequest {
            origin: Vec3::ZERO,
            span,
            chain_type,
            light0: LightPair::FULL,
            light1: LightPair::FULL,
        })
        .collect();

    let mut renderer = ChainRenderer::new(chains.mesh_settings(), chains.cache_capacity);
    let mut vertices: Vec<LitVertex> = Vec::new();
    let stats = if chains.bake {
        ChainBakeDriver::new(&mut renderer, &registry).process(&requests, &mut vertices)
    } else {
        render_unbaked(&renderer, &registry, &requests, &mut vertices)
    };

    for stat in &stats {
        println!(
            "span {:>6.2} {:>6.2} {:>6.2}  quads {:>5}  {}",
            stat.span.x,
            stat.span.y,
            stat.span.z,
            stat.quads,
            if stat.cached { "cached" } else { "built" }
        );
    }
    info!(
        chains = stats.len(),
        vertices = vertices.len(),
        cache = ?renderer.cache().stats(),
        "chain bake complete"
    );

    if let Some(path) = &cli.mesh_metrics {
        ChainBakeDriver::write_metrics_to_file(&stats, path)
            .with_context(|| format!("writing mesh metrics to {}", path.display()))?;
        info!(path = %path.display(), "mesh metrics written");
    }

    Ok(())
}

fn render_unbaked(
    renderer: &ChainRenderer,
    registry: &ChainTypeRegistry,
    requests: &[ChainRequest],
    vertices: &mut Vec<LitVertex>,
) -> Vec<ChainBakeStat> {
    requests
        .iter()
        .filter_map(|request| {
            let chain_type = registry.get(request.chain_type)?;
            let mesh = renderer.render_unbaked(
                vertices,
                request.origin,
                request.span,
                chain_type,
                request.light0,
                request.light1,
            );
            Some(ChainBakeStat {
                span: request.span,
                quads: mesh.quad_count(),
                hash: mesh.hash(),
                cached: false,
            })
        })
        .collect()
}

#[derive(Clone, Debug, Default)]
struct CliOptions {
    config: Option<PathBuf>,
    chain_types: Option<PathBuf>,
    spans: Vec<Vec3>,
    chain_type: Option<String>,
    quality: Option<f32>,
    no_bake: bool,
    write_config: Option<PathBuf>,
    mesh_metrics: Option<PathBuf>,
}

impl CliOptions {
    fn parse<I: Iterator<Item = String>>(mut args: I) -> Self {
        let mut opts = CliOptions::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    if let Some(path) = args.next() {
                        opts.config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--config requires a file path");
                    }
                }
                "--chain-types" => {
                    if let Some(path) = args.next() {
                        opts.chain_types = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--chain-types requires a file path");
                    }
                }
                "--span" => {
                    if let Some(raw) = args.next() {
                        match parse_span(&raw) {
                            Some(span) => opts.spans.push(span),
                            None => {
                                tracing::error!(value = %raw, "--span must be like 3,-2,4");
                            }
                        }
                    } else {
                        tracing::error!("--span requires a value like 3,-2,4");
                    }
                }
                "--type" => {
                    if let Some(name) = args.next() {
                        opts.chain_type = Some(name);
                    } else {
                        tracing::error!("--type requires a chain type name");
                    }
                }
                "--quality" => {
                    if let Some(raw) = args.next() {
                        match raw.parse::<f32>() {
                            Ok(value) => opts.quality = Some(value),
                            Err(err) => {
                                tracing::error!(%err, value = %raw, "--quality must be a number");
                            }
                        }
                    } else {
                        tracing::error!("--quality requires a number");
                    }
                }
                "--no-bake" => opts.no_bake = true,
                "--write-config" => {
                    if let Some(path) = args.next() {
                        opts.write_config = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--write-config requires a file path");
                    }
                }
                "--mesh-metrics" => {
                    if let Some(path) = args.next() {
                        opts.mesh_metrics = Some(PathBuf::from(path));
                    } else {
                        tracing::error!("--mesh-metrics requires a file path");
                    }
                }
                other => {
                    tracing::warn!(arg = other, "ignoring unknown argument");
                }
            }
        }

        opts
    }
}

fn parse_span(raw: &str) -> Option<Vec3> {
    let mut parts = raw.split(',').map(|part| part.trim().parse::<f32>());
    let span = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) => Vec3::new(x, y, z),
        _ => return None,
    };
    span.is_finite().then_some(span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliOptions {
        CliOptions::parse(args.iter().map(|arg| arg.to_string()))
    }

    #[test]
    fn parses_all_flags() {
        let opts = parse(&[
            "--config",
            "cfg/chains.toml",
            "--chain-types",
            "cfg/types.json",
            "--span",
            "3,-2,4",
            "--span",
            "0, -10, 0",
            "--type",
            "gold_chain",
            "--quality",
            "2",
            "--no-bake",
            "--write-config",
            "out/chains.toml",
            "--mesh-metrics",
            "out/metrics.json",
        ]);
        assert_eq!(opts.config, Some(PathBuf::from("cfg/chains.toml")));
        assert_eq!(opts.chain_types, Some(PathBuf::from("cfg/types.json")));
        assert_eq!(
            opts.spans,
            vec![Vec3::new(3.0, -2.0, 4.0), Vec3::new(0.0, -10.0, 0.0)]
        );
        assert_eq!(opts.chain_type.as_deref(), Some("gold_chain"));
        assert_eq!(opts.quality, Some(2.0));
        assert!(opts.no_bake);
        assert_eq!(opts.write_config, Some(PathBuf::from("out/chains.toml")));
        assert_eq!(opts.mesh_metrics, Some(PathBuf::from("out/metrics.json")));
    }

    #[test]
    fn malformed_values_are_skipped() {
        let opts = parse(&["--span", "1,2", "--span", "1,2,nan", "--quality", "high", "--span"]);
        assert!(opts.spans.is_empty());
        assert_eq!(opts.quality, None);
    }

    #[test]
    fn parse_span_rejects_extra_components() {
        assert_eq!(parse_span("1,2,3"), Some(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(parse_span("1,2,3,4"), None);
        assert_eq!(parse_span(""), None);
    }

    #[test]
    fn unbaked_render_builds_every_chain() {
        let registry = ChainTypeRegistry::with_defaults();
        let renderer = ChainRenderer::default();
        let requests = [
            ChainRequest {
                origin: Vec3::ZERO,
                span: Vec3::new(3.0, -2.0, 4.0),
                chain_type: 0,
                light0: LightPair::FULL,
                light1: LightPair::FULL,
            };
            2
        ];
        let mut vertices = Vec::new();
        let stats = render_unbaked(&renderer, &registry, &requests, &mut vertices);
        assert_eq!(stats.len(), 2);
        assert!(stats.iter().all(|stat| !stat.cached));
        assert_eq!(stats[0].hash, stats[1].hash);
        assert!(renderer.cache().is_empty());
    }
}
