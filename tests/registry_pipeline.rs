use std::sync::Arc;

use glam::Vec3;
use hangchain_assets::registry_from_str;
use hangchain_render::{
    ChainBakeDriver, ChainRenderer, ChainRequest, LightPair, LitVertex, MeshSettings,
};

const PACK: &str = r#"
[
  { "name": "iron_chain", "side_a": [0, 0, 3, 16], "side_b": [3, 0, 6, 16] },
  { "name": "gold_chain", "side_a": [6, 0, 9, 16], "side_b": [9, 0, 12, 16] }
]
"#;

fn request(span: Vec3, chain_type: u16) -> ChainRequest {
    ChainRequest {
        origin: Vec3::new(0.5, 70.0, 0.5),
        span,
        chain_type,
        light0: LightPair::new(15, 15),
        light1: LightPair::new(0, 8),
    }
}

fn midpoint(a: &LitVertex, b: &LitVertex) -> Vec3 {
    (Vec3::from_array(a.position) + Vec3::from_array(b.position)) / 2.0
}

#[test]
fn registry_bake_pipeline_from_json() {
    let registry = registry_from_str(PACK).expect("valid pack");
    let iron = registry.id_by_name("iron_chain").unwrap();
    let gold = registry.id_by_name("gold_chain").unwrap();
    let mut renderer = ChainRenderer::default();
    let mut out: Vec<LitVertex> = Vec::new();

    let requests = [
        request(Vec3::new(3.0, -2.0, 4.0), iron),
        request(Vec3::new(-4.0, -2.0, 3.0), iron),
        request(Vec3::new(3.0, -2.0, 4.0), gold),
    ];
    let stats = ChainBakeDriver::new(&mut renderer, &registry).process(&requests, &mut out);

    assert_eq!(stats.len(), 3);
    assert!(!stats[0].cached);
    assert!(stats[1].cached, "yawed span reuses the iron mesh");
    assert!(!stats[2].cached, "chain type is part of the key");
    assert_ne!(stats[0].hash, stats[2].hash);
    assert_eq!(renderer.cache().len(), 2);

    // The first face of the first chain starts at the near anchor and the
    // first quad's far cross-section sits one segment along.
    let origin = requests[0].origin;
    assert!(midpoint(&out[0], &out[1]).distance(origin) < 1e-4);
    assert_eq!(out[0].light, LightPair::new(15, 15).packed());
}

#[test]
fn worked_span_ends_at_far_anchor() {
    let registry = registry_from_str(PACK).expect("valid pack");
    let mut renderer = ChainRenderer::new(
        MeshSettings {
            quality: 4.0,
            ..MeshSettings::default()
        },
        16,
    );
    let mut out: Vec<LitVertex> = Vec::new();
    let span = Vec3::new(3.0, -2.0, 4.0);
    let chain = registry.by_name("iron_chain").unwrap();
    let mesh = renderer.render_baked(
        &mut out,
        Vec3::ZERO,
        span,
        chain,
        LightPair::FULL,
        LightPair::FULL,
    );

    let face_end = mesh.face_quad_count() * 4;
    let end = midpoint(&out[face_end - 2], &out[face_end - 1]);
    assert!(end.distance(span) < 1e-4, "chain ended at {end}");
}

#[test]
fn vertical_span_steps_half_blocks_at_quality_two() {
    let registry = registry_from_str(PACK).expect("valid pack");
    let mut renderer = ChainRenderer::new(
        MeshSettings {
            quality: 2.0,
            ..MeshSettings::default()
        },
        16,
    );
    let mut out: Vec<LitVertex> = Vec::new();
    let chain = registry.by_name("iron_chain").unwrap();
    let mesh = renderer.render_baked(
        &mut out,
        Vec3::ZERO,
        Vec3::new(0.0, -10.0, 0.0),
        chain,
        LightPair::FULL,
        LightPair::FULL,
    );

    assert_eq!(mesh.face_quad_count(), 20);
    let face_end = mesh.face_quad_count() * 4;
    let end = midpoint(&out[face_end - 2], &out[face_end - 1]);
    assert!(end.distance(Vec3::new(0.0, -10.0, 0.0)) < 1e-4);
}

#[test]
fn purge_forces_rebuild() {
    let registry = registry_from_str(PACK).expect("valid pack");
    let chain = registry.by_name("gold_chain").unwrap();
    let mut renderer = ChainRenderer::default();
    let mut out: Vec<LitVertex> = Vec::new();
    let span = Vec3::new(2.0, 1.0, -2.0);
    let full = LightPair::FULL;

    let first = renderer.render_baked(&mut out, Vec3::ZERO, span, chain, full, full);
    renderer.purge();
    assert!(renderer.cache().is_empty());
    let second = renderer.render_baked(&mut out, Vec3::ZERO, span, chain, full, full);

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.hash(), second.hash());
    assert_eq!(renderer.cache().stats().misses, 2);
}
