use std::sync::Arc;

use glam::Vec3;
use hangchain_assets::ChainType;

use crate::{
    build_chain_mesh, render_mesh, BakeKey, ChainMesh, ChainMeshCache, LightPair, MeshSettings,
    SpanFrame, VertexSink,
};

/// Draws chains between anchor pairs, reusing baked meshes where it can.
///
/// The renderer is the single owner of its mesh cache; callers that render
/// from several threads must serialise access themselves.
pub struct ChainRenderer {
    cache: ChainMeshCache,
}

impl ChainRenderer {
    /// Construct a renderer with `settings` and room for `cache_capacity` meshes.
    pub fn new(settings: MeshSettings, cache_capacity: usize) -> Self {
        tracing::info!(?settings, cache_capacity, "chain renderer initialized");
        Self {
            cache: ChainMeshCache::with_capacity(settings, cache_capacity),
        }
    }

    /// Render a chain from `origin` to `origin + span` through the mesh cache.
    pub fn render_baked<S>(
        &mut self,
        sink: &mut S,
        origin: Vec3,
        span: Vec3,
        chain_type: &ChainType,
        light0: LightPair,
        light1: LightPair,
    ) -> Arc<ChainMesh>
    where
        S: VertexSink + ?Sized,
    {
        let key = BakeKey::new(span, chain_type);
        let mesh = self.cache.get_or_build(key, span, chain_type);
        let transform = SpanFrame::new(span).world_transform(origin);
        render_mesh(&mesh, &transform, light0, light1, sink);
        mesh
    }

    /// Render a chain with a freshly built mesh, leaving the cache untouched.
    pub fn render_unbaked<S>(
        &self,
        sink: &mut S,
        origin: Vec3,
        span: Vec3,
        chain_type: &ChainType,
        light0: LightPair,
        light1: LightPair,
    ) -> ChainMesh
    where
        S: VertexSink + ?Sized,
    {
        let mesh = build_chain_mesh(span, chain_type, self.cache.settings());
        let transform = SpanFrame::new(span).world_transform(origin);
        render_mesh(&mesh, &transform, light0, light1, sink);
        mesh
    }

    /// Drop every baked mesh.
    pub fn purge(&mut self) {
        self.cache.purge();
    }

    /// Access the mesh cache.
    pub fn cache(&self) -> &ChainMeshCache {
        &self.cache
    }

    /// Settings used for new meshes.
    pub fn settings(&self) -> &MeshSettings {
        self.cache.settings()
    }

    /// Replace the mesh settings; baked meshes are purged if they changed.
    pub fn set_settings(&mut self, settings: MeshSettings) {
        self.cache.set_settings(settings);
    }
}

impl Default for ChainRenderer {
    fn default() -> Self {
        Self::new(MeshSettings::default(), crate::DEFAULT_CACHE_CAPACITY)
    }
}
