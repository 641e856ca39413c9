use std::num::NonZeroUsize;
use std::sync::Arc;

use glam::{DVec3, Vec3};
use hangchain_assets::ChainType;
use lru::LruCache;
use tracing::debug;

use crate::{build_chain_mesh, ChainMesh, MeshSettings};

/// Default number of meshes kept before the least recently used is evicted.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Geometric fingerprint of a chain: vertical delta, horizontal distance and
/// the chain type's two UV rectangles.
///
/// Horizontal direction is not part of the key. Meshes are built
/// in a local frame and oriented by the caller, so spans that differ only by a
/// yaw share one mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BakeKey {
    drop: u32,
    distance_xz: u32,
    side_a: [u32; 4],
    side_b: [u32; 4],
}

impl BakeKey {
    /// Key for a span vector (far anchor minus near anchor).
    pub fn new(span: Vec3, chain_type: &ChainType) -> Self {
        let distance_xz = (span.x * span.x + span.z * span.z).sqrt();
        Self {
            drop: canonical_bits(span.y),
            distance_xz: canonical_bits(distance_xz),
            side_a: chain_type.side_a().bits(),
            side_b: chain_type.side_b().bits(),
        }
    }

    /// Key for a chain between two world positions.
    pub fn between(src: DVec3, dst: DVec3, chain_type: &ChainType) -> Self {
        Self::new((dst - src).as_vec3(), chain_type)
    }
}

/// `-0.0` and `0.0` describe the same geometry.
fn canonical_bits(value: f32) -> u32 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

/// Counters describing cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache.
    pub hits: u64,
    /// Lookups that had to build a mesh.
    pub misses: u64,
    /// Meshes dropped to stay within capacity.
    pub evictions: u64,
    /// Wholesale clears.
    pub purges: u64,
}

/// Mesh cache keyed by [`BakeKey`] with an LRU eviction policy.
pub struct ChainMeshCache {
    entries: LruCache<BakeKey, Arc<ChainMesh>>,
    settings: MeshSettings,
    stats: CacheStats,
}

impl Default for ChainMeshCache {
    fn default() -> Self {
        Self::new(MeshSettings::default())
    }
}

impl ChainMeshCache {
    /// Create an empty cache with the default capacity.
    pub fn new(settings: MeshSettings) -> Self {
        Self::with_capacity(settings, DEFAULT_CACHE_CAPACITY)
    }

    /// Create an empty cache holding at most `capacity` meshes (minimum 1).
    pub fn with_capacity(settings: MeshSettings, capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            settings,
            stats: CacheStats::default(),
        }
    }

    /// Return the mesh for `key`, building it from `span` on a miss.
    ///
    /// `span` and `chain_type` must be the inputs `key` was derived from; only
    /// the shape is shared between spans with equal keys.
    pub fn get_or_build(
        &mut self,
        key: BakeKey,
        span: Vec3,
        chain_type: &ChainType,
    ) -> Arc<ChainMesh> {
        if let Some(mesh) = self.entries.get(&key) {
            self.stats.hits += 1;
            return Arc::clone(mesh);
        }

        self.stats.misses += 1;
        let mesh = Arc::new(build_chain_mesh(span, chain_type, &self.settings));
        debug!(
            ?span,
            chain_type = %chain_type.name,
            quads = mesh.quad_count(),
            "baked chain mesh"
        );
        if let Some((evicted, _)) = self.entries.push(key, Arc::clone(&mesh)) {
            if evicted != key {
                self.stats.evictions += 1;
                debug!(?evicted, "evicted chain mesh");
            }
        }
        mesh
    }

    /// Retrieve a mesh if it's cached, marking it as recently used.
    pub fn get(&mut self, key: &BakeKey) -> Option<Arc<ChainMesh>> {
        self.entries.get(key).cloned()
    }

    /// Whether `key` has a cached mesh.
    pub fn contains(&self, key: &BakeKey) -> bool {
        self.entries.contains(key)
    }

    /// Drop every cached mesh (e.g. after the texture atlas reloads).
    pub fn purge(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.stats.purges += 1;
        debug!(dropped, "purged chain mesh cache");
    }

    /// Settings used for new meshes.
    pub fn settings(&self) -> &MeshSettings {
        &self.settings
    }

    /// Replace the mesh settings, purging cached meshes if they changed.
    pub fn set_settings(&mut self, settings: MeshSettings) {
        if settings != self.settings {
            self.settings = settings;
            self.purge();
        }
    }

    /// Number of cached meshes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of cached meshes.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Hit/miss/eviction counters since construction.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
