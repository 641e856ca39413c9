#![warn(missing_docs)]
//! Catenary chain meshing, mesh caching and lit vertex streaming.

mod cache;
mod catenary;
mod driver;
mod frame;
mod mesh;
mod renderer;
mod sink;

pub use cache::{BakeKey, CacheStats, ChainMeshCache, DEFAULT_CACHE_CAPACITY};
pub use catenary::{
    Catenary, CatenarySegments, CurveSegment, CurveShape, DEFAULT_HANG_AMOUNT, MAX_SEGMENTS,
};
pub use driver::{ChainBakeDriver, ChainBakeStat, ChainRequest};
pub use frame::SpanFrame;
pub use mesh::{
    build_chain_mesh, ChainMesh, ChainMeshBuilder, ChainVertex, MeshHash, MeshSettings,
    CHAIN_SCALE, DEFAULT_QUALITY, FACE_ANGLE_DEGREES,
};
pub use renderer::ChainRenderer;
pub use sink::{pack_light, render_mesh, LightPair, LitVertex, VertexSink, MAX_LIGHT};
