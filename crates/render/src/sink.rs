use glam::{Mat4, Vec2, Vec3};

use crate::ChainMesh;

/// Highest block or sky light level.
pub const MAX_LIGHT: u8 = 15;

/// Pack block and sky light the way the host lightmap expects.
pub fn pack_light(block: u8, sky: u8) -> u32 {
    ((block as u32) << 4) | ((sky as u32) << 20)
}

/// Block + sky light sampled at one chain anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightPair {
    /// Block light level, range 0-15.
    pub block: u8,
    /// Sky light level, range 0-15.
    pub sky: u8,
}

impl LightPair {
    /// Construct a pair, clamping both levels to `MAX_LIGHT`.
    pub fn new(block: u8, sky: u8) -> Self {
        Self {
            block: block.min(MAX_LIGHT),
            sky: sky.min(MAX_LIGHT),
        }
    }

    /// Fully lit by both sources.
    pub const FULL: Self = Self {
        block: MAX_LIGHT,
        sky: MAX_LIGHT,
    };

    /// Packed lightmap coordinate.
    pub fn packed(self) -> u32 {
        pack_light(self.block, self.sky)
    }

    /// Interpolate each channel independently, truncating toward zero.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Self::new(channel(self.block, other.block), channel(self.sky, other.sky))
    }
}

/// Destination for transformed, lit chain vertices.
pub trait VertexSink {
    /// Append one vertex.
    fn vertex(&mut self, position: Vec3, uv: Vec2, light: u32);
}

/// Vertex layout written by the `Vec` sink, ready for GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LitVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
    /// Packed lightmap coordinate (see [`pack_light`]).
    pub light: u32,
}

impl VertexSink for Vec<LitVertex> {
    fn vertex(&mut self, position: Vec3, uv: Vec2, light: u32) {
        self.push(LitVertex {
            position: position.to_array(),
            uv: uv.to_array(),
            light,
        });
    }
}

/// Stream `mesh` into `sink`, transformed by `transform`.
///
/// Light is interpolated from `light0` at the near anchor to `light1` at the
/// far anchor, using each vertex's position within its face.
pub fn render_mesh<S>(
    mesh: &ChainMesh,
    transform: &Mat4,
    light0: LightPair,
    light1: LightPair,
    sink: &mut S,
) where
    S: VertexSink + ?Sized,
{
    let per_face = mesh.vertices().len() / 2;
    if per_face == 0 {
        return;
    }
    for (i, vertex) in mesh.vertices().iter().enumerate() {
        let t = (i % per_face) as f32 / per_face as f32;
        let light = light0.lerp(light1, t).packed();
        let position = transform.transform_point3(Vec3::from_array(vertex.position));
        sink.vertex(position, Vec2::from_array(vertex.uv), light);
    }
}
