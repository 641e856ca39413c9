use blake3::Hasher;
use glam::{Quat, Vec2, Vec3};
use hangchain_assets::{ChainType, UvRect};

use crate::catenary::{Catenary, CurveShape, DEFAULT_HANG_AMOUNT};

/// Rotation of each crossed face around the chain's tangent, in degrees.
/// Side A uses `+FACE_ANGLE_DEGREES`, side B the negation.
pub const FACE_ANGLE_DEGREES: f32 = 45.0;

/// World units per texture unit along the chain.
pub const CHAIN_SCALE: f32 = 1.0;

/// Default link density (segments per block).
pub const DEFAULT_QUALITY: f32 = 4.0;

/// Hash of the vertex buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHash(pub [u8; 32]);

/// Packed vertex layout produced by the chain mesher.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ChainVertex {
    /// Position in the local chain frame.
    pub position: [f32; 3],
    /// Texture coordinates; `u` in texture units, `v` in arc length.
    pub uv: [f32; 2],
}

/// Tunables shared by every generated mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshSettings {
    /// Segments per unit of chain length.
    pub quality: f32,
    /// Catenary parameter; larger values hang tauter.
    pub hang_amount: f32,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_QUALITY,
            hang_amount: DEFAULT_HANG_AMOUNT,
        }
    }
}

impl MeshSettings {
    /// Desired distance between consecutive cross-sections.
    pub fn segment_length(&self) -> f32 {
        1.0 / self.quality
    }
}

/// Immutable double-faced ribbon mesh for one span/type combination.
#[derive(Debug, Clone)]
pub struct ChainMesh {
    vertices: Vec<ChainVertex>,
    hash: MeshHash,
}

impl ChainMesh {
    /// Construct an empty mesh.
    pub fn empty() -> Self {
        ChainMeshBuilder::with_capacity(0).build()
    }

    /// Vertices in quad order: four per quad, side A quads first.
    pub fn vertices(&self) -> &[ChainVertex] {
        &self.vertices
    }

    /// Total quads across both faces.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Quads per face.
    pub fn face_quad_count(&self) -> usize {
        self.quad_count() / 2
    }

    /// Whether the mesh has no geometry (coincident anchors).
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Stable hash of the vertex buffer.
    pub fn hash(&self) -> MeshHash {
        self.hash
    }

    /// Triangle-list indices for the quads (two triangles per quad).
    pub fn quad_indices(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.quad_count() * 6);
        for quad in 0..self.quad_count() as u32 {
            let base = quad * 4;
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        indices
    }
}

/// Accumulates quads until [`ChainMeshBuilder::build`] freezes them.
pub struct ChainMeshBuilder {
    vertices: Vec<ChainVertex>,
}

impl ChainMeshBuilder {
    /// Create a builder with room for `quads` quads.
    pub fn with_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 4),
        }
    }

    /// Append one quad. Corners go near-edge0, near-edge1, far-edge1, far-edge0.
    pub fn push_quad(&mut self, corners: [Vec3; 4], uvs: [Vec2; 4]) {
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(ChainVertex {
                position: corner.to_array(),
                uv: uv.to_array(),
            });
        }
    }

    /// Number of quads pushed so far.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Freeze the vertices into an immutable mesh.
    pub fn build(self) -> ChainMesh {
        let mut hasher = Hasher::new();
        hasher.update(bytemuck::cast_slice(&self.vertices));
        ChainMesh {
            vertices: self.vertices,
            hash: MeshHash(*hasher.finalize().as_bytes()),
        }
    }
}

/// Generate the ribbon mesh for `span` in the local chain frame.
pub fn build_chain_mesh(span: Vec3, chain_type: &ChainType, settings: &MeshSettings) -> ChainMesh {
    let catenary = Catenary::new(span, settings.hang_amount);
    let segment_length = settings.segment_length();
    let mut builder =
        ChainMeshBuilder::with_capacity(2 * catenary.segment_count_hint(segment_length));

    let faces = [
        (FACE_ANGLE_DEGREES, chain_type.side_a()),
        (-FACE_ANGLE_DEGREES, chain_type.side_b()),
    ];
    for (angle, uv) in faces {
        match catenary.shape() {
            CurveShape::Empty => {}
            CurveShape::Vertical => {
                build_face_vertical(&mut builder, &catenary, segment_length, angle, uv)
            }
            CurveShape::Hanging => build_face(&mut builder, &catenary, segment_length, angle, uv),
        }
    }
    builder.build()
}

/// Edge points of a cross-section centred on `point`.
fn cross_section(point: Vec3, normal: Vec3) -> (Vec3, Vec3) {
    let edge0 = point - normal / 2.0;
    (edge0, edge0 + normal)
}

/// Cross-section normal at a sample: perpendicular to the curve in the XY
/// plane, then rotated around the segment axis into the face's plane.
fn face_normal(gradient: f32, lift: f32, direction: Vec3, angle: f32, width: f32) -> Vec3 {
    let base = Vec3::new(-gradient, lift, 0.0).normalize_or_zero();
    let axis = direction.try_normalize().unwrap_or(Vec3::X);
    Quat::from_axis_angle(axis, angle) * base * width
}

fn quad_uvs(uv: &UvRect, v0: f32, v1: f32) -> [Vec2; 4] {
    [
        Vec2::new(uv.u0(), v0),
        Vec2::new(uv.u1(), v0),
        Vec2::new(uv.u1(), v1),
        Vec2::new(uv.u0(), v1),
    ]
}

fn build_face(
    builder: &mut ChainMeshBuilder,
    catenary: &Catenary,
    segment_length: f32,
    angle_degrees: f32,
    uv: &UvRect,
) {
    let width = uv.width() * CHAIN_SCALE;
    let angle = angle_degrees.to_radians();
    let lift = catenary.horizontal_ratio();

    let mut segments = catenary.segments(segment_length).peekable();
    let Some(first) = segments.peek().copied() else {
        return;
    };
    // The anchor cross-section has no previous segment; borrow the first one's axis.
    let mut far = cross_section(
        first.start,
        face_normal(catenary.gradient(0.0), lift, first.end - first.start, angle, width),
    );

    let mut v1 = 0.0;
    for segment in segments {
        let direction = segment.end - segment.start;
        let normal = face_normal(segment.gradient, lift, direction, angle, width);
        let near = far;
        far = cross_section(segment.end, normal);

        let v0 = v1;
        v1 = v0 + segment.length() / CHAIN_SCALE;
        builder.push_quad([near.0, near.1, far.1, far.0], quad_uvs(uv, v0, v1));
    }
}

fn build_face_vertical(
    builder: &mut ChainMeshBuilder,
    catenary: &Catenary,
    segment_length: f32,
    angle_degrees: f32,
    uv: &UvRect,
) {
    let width = uv.width() * CHAIN_SCALE;
    let angle = angle_degrees.to_radians();
    let normal = Vec3::new(angle.cos(), 0.0, angle.sin()) * width;

    let mut v1 = 0.0;
    for segment in catenary.segments(segment_length) {
        let near = cross_section(segment.start, normal);
        let far = cross_section(segment.end, normal);

        let v0 = v1;
        v1 = v0 + segment.length() / CHAIN_SCALE;
        builder.push_quad([near.0, near.1, far.1, far.0], quad_uvs(uv, v0, v1));
    }
}
