use glam::{Mat4, Quat, Vec3};

/// Maps the local chain frame onto a span's horizontal direction.
///
/// Chain meshes are built with +X pointing horizontally from the near anchor
/// toward the far anchor and +Y up. The frame is a yaw about +Y; vertical
/// spans use the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanFrame {
    rotation: Quat,
}

impl SpanFrame {
    /// Build the frame for `span`.
    pub fn new(span: Vec3) -> Self {
        let rotation = if !span.is_finite() || (span.x == 0.0 && span.z == 0.0) {
            Quat::IDENTITY
        } else {
            Quat::from_rotation_y(-span.z.atan2(span.x))
        };
        Self { rotation }
    }

    /// Yaw rotation from local to span coordinates.
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Rotate a local-frame point into span coordinates.
    pub fn to_span(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// Local-to-world transform placing the near anchor at `origin`.
    pub fn world_transform(&self, origin: Vec3) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, origin)
    }
}
