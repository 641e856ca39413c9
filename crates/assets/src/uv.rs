/// Atlas pixels covered by one texture unit.
pub const PIXELS_PER_UNIT: f32 = 16.0;

/// Texture-space bounds of one chain face, in atlas pixel units.
///
/// `x` runs across the chain (its width), `y` along it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    /// Left edge in pixels.
    pub x0: f32,
    /// Top edge in pixels.
    pub y0: f32,
    /// Right edge in pixels.
    pub x1: f32,
    /// Bottom edge in pixels.
    pub y1: f32,
}

impl UvRect {
    /// Construct a rectangle from pixel bounds.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Construct from the `[x0, y0, x1, y1]` layout used by chain type tables.
    pub fn from_array(bounds: [f32; 4]) -> Self {
        Self::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }

    /// Left `u` coordinate in texture units.
    pub fn u0(&self) -> f32 {
        self.x0 / PIXELS_PER_UNIT
    }

    /// Right `u` coordinate in texture units.
    pub fn u1(&self) -> f32 {
        self.x1 / PIXELS_PER_UNIT
    }

    /// Width of the chain face in world units (one block = 16 pixels).
    pub fn width(&self) -> f32 {
        (self.x1 - self.x0) / PIXELS_PER_UNIT
    }

    /// Bit-exact identity, usable as a hash key.
    pub fn bits(&self) -> [u32; 4] {
        [
            self.x0.to_bits(),
            self.y0.to_bits(),
            self.x1.to_bits(),
            self.y1.to_bits(),
        ]
    }

    /// Check that the rectangle is finite and has a positive extent on both axes.
    pub fn validate(&self) -> Result<(), String> {
        let bounds = [self.x0, self.y0, self.x1, self.y1];
        if bounds.iter().any(|v| !v.is_finite()) {
            return Err(format!("bounds must be finite (got {bounds:?})"));
        }
        if bounds.iter().any(|v| *v < 0.0) {
            return Err(format!("bounds must be non-negative (got {bounds:?})"));
        }
        if self.x1 <= self.x0 {
            return Err(format!("x1 ({}) must be greater than x0 ({})", self.x1, self.x0));
        }
        if self.y1 <= self.y0 {
            return Err(format!("y1 ({}) must be greater than y0 ({})", self.y1, self.y0));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_and_u_are_in_texture_units() {
        let uv = UvRect::new(0.0, 0.0, 3.0, 16.0);
        assert_eq!(uv.u0(), 0.0);
        assert_eq!(uv.u1(), 3.0 / 16.0);
        assert_eq!(uv.width(), 3.0 / 16.0);
    }

    #[test]
    fn rejects_inverted_and_empty_rects() {
        assert!(UvRect::new(3.0, 0.0, 0.0, 16.0).validate().is_err());
        assert!(UvRect::new(0.0, 4.0, 3.0, 4.0).validate().is_err());
        assert!(UvRect::new(0.0, 0.0, f32::NAN, 16.0).validate().is_err());
        assert!(UvRect::new(0.0, 0.0, 3.0, 16.0).validate().is_ok());
    }

    #[test]
    fn bits_distinguish_rects() {
        let a = UvRect::new(0.0, 0.0, 3.0, 16.0);
        let b = UvRect::new(3.0, 0.0, 6.0, 16.0);
        assert_ne!(a.bits(), b.bits());
        assert_eq!(a.bits(), UvRect::from_array([0.0, 0.0, 3.0, 16.0]).bits());
    }
}
