use ilattice::glam::Vec2;

/// An 8-bit RGBA color, as stored in a decoded texture.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque white, the color of every sample when no texture is supplied.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Channel-wise linear blend. `t` is clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;

        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

/// A borrowed view of a decoded texture: row-major pixels plus dimensions.
///
/// Decoding image files into this form is the caller's job; this crate only
/// ever reads the pixel array.
#[derive(Clone, Copy)]
pub struct Texture<'a> {
    pixels: &'a [Rgba],
    width: usize,
    height: usize,
}

impl<'a> Texture<'a> {
    /// # Panics
    ///
    /// If `pixels.len() != width * height`, or if either dimension is smaller
    /// than 2. The 2x2 minimum guarantees [`Self::bilinear`] always has a full
    /// neighborhood to interpolate.
    pub fn new(pixels: &'a [Rgba], width: usize, height: usize) -> Self {
        assert_eq!(
            pixels.len(),
            width * height,
            "pixel buffer length {} does not match {width}x{height}",
            pixels.len()
        );
        assert!(
            width >= 2 && height >= 2,
            "texture must be at least 2x2, got {width}x{height}"
        );

        Self {
            pixels,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Bilinearly interpolated color at `uv`.
    ///
    /// The fractional pixel coordinate is clamped to
    /// `[0, width - 2] x [0, height - 2]` before the 2x2 neighborhood is read,
    /// so any `uv` is safe, including values outside `[0, 1]`.
    pub fn bilinear(&self, uv: Vec2) -> Rgba {
        let fx = uv.x * self.width as f32 - 0.5;
        let fy = uv.y * self.height as f32 - 0.5;

        let x = (fx.floor() as i64).clamp(0, self.width as i64 - 2) as usize;
        let y = (fy.floor() as i64).clamp(0, self.height as i64 - 2) as usize;

        let tx = fx - x as f32;
        let ty = fy - y as f32;

        let c00 = self.pixels[y * self.width + x];
        let c10 = self.pixels[y * self.width + x + 1];
        let c01 = self.pixels[(y + 1) * self.width + x];
        let c11 = self.pixels[(y + 1) * self.width + x + 1];

        c00.lerp(c10, tx).lerp(c01.lerp(c11, tx), ty)
    }
}

/// Samples `texture` at `uv`, or returns opaque white when there is none.
///
/// A missing texture is not an error; untextured meshes voxelize to white
/// cubes.
#[inline]
pub fn bilinear_sample(uv: Vec2, texture: Option<&Texture>) -> Rgba {
    match texture {
        Some(texture) => texture.bilinear(uv),
        None => Rgba::WHITE,
    }
}
