use crate::foundation::error::{RemapError, RemapResult};

/// Exact rational value `num/den`, used for frame rates and pixel aspect ratios.
///
/// Values arrive from upstream as-is, so a zero denominator is representable; consumers treat
/// it as "unknown".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Fraction {
    /// Numerator.
    pub num: i32,
    /// Denominator.
    pub den: i32,
}

impl Fraction {
    /// `1/1`, the square pixel aspect ratio.
    pub const ONE: Self = Self { num: 1, den: 1 };

    /// Construct without validation.
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    /// Construct a fraction with both terms strictly positive.
    pub fn positive(num: i32, den: i32) -> RemapResult<Self> {
        if num <= 0 || den <= 0 {
            return Err(RemapError::validation(format!(
                "fraction {num}/{den} must have positive terms"
            )));
        }
        Ok(Self { num, den })
    }

    /// Floating-point value for comparisons; `0.0` when the denominator is zero.
    pub fn as_f64(self) -> f64 {
        if self.den == 0 {
            return 0.0;
        }
        f64::from(self.num) / f64::from(self.den)
    }

    /// `true` when both terms are strictly positive.
    pub fn is_positive(self) -> bool {
        self.num > 0 && self.den > 0
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<[i32; 2]> for Fraction {
    fn from(v: [i32; 2]) -> Self {
        Self::new(v[0], v[1])
    }
}

impl From<Fraction> for [i32; 2] {
    fn from(f: Fraction) -> Self {
        [f.num, f.den]
    }
}

impl std::fmt::Display for Fraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

/// Output frame rate used when no stream announces a usable one.
pub const DEFAULT_FPS: Fraction = Fraction::new(25, 1);

/// Placement of a stream's top-left corner on the canvas. Either axis may be negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Offset {
    /// Horizontal position in canvas pixels.
    pub x: i32,
    /// Vertical position in canvas pixels.
    pub y: i32,
}

impl Offset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width/height a stream occupies on the canvas after aspect correction. Always non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Footprint {
    /// Width in canvas pixels.
    pub width: u32,
    /// Height in canvas pixels.
    pub height: u32,
}

/// Geometry and timing announced by upstream for one input stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoInfo {
    /// Decoded frame width in pixels.
    pub width: u32,
    /// Decoded frame height in pixels.
    pub height: u32,
    /// Pixel aspect ratio of the decoded frames.
    pub par: Fraction,
    /// Nominal frame rate; `0/1` for variable or unknown rate.
    pub fps: Fraction,
}

impl VideoInfo {
    /// Square-pixel info with the given size and rate.
    pub fn new(width: u32, height: u32, fps: Fraction) -> Self {
        Self {
            width,
            height,
            par: Fraction::ONE,
            fps,
        }
    }
}

/// Output geometry and rate produced by negotiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSpec {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Exact output frame rate.
    pub fps: Fraction,
    /// Pixel aspect ratio of the output.
    pub par: Fraction,
}

impl CanvasSpec {
    /// Canvas with nothing to render yet.
    pub fn empty(par: Fraction) -> Self {
        Self {
            width: 0,
            height: 0,
            fps: DEFAULT_FPS,
            par,
        }
    }

    /// `true` for the 0x0 "nothing to render yet" canvas.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Bytes a tightly packed 4-channel 8-bit output buffer needs.
    pub fn byte_len(&self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self::empty(Fraction::ONE)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
