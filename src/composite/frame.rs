use crate::foundation::core::CanvasSpec;
use crate::foundation::error::{RemapError, RemapResult};

/// Premultiplied 4-channel 8-bit pixel.
pub type PremulPx = [u8; 4];

/// A frame of tightly packed, row-major, premultiplied 4-channel 8-bit pixels.
///
/// The channel order (RGBA or BGRA) is the caller's; compositing treats the first three
/// channels alike and channel 3 as alpha.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Pixel bytes, `width * height * 4` of them.
    pub data: Vec<u8>,
}

impl Frame {
    /// Wrap existing pixel bytes, checking the length against the dimensions.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> RemapResult<Self> {
        let frame = Self {
            width,
            height,
            data,
        };
        if !frame.is_well_formed() {
            return Err(RemapError::validation(format!(
                "frame {width}x{height} expects {} bytes, got {}",
                expected_len(width, height),
                frame.data.len()
            )));
        }
        Ok(frame)
    }

    /// Fully transparent frame.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Frame with every pixel set to `px`.
    pub fn filled(width: u32, height: u32, px: PremulPx) -> Self {
        Self {
            width,
            height,
            data: px.repeat(expected_len(width, height) / 4),
        }
    }

    /// Transparent output buffer sized for `canvas`.
    pub fn for_canvas(canvas: &CanvasSpec) -> Self {
        Self::transparent(canvas.width, canvas.height)
    }

    /// `true` when `data` holds exactly `width * height` pixels.
    pub fn is_well_formed(&self) -> bool {
        self.data.len() == expected_len(self.width, self.height)
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<PremulPx> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, px: PremulPx) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        if let Some(dst) = self.data.get_mut(i..i + 4) {
            dst.copy_from_slice(&px);
        }
    }

    /// Overwrite every pixel with `px`.
    pub fn fill(&mut self, px: PremulPx) {
        for dst in self.data.chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }

    /// Import a straight-alpha RGBA image, premultiplying it.
    pub fn from_rgba_image(img: &image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let mut data = Vec::with_capacity(expected_len(width, height));
        for px in img.pixels() {
            data.extend_from_slice(&premultiply(px.0));
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Export as a straight-alpha RGBA image.
    pub fn to_rgba_image(&self) -> RemapResult<image::RgbaImage> {
        let data: Vec<u8> = self
            .data
            .chunks_exact(4)
            .flat_map(|px| unpremultiply([px[0], px[1], px[2], px[3]]))
            .collect();
        image::RgbaImage::from_raw(self.width, self.height, data)
            .ok_or_else(|| RemapError::validation("frame buffer does not match its dimensions"))
    }
}

fn expected_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

/// Straight alpha to premultiplied alpha, rounding to nearest.
pub fn premultiply(px: [u8; 4]) -> PremulPx {
    let a = u16::from(px[3]);
    let mul = |c: u8| (((u16::from(c) * a) + 127) / 255) as u8;
    [mul(px[0]), mul(px[1]), mul(px[2]), px[3]]
}

/// Premultiplied alpha back to straight alpha. Transparent pixels become all-zero.
pub fn unpremultiply(px: PremulPx) -> [u8; 4] {
    let a = u32::from(px[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let div = |c: u8| ((u32::from(c) * 255 + a / 2) / a).min(255) as u8;
    [div(px[0]), div(px[1]), div(px[2]), px[3]]
}

#[cfg(test)]
#[path = "../../tests/unit/composite/frame.rs"]
mod tests;
