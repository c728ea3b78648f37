use std::path::Path;

use crate::foundation::error::MapLoadError;

/// Per-pixel source-coordinate lookup for one stream.
///
/// Entry `(x, y)` of the two fields names the point of the input frame that output pixel
/// `(x, y)` samples from. A NaN entry is the no-source sentinel.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformMap {
    width: u32,
    height: u32,
    xs: Vec<f32>,
    ys: Vec<f32>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct MatrixDoc {
    rows: u32,
    cols: u32,
    data: Vec<Option<f32>>,
}

#[derive(serde::Serialize, serde::Deserialize)]
struct MapDoc {
    #[serde(default)]
    x: Option<MatrixDoc>,
    #[serde(default)]
    y: Option<MatrixDoc>,
}

impl MatrixDoc {
    fn into_field(self, name: &'static str) -> Result<(u32, u32, Vec<f32>), MapLoadError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(MapLoadError::ZeroDimension(name));
        }
        let expected = (self.rows as usize).saturating_mul(self.cols as usize);
        if self.data.len() != expected {
            return Err(MapLoadError::LengthMismatch {
                field: name,
                rows: self.rows,
                cols: self.cols,
                len: self.data.len(),
            });
        }
        let values = self
            .data
            .into_iter()
            .map(|v| match v {
                Some(v) if v.is_finite() => v,
                _ => f32::NAN,
            })
            .collect();
        Ok((self.cols, self.rows, values))
    }

    fn from_field(width: u32, height: u32, values: &[f32]) -> Self {
        Self {
            rows: height,
            cols: width,
            data: values
                .iter()
                .map(|&v| if v.is_nan() { None } else { Some(v) })
                .collect(),
        }
    }
}

impl TransformMap {
    /// Read the `x` and `y` matrices from a JSON map file.
    ///
    /// Returns a fresh map; callers swap it in whole.
    pub fn load(path: &Path) -> Result<Self, MapLoadError> {
        let bytes = std::fs::read(path).map_err(|source| MapLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let doc: MapDoc = serde_json::from_slice(&bytes).map_err(|source| MapLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_doc(doc)
    }

    fn from_doc(doc: MapDoc) -> Result<Self, MapLoadError> {
        let x = doc.x.ok_or(MapLoadError::MissingField("x"))?;
        let y = doc.y.ok_or(MapLoadError::MissingField("y"))?;
        let (xw, xh, xs) = x.into_field("x")?;
        let (yw, yh, ys) = y.into_field("y")?;
        if xw != yw || xh != yh {
            return Err(MapLoadError::DimensionMismatch {
                x_cols: xw,
                x_rows: xh,
                y_cols: yw,
                y_rows: yh,
            });
        }
        Ok(Self {
            width: xw,
            height: xh,
            xs,
            ys,
        })
    }

    /// Build a map from row-major fields. Non-finite entries become the sentinel.
    pub fn from_fields(
        width: u32,
        height: u32,
        xs: Vec<f32>,
        ys: Vec<f32>,
    ) -> Result<Self, MapLoadError> {
        let wrap = |values: Vec<f32>| MatrixDoc {
            rows: height,
            cols: width,
            data: values.into_iter().map(Some).collect(),
        };
        Self::from_doc(MapDoc {
            x: Some(wrap(xs)),
            y: Some(wrap(ys)),
        })
    }

    /// Map where every output pixel samples the input pixel at the same position.
    pub fn identity(width: u32, height: u32) -> Result<Self, MapLoadError> {
        let n = (width as usize).saturating_mul(height as usize);
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        for y in 0..height {
            for x in 0..width {
                xs.push(x as f32);
                ys.push(y as f32);
            }
        }
        Self::from_fields(width, height, xs, ys)
    }

    /// Write the map in the same JSON layout [`TransformMap::load`] reads.
    pub fn save(&self, path: &Path) -> Result<(), MapLoadError> {
        let doc = MapDoc {
            x: Some(MatrixDoc::from_field(self.width, self.height, &self.xs)),
            y: Some(MatrixDoc::from_field(self.width, self.height, &self.ys)),
        };
        let json = serde_json::to_vec(&doc).map_err(|source| MapLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, json).map_err(|source| MapLoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Width of the output grid, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the output grid, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Source coordinate for output pixel `(x, y)`.
    ///
    /// `None` for the sentinel and for positions outside the map.
    #[inline]
    pub fn lookup(&self, x: u32, y: u32) -> Option<(f32, f32)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.width as usize + x as usize;
        let sx = self.xs[i];
        let sy = self.ys[i];
        if sx.is_nan() || sy.is_nan() {
            return None;
        }
        Some((sx, sy))
    }

    /// Mark output pixel `(x, y)` as having no source. Out-of-map positions are ignored.
    pub fn clear(&mut self, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = y as usize * self.width as usize + x as usize;
        self.xs[i] = f32::NAN;
        self.ys[i] = f32::NAN;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/map/transform_map.rs"]
mod tests;
