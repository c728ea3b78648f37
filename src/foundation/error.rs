use std::path::PathBuf;

pub type RemapResult<T> = Result<T, RemapError>;

#[derive(thiserror::Error, Debug)]
pub enum RemapError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("map load error: {0}")]
    MapLoad(#[from] MapLoadError),

    #[error("unknown stream: {0}")]
    UnknownStream(u32),

    #[error("composition error: {0}")]
    Composition(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RemapError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn composition(msg: impl Into<String>) -> Self {
        Self::Composition(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Failure to turn a map file into a [`crate::TransformMap`].
///
/// A failed load never touches the stream's current map.
#[derive(thiserror::Error, Debug)]
pub enum MapLoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed map document '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("map matrix '{0}' is missing")]
    MissingField(&'static str),

    #[error("map matrix '{field}' declares {rows}x{cols} but holds {len} values")]
    LengthMismatch {
        field: &'static str,
        rows: u32,
        cols: u32,
        len: usize,
    },

    #[error("map matrix '{0}' has a zero dimension")]
    ZeroDimension(&'static str),

    #[error("map matrices disagree: x is {x_cols}x{x_rows}, y is {y_cols}x{y_rows}")]
    DimensionMismatch {
        x_cols: u32,
        x_rows: u32,
        y_cols: u32,
        y_rows: u32,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
