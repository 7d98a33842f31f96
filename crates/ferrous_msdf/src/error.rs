use thiserror::Error;

/// Errors raised by the fallible edges of the API.  Distance field
/// generation itself never fails: degenerate geometry simply produces
/// background pixels.
#[derive(Debug, Error)]
pub enum MsdfError {
    #[error("bitmap sizes differ: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },
    #[error("a {width}x{height} region at ({x}, {y}) does not fit in a {dst_width}x{dst_height} buffer")]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        dst_width: u32,
        dst_height: u32,
    },
    #[error("destination buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, MsdfError>;
