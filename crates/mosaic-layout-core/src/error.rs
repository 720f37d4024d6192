use thiserror::Error;

#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, MosaicError>;
