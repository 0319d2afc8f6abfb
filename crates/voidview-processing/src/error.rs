use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Unrecognized image format")]
    UnknownFormat,

    #[error("Input image has {pixels} pixels, over the limit of {limit}")]
    TooManyPixels { pixels: u64, limit: u64 },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Invalid target size {width}x{height}")]
    InvalidTarget { width: u32, height: u32 },
}

impl From<std::io::Error> for ProcessingError {
    fn from(err: std::io::Error) -> Self {
        ProcessingError::Decode(err.to_string())
    }
}
