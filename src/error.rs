use thiserror::Error;

#[derive(Error, Debug)]
pub enum EzcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Invalid EZC file: bad magic number {0:02x?}")]
    BadMagic([u8; 4]),

    #[error("Unsupported EZC version: {0}")]
    UnsupportedVersion(u8),

    #[error("Truncated EZC header")]
    TruncatedHeader,

    #[error("Truncated EZC block payload: block {block} of {expected} is incomplete")]
    TruncatedPayload { block: usize, expected: usize },

    #[error("Invalid EZC file: {0}")]
    InvalidFormat(String),

    #[error("Block index {index} out of range (size {len})")]
    OutOfRange { index: usize, len: usize },

    #[error("Block coordinates ({row}, {col}) out of range (dimension {dim})")]
    CoordinatesOutOfRange { row: usize, col: usize, dim: usize },

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Task failed: {0}")]
    TaskFailed(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type EzcResult<T> = Result<T, EzcError>;
