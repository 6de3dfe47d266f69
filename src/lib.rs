pub mod block;
pub mod compression;
pub mod converter;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod pool;
pub mod raster;

pub use block::{Block, Sample, TxSize};
pub use compression::{BlockEngine, CodecConfig, Quantizer};
pub use converter::EzcConverter;
pub use decoder::{DecodedImage, EzcDecoder};
pub use encoder::{EncodedImage, EzcEncoder};
pub use error::{EzcError, EzcResult};
pub use format::header::{EzcHeader, EZC_MAGIC, EZC_VERSION};
pub use pool::{TaskHandle, TaskPool};

pub const VERSION: &str = "1.0.0";
