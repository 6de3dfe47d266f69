pub mod dct;
pub mod engine;
pub mod quantizer;

pub use dct::{forward, inverse};
pub use engine::{BlockEngine, CodecConfig};
pub use quantizer::{quant_value, scale_factor, Quantizer, LUMINANCE_QUANT_TABLE};
