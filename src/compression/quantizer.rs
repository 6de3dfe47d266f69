use crate::block::{Block, Sample, TxSize};
use num_traits::AsPrimitive;

pub const LUMINANCE_QUANT_TABLE: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, 12, 12, 14, 19, 26, 58, 60, 55, 14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62, 18, 22, 37, 56, 68, 109, 103, 77, 24, 35, 55, 64, 81, 104, 113,
    92, 49, 64, 78, 87, 103, 121, 120, 101, 72, 92, 95, 98, 112, 100, 103, 99,
];

pub fn clamp_quality(quality: i32) -> u8 {
    quality.clamp(1, 100) as u8
}

/// Quality scale factor in percent, never below 1.
pub fn scale_factor(quality: u8) -> i64 {
    let quality = clamp_quality(quality as i32) as i64;
    let scale = if quality < 50 {
        5000 / quality
    } else {
        200 - quality * 2
    };
    scale.max(1)
}

/// Step size for coefficient `index` of an 8x8 block.
pub fn quant_value(index: usize, quality: u8) -> i64 {
    let base = LUMINANCE_QUANT_TABLE[index] as i64;
    ((base * scale_factor(quality) + 50) / 100).max(1)
}

/// Step sizes for one quality setting, computed once and shared by every
/// block of a stage.
#[derive(Debug, Clone)]
pub struct Quantizer {
    quality: u8,
    scale: i64,
    steps: [i64; 64],
}

impl Quantizer {
    pub fn new(quality: u8) -> Self {
        let quality = clamp_quality(quality as i32);
        let mut steps = [1i64; 64];
        for (i, step) in steps.iter_mut().enumerate() {
            *step = quant_value(i, quality);
        }
        Self {
            quality,
            scale: scale_factor(quality),
            steps,
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    pub fn scale(&self) -> i64 {
        self.scale
    }

    /// Step applied to coefficient `index` of a block of `size`. Sizes other
    /// than 8x8 have no perceptual table and use the bare scale factor.
    pub fn step(&self, size: TxSize, index: usize) -> i64 {
        match size {
            TxSize::Tx8x8 => self.steps[index],
            _ => self.scale,
        }
    }

    /// Divide each coefficient by its step. Arithmetic is done in `f64`
    /// and the result truncated into `D`, which for integer sources gives
    /// the same levels as truncating integer division.
    pub fn quantize<S: Sample, D: Sample>(&self, src: &Block<S>) -> Block<D> {
        let mut dst = Block::like(src);
        let size = src.size();

        for i in 0..src.len() {
            let value: f64 = src[i].as_();
            let q = self.step(size, i);
            let half = (q / 2) as f64;
            let level = match size {
                // round half away from zero
                TxSize::Tx8x8 if value >= 0.0 => (value + half) / q as f64,
                TxSize::Tx8x8 => (value - half) / q as f64,
                _ => value / q as f64,
            };
            dst[i] = D::from_f64(level);
        }

        dst
    }

    pub fn dequantize<S: Sample, D: Sample>(&self, src: &Block<S>) -> Block<D> {
        let mut dst = Block::like(src);
        let size = src.size();

        for i in 0..src.len() {
            let value: f64 = src[i].as_();
            dst[i] = D::from_f64(value * self.step(size, i) as f64);
        }

        dst
    }
}

pub fn quantize<S: Sample, D: Sample>(src: &Block<S>, quality: u8) -> Block<D> {
    Quantizer::new(quality).quantize(src)
}

pub fn dequantize<S: Sample, D: Sample>(src: &Block<S>, quality: u8) -> Block<D> {
    Quantizer::new(quality).dequantize(src)
}
