use crate::block::{Block, Sample, TxSize};
use crate::error::{EzcError, EzcResult};
use num_traits::AsPrimitive;

/// Number of `dim`-sized blocks needed to cover `len` samples.
pub fn blocks_along(len: u32, dim: usize) -> u32 {
    len.div_ceil(dim as u32)
}

/// Cut a row-major 8-bit raster into blocks, left to right then top to
/// bottom. Edge blocks are zero-padded past the raster bounds.
///
/// `samples` must hold exactly `width * height` values.
pub fn split_into_blocks<T: Sample>(
    samples: &[u8],
    width: u32,
    height: u32,
    size: TxSize,
) -> EzcResult<Vec<Block<T>>> {
    if samples.len() as u64 != width as u64 * height as u64 {
        return Err(EzcError::InvalidDimensions { width, height });
    }

    let dim = size.dim();
    let count_x = blocks_along(width, dim);
    let count_y = blocks_along(height, dim);
    let (width, height) = (width as usize, height as usize);

    let mut blocks = Vec::with_capacity(count_x as usize * count_y as usize);
    for by in 0..count_y {
        for bx in 0..count_x {
            let mut block = Block::new(size, bx, by);
            let x0 = bx as usize * dim;
            let y0 = by as usize * dim;

            for row in 0..dim.min(height - y0) {
                let src = (y0 + row) * width + x0;
                let cols = dim.min(width - x0);
                for (col, &px) in samples[src..src + cols].iter().enumerate() {
                    block[row * dim + col] = T::from_f64(px as f64);
                }
            }
            blocks.push(block);
        }
    }
    Ok(blocks)
}

/// Scatter blocks back into a row-major 8-bit raster.
///
/// Each block lands at its own grid coordinates, so the order of `blocks`
/// does not matter. Samples are clamped to 0..=255 and anything past the
/// raster bounds is dropped.
pub fn assemble_blocks<T: Sample>(blocks: &[Block<T>], width: u32, height: u32) -> Vec<u8> {
    let (width, height) = (width as usize, height as usize);
    let mut samples = vec![0u8; width * height];

    for block in blocks {
        let dim = block.dim();
        let x0 = block.block_x() as usize * dim;
        let y0 = block.block_y() as usize * dim;
        if x0 >= width || y0 >= height {
            continue;
        }

        for row in 0..dim.min(height - y0) {
            let dst = (y0 + row) * width + x0;
            for col in 0..dim.min(width - x0) {
                let value: f64 = block[row * dim + col].as_();
                samples[dst + col] = value.clamp(0.0, 255.0) as u8;
            }
        }
    }
    samples
}
