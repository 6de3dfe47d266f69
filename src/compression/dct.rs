use crate::block::{Block, Sample};
use num_traits::AsPrimitive;
use std::f64::consts::PI;

const INV_SQRT_2: f64 = 0.7071067811865475;

fn alpha(u: usize) -> f64 {
    if u == 0 {
        INV_SQRT_2
    } else {
        1.0
    }
}

/// `basis[k * dim + n] = cos((2n + 1) k pi / 2 dim)`
fn cosine_basis(dim: usize) -> Vec<f64> {
    let mut basis = vec![0.0f64; dim * dim];
    for k in 0..dim {
        for n in 0..dim {
            basis[k * dim + n] = (((2 * n + 1) * k) as f64 * PI / (2.0 * dim as f64)).cos();
        }
    }
    basis
}

/// Type-II 2D DCT by direct summation.
///
/// Samples are read in raster order (`src[y * dim + x]`) and coefficient
/// `(u, v)` lands at `v * dim + u`. Accumulation is done in `f64`; the final
/// conversion truncates toward zero.
pub fn forward<S: Sample, D: Sample>(src: &Block<S>) -> Block<D> {
    let dim = src.dim();
    let basis = cosine_basis(dim);
    let norm = 1.0 / (dim as f64 / 2.0);
    let mut dst = Block::like(src);

    for u in 0..dim {
        for v in 0..dim {
            let mut sum = 0.0;
            for x in 0..dim {
                for y in 0..dim {
                    let sample: f64 = src[y * dim + x].as_();
                    sum += sample * basis[u * dim + x] * basis[v * dim + y];
                }
            }
            dst[v * dim + u] = D::from_f64(norm * alpha(u) * alpha(v) * sum);
        }
    }

    dst
}

/// Type-III 2D DCT, the inverse of [`forward`]. Same layout and truncation.
pub fn inverse<S: Sample, D: Sample>(src: &Block<S>) -> Block<D> {
    let dim = src.dim();
    let basis = cosine_basis(dim);
    let norm = 1.0 / (dim as f64 / 2.0);
    let mut dst = Block::like(src);

    for x in 0..dim {
        for y in 0..dim {
            let mut sum = 0.0;
            for u in 0..dim {
                for v in 0..dim {
                    let coeff: f64 = src[v * dim + u].as_();
                    sum += alpha(u) * alpha(v) * coeff * basis[u * dim + x] * basis[v * dim + y];
                }
            }
            dst[y * dim + x] = D::from_f64(norm * sum);
        }
    }

    dst
}
