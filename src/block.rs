use crate::error::{EzcError, EzcResult};
use num_traits::{AsPrimitive, Zero};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Transform size of a block. The discriminant is the element count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TxSize {
    Tx4x4 = 16,
    Tx8x8 = 64,
    Tx16x16 = 256,
    Tx32x32 = 1024,
}

impl TxSize {
    pub const fn dim(&self) -> usize {
        match self {
            Self::Tx4x4 => 4,
            Self::Tx8x8 => 8,
            Self::Tx16x16 => 16,
            Self::Tx32x32 => 32,
        }
    }

    pub const fn element_count(&self) -> usize {
        *self as usize
    }

    pub fn from_dim(dim: u8) -> EzcResult<Self> {
        match dim {
            4 => Ok(Self::Tx4x4),
            8 => Ok(Self::Tx8x8),
            16 => Ok(Self::Tx16x16),
            32 => Ok(Self::Tx32x32),
            _ => Err(EzcError::InvalidFormat(format!(
                "Unsupported block dimension: {}",
                dim
            ))),
        }
    }
}

/// Numeric element kinds a [`Block`] can hold.
///
/// Only primitive numbers implement this, so a block of a non-numeric type
/// does not compile. Conversions from `f64` use `as` semantics: truncation
/// toward zero, saturating at the type's bounds.
pub trait Sample:
    Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static + Zero + AsPrimitive<f64>
{
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_sample {
    ($($t:ty),*) => {
        $(
            impl Sample for $t {
                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_sample!(u8, u16, i16, i32, f32, f64);

/// A square tile of samples tagged with its position in the block grid.
///
/// The buffer is owned exclusively; `clone` deep-copies it.
#[derive(Clone, PartialEq)]
pub struct Block<T: Sample> {
    block_x: u32,
    block_y: u32,
    size: TxSize,
    data: Box<[T]>,
}

impl<T: Sample> Block<T> {
    pub fn new(size: TxSize, block_x: u32, block_y: u32) -> Self {
        Self {
            block_x,
            block_y,
            size,
            data: vec![T::zero(); size.element_count()].into_boxed_slice(),
        }
    }

    pub fn from_vec(size: TxSize, block_x: u32, block_y: u32, data: Vec<T>) -> EzcResult<Self> {
        if data.len() != size.element_count() {
            return Err(EzcError::OutOfRange {
                index: data.len(),
                len: size.element_count(),
            });
        }
        Ok(Self {
            block_x,
            block_y,
            size,
            data: data.into_boxed_slice(),
        })
    }

    /// An empty block of the same size and position.
    pub fn like<U: Sample>(other: &Block<U>) -> Self {
        Self::new(other.size(), other.block_x(), other.block_y())
    }

    pub fn get(&self, index: usize) -> EzcResult<T> {
        self.data.get(index).copied().ok_or(EzcError::OutOfRange {
            index,
            len: self.data.len(),
        })
    }

    pub fn get_mut(&mut self, index: usize) -> EzcResult<&mut T> {
        let len = self.data.len();
        self.data
            .get_mut(index)
            .ok_or(EzcError::OutOfRange { index, len })
    }

    pub fn at(&self, row: usize, col: usize) -> EzcResult<T> {
        let index = self.linear_index(row, col)?;
        Ok(self.data[index])
    }

    pub fn at_mut(&mut self, row: usize, col: usize) -> EzcResult<&mut T> {
        let index = self.linear_index(row, col)?;
        Ok(&mut self.data[index])
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> EzcResult<()> {
        *self.at_mut(row, col)? = value;
        Ok(())
    }

    pub fn linear_index(&self, row: usize, col: usize) -> EzcResult<usize> {
        let dim = self.dim();
        if row >= dim || col >= dim {
            return Err(EzcError::CoordinatesOutOfRange { row, col, dim });
        }
        Ok(row * dim + col)
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    #[inline]
    pub fn block_x(&self) -> u32 {
        self.block_x
    }

    #[inline]
    pub fn block_y(&self) -> u32 {
        self.block_y
    }

    #[inline]
    pub fn size(&self) -> TxSize {
        self.size
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.size.dim()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T: Sample> Index<usize> for Block<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.data[index]
    }
}

impl<T: Sample> IndexMut<usize> for Block<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.data[index]
    }
}

impl<T: Sample> fmt::Debug for Block<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Block")
            .field("block_x", &self.block_x)
            .field("block_y", &self.block_y)
            .field("size", &self.size)
            .field("data", &&self.data[..])
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const ALL_SIZES: [TxSize; 4] = [
        TxSize::Tx4x4,
        TxSize::Tx8x8,
        TxSize::Tx16x16,
        TxSize::Tx32x32,
    ];

    #[test]
    fn test_new_block_is_zeroed() {
        for size in ALL_SIZES {
            let block: Block<u16> = Block::new(size, 3, 7);
            assert_eq!(block.len(), size.dim() * size.dim());
            assert!(block.iter().all(|&v| v == 0));
            assert_eq!(block.block_x(), 3);
            assert_eq!(block.block_y(), 7);

            let block: Block<f32> = Block::new(size, 0, 0);
            assert!(block.iter().all(|&v| v == 0.0));
        }
    }

    #[test]
    fn test_row_col_matches_linear_index() {
        let mut block: Block<u16> = Block::new(TxSize::Tx8x8, 0, 0);
        block.set(3, 4, 42).unwrap();
        assert_eq!(block.at(3, 4).unwrap(), 42);
        assert_eq!(block[3 * 8 + 4], 42);
        assert_eq!(block.get(3 * 8 + 4).unwrap(), 42);
    }

    #[test]
    fn test_bounds_checking() {
        for size in ALL_SIZES {
            let dim = size.dim();
            let mut block: Block<i16> = Block::new(size, 0, 0);

            assert!(matches!(
                block.at(dim, 0),
                Err(EzcError::CoordinatesOutOfRange { .. })
            ));
            assert!(block.at(0, dim).is_err());
            assert!(block.at(dim + 5, dim + 5).is_err());
            assert!(block.at_mut(dim, 0).is_err());
            assert!(matches!(
                block.get(dim * dim),
                Err(EzcError::OutOfRange { .. })
            ));
            assert!(block.get(dim * dim + 100).is_err());
            assert!(block.get_mut(dim * dim).is_err());

            assert!(block.at(dim - 1, dim - 1).is_ok());
            assert!(block.get(dim * dim - 1).is_ok());
        }
    }

    #[test]
    #[should_panic]
    fn test_unchecked_index_fails_loudly() {
        let block: Block<u8> = Block::new(TxSize::Tx4x4, 0, 0);
        let _ = block[16];
    }

    #[test]
    fn test_fill_and_clone_are_independent() {
        let mut a: Block<i16> = Block::new(TxSize::Tx8x8, 1, 2);
        a.fill(-5);
        let mut b = a.clone();
        b[0] = 99;

        assert!(a.iter().all(|&v| v == -5));
        assert_eq!(b[0], 99);
        assert_eq!(b.block_x(), 1);
        assert_eq!(b.block_y(), 2);
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(Block::<u8>::from_vec(TxSize::Tx8x8, 0, 0, vec![0; 63]).is_err());
        let block = Block::<u8>::from_vec(TxSize::Tx4x4, 0, 0, (0..16).collect()).unwrap();
        assert_eq!(block.at(1, 2).unwrap(), 6);
    }

    #[test]
    fn test_from_dim() {
        assert_eq!(TxSize::from_dim(8).unwrap(), TxSize::Tx8x8);
        assert_eq!(TxSize::from_dim(32).unwrap().element_count(), 1024);
        assert!(TxSize::from_dim(12).is_err());
    }

    proptest! {
        #[test]
        fn prop_row_col_and_linear_agree(row in 0usize..16, col in 0usize..16, value in any::<i16>()) {
            let mut block: Block<i16> = Block::new(TxSize::Tx16x16, 0, 0);
            *block.at_mut(row, col).unwrap() = value;
            prop_assert_eq!(block.get(row * 16 + col).unwrap(), value);
            prop_assert_eq!(block.linear_index(row, col).unwrap(), row * 16 + col);
        }
    }
}
