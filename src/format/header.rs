use crate::block::TxSize;
use crate::compression::quantizer::clamp_quality;
use crate::error::{EzcError, EzcResult};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Read, Write};

pub const EZC_MAGIC: [u8; 4] = [b'E', b'Z', b'C', 0x00];
pub const EZC_VERSION: u8 = 1;
pub const HEADER_SIZE: usize = 16;

/// Only 8x8 blocks are carried by the container.
pub const CONTAINER_TX_SIZE: TxSize = TxSize::Tx8x8;
pub const BLOCK_DIM: u8 = 8;
pub const COEFFS_PER_BLOCK: usize = 64;
pub const BLOCK_PAYLOAD_SIZE: usize = COEFFS_PER_BLOCK * 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EzcHeader {
    pub version: u8,
    pub width: u16,
    pub height: u16,
    pub quality: u8,
    pub block_dim: u8,
    pub block_count_x: u16,
    pub block_count_y: u16,
}

impl EzcHeader {
    pub fn new(width: u32, height: u32, quality: u8) -> EzcResult<Self> {
        if width == 0 || height == 0 || width > u16::MAX as u32 || height > u16::MAX as u32 {
            return Err(EzcError::InvalidDimensions { width, height });
        }
        let dim = BLOCK_DIM as u32;
        Ok(Self {
            version: EZC_VERSION,
            width: width as u16,
            height: height as u16,
            quality: clamp_quality(quality as i32),
            block_dim: BLOCK_DIM,
            block_count_x: width.div_ceil(dim) as u16,
            block_count_y: height.div_ceil(dim) as u16,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> EzcResult<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read and check the 16-byte header. Magic and version are checked
    /// as soon as they are read, so a short file with a foreign magic is
    /// reported as such rather than as truncated.
    pub fn read<R: Read>(reader: &mut R) -> EzcResult<Self> {
        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic).map_err(header_error)?;
        if magic != EZC_MAGIC {
            return Err(EzcError::BadMagic(magic));
        }

        let version = reader.read_u8().map_err(header_error)?;
        if version != EZC_VERSION {
            return Err(EzcError::UnsupportedVersion(version));
        }

        let mut rest = [0u8; HEADER_SIZE - 5];
        reader.read_exact(&mut rest).map_err(header_error)?;
        let mut cursor = io::Cursor::new(&rest[..]);

        Ok(Self {
            version,
            width: cursor.read_u16::<LittleEndian>()?,
            height: cursor.read_u16::<LittleEndian>()?,
            quality: cursor.read_u8()?,
            block_dim: cursor.read_u8()?,
            block_count_x: cursor.read_u16::<LittleEndian>()?,
            block_count_y: cursor.read_u16::<LittleEndian>()?,
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..4].copy_from_slice(&EZC_MAGIC);
        buf[4] = self.version;
        buf[5..7].copy_from_slice(&self.width.to_le_bytes());
        buf[7..9].copy_from_slice(&self.height.to_le_bytes());
        buf[9] = self.quality;
        buf[10] = self.block_dim;
        buf[11..13].copy_from_slice(&self.block_count_x.to_le_bytes());
        buf[13..15].copy_from_slice(&self.block_count_y.to_le_bytes());
        // buf[15] reserved
        buf
    }

    /// Check the invariants a reader relies on before trusting the payload.
    pub fn validate(&self) -> EzcResult<()> {
        let size = TxSize::from_dim(self.block_dim)?;
        if size != CONTAINER_TX_SIZE {
            return Err(EzcError::InvalidFormat(format!(
                "unsupported block dimension {} (only {} is supported)",
                self.block_dim, BLOCK_DIM
            )));
        }
        let dim = size.dim() as u32;
        let expected_x = (self.width as u32).div_ceil(dim);
        let expected_y = (self.height as u32).div_ceil(dim);
        if self.block_count_x as u32 != expected_x || self.block_count_y as u32 != expected_y {
            return Err(EzcError::InvalidFormat(format!(
                "block grid {}x{} does not match image {}x{} (expected {}x{})",
                self.block_count_x,
                self.block_count_y,
                self.width,
                self.height,
                expected_x,
                expected_y
            )));
        }
        Ok(())
    }

    pub fn block_count(&self) -> usize {
        self.block_count_x as usize * self.block_count_y as usize
    }

    /// Grid position of the block at raster-scan `index`.
    pub fn block_coords(&self, index: usize) -> (u32, u32) {
        let count_x = (self.block_count_x as usize).max(1);
        ((index % count_x) as u32, (index / count_x) as u32)
    }

    /// Raster-scan index of the block at `(block_x, block_y)`, if it lies
    /// inside the grid.
    pub fn linear_index(&self, block_x: u32, block_y: u32) -> Option<usize> {
        if block_x >= self.block_count_x as u32 || block_y >= self.block_count_y as u32 {
            return None;
        }
        Some(block_y as usize * self.block_count_x as usize + block_x as usize)
    }

    pub fn payload_size(&self) -> usize {
        self.block_count() * BLOCK_PAYLOAD_SIZE
    }

    pub fn file_size(&self) -> usize {
        HEADER_SIZE + self.payload_size()
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

fn header_error(e: io::Error) -> EzcError {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        EzcError::TruncatedHeader
    } else {
        EzcError::Io(e)
    }
}
