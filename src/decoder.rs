use crate::block::Block;
use crate::compression::{BlockEngine, CodecConfig};
use crate::error::{EzcError, EzcResult};
use crate::format::container::read_blocks;
use crate::format::header::EzcHeader;
use crate::raster::assemble_blocks;
use image::GrayImage;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub header: EzcHeader,
    pub image: GrayImage,
}

pub struct EzcDecoder {
    config: CodecConfig,
}

impl EzcDecoder {
    pub fn new() -> Self {
        Self {
            config: CodecConfig::default(),
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.config = self.config.threads(threads);
        self
    }

    pub fn decode<R: Read>(&self, mut reader: R) -> EzcResult<DecodedImage> {
        let (header, blocks) = read_blocks(&mut reader)?;
        self.decode_blocks(header, blocks)
    }

    pub fn decode_file<P: AsRef<Path>>(&self, path: P) -> EzcResult<DecodedImage> {
        let file = File::open(path)?;
        self.decode(BufReader::new(file))
    }

    /// Dequantize and inverse-transform `blocks` with the quality stored in
    /// `header`, then scatter them into a raster of the header's size.
    pub fn decode_blocks(
        &self,
        header: EzcHeader,
        blocks: Vec<Block<i16>>,
    ) -> EzcResult<DecodedImage> {
        header.validate()?;
        if blocks.len() != header.block_count() {
            return Err(EzcError::InvalidFormat(format!(
                "expected {} blocks, got {}",
                header.block_count(),
                blocks.len()
            )));
        }

        let engine = BlockEngine::with_quality(&self.config, header.quality)?;
        let coefficients: Vec<Block<i16>> = engine.dequantize_all(blocks)?;
        let samples: Vec<Block<i16>> = engine.inverse_all(coefficients)?;

        let (width, height) = (header.width as u32, header.height as u32);
        let raw = assemble_blocks(&samples, width, height);
        let image = GrayImage::from_raw(width, height, raw).ok_or_else(|| {
            EzcError::InvalidFormat(format!("cannot build a {}x{} raster", width, height))
        })?;

        Ok(DecodedImage { header, image })
    }
}

impl Default for EzcDecoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::TxSize;
    use crate::format::container::write_blocks;

    fn flat_container(quality: u8, dc_level: i16) -> Vec<u8> {
        let header = EzcHeader::new(8, 8, quality).unwrap();
        let mut block: Block<i16> = Block::new(TxSize::Tx8x8, 0, 0);
        block[0] = dc_level;
        let mut bytes = Vec::new();
        write_blocks(&mut bytes, &header, &[block]).unwrap();
        bytes
    }

    #[test]
    fn test_dc_only_block_decodes_flat() {
        // level 64 * step 16 = DC 1024, i.e. 127.99999999999997 per sample
        let decoded = EzcDecoder::new().decode(flat_container(50, 64).as_slice()).unwrap();
        assert_eq!(decoded.image.dimensions(), (8, 8));
        assert!(decoded.image.pixels().all(|p| p.0[0] == 127));
    }

    #[test]
    fn test_uses_quality_from_header() {
        // same level, quality 100 has step 1 -> DC 64 -> 7.999...
        let decoded = EzcDecoder::new().decode(flat_container(100, 64).as_slice()).unwrap();
        assert!(decoded.image.pixels().all(|p| p.0[0] == 7));
    }

    #[test]
    fn test_out_of_range_samples_are_clamped() {
        let bright = EzcDecoder::new().decode(flat_container(100, 4000).as_slice()).unwrap();
        assert!(bright.image.pixels().all(|p| p.0[0] == 255));

        let dark = EzcDecoder::new().decode(flat_container(100, -4000).as_slice()).unwrap();
        assert!(dark.image.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_block_count_must_match_header() {
        let header = EzcHeader::new(16, 8, 50).unwrap();
        let blocks = vec![Block::new(TxSize::Tx8x8, 0, 0)];
        assert!(matches!(
            EzcDecoder::new().decode_blocks(header, blocks),
            Err(EzcError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        let err = EzcDecoder::new().decode(&b"PNG\x00garbage-bytes"[..]).unwrap_err();
        assert!(matches!(err, EzcError::BadMagic(_)));
    }
}
