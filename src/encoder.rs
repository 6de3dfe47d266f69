use crate::block::Block;
use crate::compression::{BlockEngine, CodecConfig};
use crate::error::EzcResult;
use crate::format::container::write_blocks;
use crate::format::header::{EzcHeader, CONTAINER_TX_SIZE};
use crate::raster::split_into_blocks;
use image::{DynamicImage, GrayImage};
use std::io::Write;

/// Header and quantized blocks of an encoded image, before serialization.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    pub header: EzcHeader,
    pub blocks: Vec<Block<i16>>,
}

impl EncodedImage {
    pub fn write<W: Write>(&self, writer: &mut W) -> EzcResult<()> {
        write_blocks(writer, &self.header, &self.blocks)
    }
}

pub struct EzcEncoder {
    config: CodecConfig,
}

impl EzcEncoder {
    pub fn new() -> Self {
        Self {
            config: CodecConfig::default(),
        }
    }

    /// Quality is clamped to 1..=100.
    pub fn lossy(quality: i32) -> Self {
        Self::with_config(CodecConfig::with_quality(quality))
    }

    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.config = self.config.threads(threads);
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn quality(&self) -> u8 {
        self.config.quality
    }

    /// Split, transform and quantize a grayscale raster.
    pub fn encode_blocks(&self, image: &GrayImage) -> EzcResult<EncodedImage> {
        let (width, height) = image.dimensions();
        let header = EzcHeader::new(width, height, self.config.quality)?;

        let samples: Vec<Block<u16>> =
            split_into_blocks(image.as_raw(), width, height, CONTAINER_TX_SIZE)?;
        let engine = BlockEngine::new(&self.config)?;

        let coefficients: Vec<Block<i16>> = engine.forward_all(samples)?;
        let blocks: Vec<Block<i16>> = engine.quantize_all(coefficients)?;

        Ok(EncodedImage { header, blocks })
    }

    pub fn encode_luma<W: Write>(&self, image: &GrayImage, mut writer: W) -> EzcResult<()> {
        self.encode_blocks(image)?.write(&mut writer)
    }

    /// Encode any image; colour input is reduced to luma first.
    pub fn encode<W: Write>(&self, image: &DynamicImage, writer: W) -> EzcResult<()> {
        match image {
            DynamicImage::ImageLuma8(gray) => self.encode_luma(gray, writer),
            _ => self.encode_luma(&image.to_luma8(), writer),
        }
    }

    pub fn encode_to_vec(&self, image: &DynamicImage) -> EzcResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.encode(image, &mut buffer)?;
        Ok(buffer)
    }
}

impl Default for EzcEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EzcError;
    use crate::format::header::HEADER_SIZE;

    #[test]
    fn test_encoded_layout() {
        let image = GrayImage::from_fn(20, 9, |x, y| image::Luma([(x * 10 + y) as u8]));
        let encoded = EzcEncoder::lossy(60).encode_blocks(&image).unwrap();

        assert_eq!(encoded.header.width, 20);
        assert_eq!(encoded.header.height, 9);
        assert_eq!(encoded.header.quality, 60);
        assert_eq!(encoded.header.block_count_x, 3);
        assert_eq!(encoded.header.block_count_y, 2);
        assert_eq!(encoded.blocks.len(), 6);

        let coords: Vec<_> = encoded
            .blocks
            .iter()
            .map(|b| (b.block_x(), b.block_y()))
            .collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);

        let mut bytes = Vec::new();
        encoded.write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE + 6 * 128);
    }

    #[test]
    fn test_flat_image_quantizes_to_dc_only() {
        let image = GrayImage::from_pixel(8, 8, image::Luma([128]));
        let encoded = EzcEncoder::lossy(50).encode_blocks(&image).unwrap();

        // DC 1024 / step 16
        let block = &encoded.blocks[0];
        assert_eq!(block[0], 64);
        assert!(block.iter().skip(1).all(|&v| v == 0));
    }

    #[test]
    fn test_quality_is_clamped() {
        assert_eq!(EzcEncoder::lossy(-5).quality(), 1);
        assert_eq!(EzcEncoder::lossy(500).quality(), 100);
        assert_eq!(EzcEncoder::new().quality(), 50);
    }

    #[test]
    fn test_color_input_is_reduced_to_luma() {
        let rgb = DynamicImage::ImageRgb8(image::RgbImage::from_pixel(8, 8, image::Rgb([90, 90, 90])));
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, image::Luma([90])));

        let encoder = EzcEncoder::lossy(80).with_threads(2);
        assert_eq!(
            encoder.encode_to_vec(&rgb).unwrap(),
            encoder.encode_to_vec(&gray).unwrap()
        );
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let image = GrayImage::new(0, 4);
        assert!(matches!(
            EzcEncoder::new().encode_blocks(&image),
            Err(EzcError::InvalidDimensions { .. })
        ));
    }
}
