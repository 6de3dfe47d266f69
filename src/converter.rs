use crate::compression::CodecConfig;
use crate::decoder::{DecodedImage, EzcDecoder};
use crate::encoder::{EncodedImage, EzcEncoder};
use crate::error::EzcResult;
use crate::format::container::write_ezc_file;
use image::DynamicImage;
use std::path::Path;

/// File-level glue between ordinary image formats and `.ezc` containers.
pub struct EzcConverter {
    config: CodecConfig,
}

impl EzcConverter {
    pub fn new() -> Self {
        Self {
            config: CodecConfig::default(),
        }
    }

    pub fn with_quality(mut self, quality: i32) -> Self {
        self.config.quality = CodecConfig::with_quality(quality).quality;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.config = self.config.threads(threads);
        self
    }

    pub fn quality(&self) -> u8 {
        self.config.quality
    }

    /// Load any image the `image` crate understands and write it as `.ezc`.
    pub fn to_ezc<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> EzcResult<EncodedImage> {
        let img = image::open(input)?;
        self.image_to_ezc(&img, output)
    }

    pub fn image_to_ezc<P: AsRef<Path>>(
        &self,
        image: &DynamicImage,
        output: P,
    ) -> EzcResult<EncodedImage> {
        let encoder = EzcEncoder::with_config(self.config.clone());
        let encoded = encoder.encode_blocks(&image.to_luma8())?;
        write_ezc_file(output, &encoded.header, &encoded.blocks)?;
        Ok(encoded)
    }

    /// Decode an `.ezc` file and save it; the output format follows the
    /// file extension.
    pub fn from_ezc<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input: P,
        output: Q,
    ) -> EzcResult<DecodedImage> {
        let decoded = self.ezc_to_image(input)?;
        decoded.image.save(output)?;
        Ok(decoded)
    }

    pub fn ezc_to_image<P: AsRef<Path>>(&self, input: P) -> EzcResult<DecodedImage> {
        let mut decoder = EzcDecoder::new();
        if let Some(threads) = self.config.threads {
            decoder = decoder.with_threads(threads);
        }
        decoder.decode_file(input)
    }
}

impl Default for EzcConverter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EzcError;
    use image::GrayImage;
    use std::fs;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("ezc-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_png_roundtrip_through_files() {
        let dir = scratch_dir("converter");
        let png = dir.join("input.png");
        let ezc = dir.join("image.ezc");
        let out = dir.join("output.png");

        let source = GrayImage::from_fn(30, 18, |x, y| image::Luma([(x * 7 + y * 3) as u8]));
        source.save(&png).unwrap();

        let converter = EzcConverter::new().with_quality(90).with_threads(2);
        let encoded = converter.to_ezc(&png, &ezc).unwrap();
        assert_eq!(encoded.header.quality, 90);
        assert_eq!(
            fs::metadata(&ezc).unwrap().len() as usize,
            encoded.header.file_size()
        );

        let decoded = converter.from_ezc(&ezc, &out).unwrap();
        assert_eq!(decoded.image.dimensions(), (30, 18));

        let reloaded = image::open(&out).unwrap().to_luma8();
        assert_eq!(reloaded, decoded.image);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_input_reports_error() {
        let dir = scratch_dir("converter-missing");
        let converter = EzcConverter::new();

        assert!(matches!(
            converter.to_ezc(dir.join("nope.png"), dir.join("out.ezc")),
            Err(EzcError::ImageError(_))
        ));
        assert!(matches!(
            converter.from_ezc(dir.join("nope.ezc"), dir.join("out.png")),
            Err(EzcError::Io(_))
        ));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_quality_clamped() {
        assert_eq!(EzcConverter::new().with_quality(0).quality(), 1);
        assert_eq!(EzcConverter::new().with_quality(101).quality(), 100);
    }
}
