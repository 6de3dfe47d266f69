use super::dct;
use super::quantizer::{clamp_quality, Quantizer};
use crate::block::{Block, Sample};
use crate::error::EzcResult;
use crate::pool::{default_threads, TaskPool};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    pub quality: u8,
    /// Worker count; `None` uses the available hardware parallelism.
    pub threads: Option<usize>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            quality: 50,
            threads: None,
        }
    }
}

impl CodecConfig {
    pub fn with_quality(quality: i32) -> Self {
        Self {
            quality: clamp_quality(quality),
            ..Self::default()
        }
    }

    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(default_threads).max(1)
    }
}

/// Runs the per-block stages on a [`TaskPool`].
///
/// Every stage is a barrier: it returns only once all of its tasks have
/// finished. Each task owns one source block and produces one fresh
/// destination block, and output `i` always corresponds to input `i`.
pub struct BlockEngine {
    pool: TaskPool,
    quantizer: Arc<Quantizer>,
}

impl BlockEngine {
    pub fn new(config: &CodecConfig) -> EzcResult<Self> {
        Ok(Self {
            pool: TaskPool::new(config.worker_count())?,
            quantizer: Arc::new(Quantizer::new(config.quality)),
        })
    }

    /// Engine whose quantizer follows `quality` instead of the config's.
    pub fn with_quality(config: &CodecConfig, quality: u8) -> EzcResult<Self> {
        let mut engine = Self::new(config)?;
        engine.quantizer = Arc::new(Quantizer::new(quality));
        Ok(engine)
    }

    pub fn quality(&self) -> u8 {
        self.quantizer.quality()
    }

    pub fn threads(&self) -> usize {
        self.pool.threads()
    }

    pub fn forward_all<S: Sample, D: Sample>(
        &self,
        blocks: Vec<Block<S>>,
    ) -> EzcResult<Vec<Block<D>>> {
        self.run_stage(blocks, |block| dct::forward(&block))
    }

    pub fn inverse_all<S: Sample, D: Sample>(
        &self,
        blocks: Vec<Block<S>>,
    ) -> EzcResult<Vec<Block<D>>> {
        self.run_stage(blocks, |block| dct::inverse(&block))
    }

    pub fn quantize_all<S: Sample, D: Sample>(
        &self,
        blocks: Vec<Block<S>>,
    ) -> EzcResult<Vec<Block<D>>> {
        let quantizer = Arc::clone(&self.quantizer);
        self.run_stage(blocks, move |block| quantizer.quantize(&block))
    }

    pub fn dequantize_all<S: Sample, D: Sample>(
        &self,
        blocks: Vec<Block<S>>,
    ) -> EzcResult<Vec<Block<D>>> {
        let quantizer = Arc::clone(&self.quantizer);
        self.run_stage(blocks, move |block| quantizer.dequantize(&block))
    }

    fn run_stage<S, D, F>(&self, blocks: Vec<Block<S>>, op: F) -> EzcResult<Vec<Block<D>>>
    where
        S: Sample,
        D: Sample,
        F: Fn(Block<S>) -> Block<D> + Send + Sync + 'static,
    {
        let op = Arc::new(op);
        let handles: Vec<_> = blocks
            .into_iter()
            .map(|block| {
                let op = Arc::clone(&op);
                self.pool.submit(move || op(block))
            })
            .collect();

        TaskPool::join_all(handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::TxSize;

    fn sample_blocks(count: u32) -> Vec<Block<u16>> {
        (0..count)
            .map(|i| {
                let mut block = Block::new(TxSize::Tx8x8, i % 5, i / 5);
                for (j, v) in block.as_mut_slice().iter_mut().enumerate() {
                    *v = ((i as usize * 31 + j * 7) % 256) as u16;
                }
                block
            })
            .collect()
    }

    #[test]
    fn test_config_defaults_and_clamping() {
        let config = CodecConfig::default();
        assert_eq!(config.quality, 50);
        assert!(config.worker_count() >= 1);

        assert_eq!(CodecConfig::with_quality(0).quality, 1);
        assert_eq!(CodecConfig::with_quality(-20).quality, 1);
        assert_eq!(CodecConfig::with_quality(250).quality, 100);
        assert_eq!(CodecConfig::with_quality(80).threads(3).worker_count(), 3);
    }

    #[test]
    fn test_stage_output_matches_sequential() {
        let blocks = sample_blocks(23);
        let expected: Vec<Block<i16>> = blocks.iter().map(dct::forward::<u16, i16>).collect();

        let engine = BlockEngine::new(&CodecConfig::default().threads(4)).unwrap();
        let actual: Vec<Block<i16>> = engine.forward_all(blocks).unwrap();

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_stage_preserves_order_and_coordinates() {
        let blocks = sample_blocks(40);
        let coords: Vec<_> = blocks.iter().map(|b| (b.block_x(), b.block_y())).collect();

        let engine = BlockEngine::new(&CodecConfig::with_quality(75).threads(8)).unwrap();
        let coeffs: Vec<Block<i16>> = engine.forward_all(blocks).unwrap();
        let quantized: Vec<Block<i16>> = engine.quantize_all(coeffs).unwrap();

        let after: Vec<_> = quantized.iter().map(|b| (b.block_x(), b.block_y())).collect();
        assert_eq!(after, coords);
    }

    #[test]
    fn test_quantize_stage_uses_engine_quality() {
        let mut block: Block<i16> = Block::new(TxSize::Tx8x8, 0, 0);
        block.fill(100);

        let engine = BlockEngine::with_quality(&CodecConfig::default().threads(1), 100).unwrap();
        assert_eq!(engine.quality(), 100);
        let out: Vec<Block<i16>> = engine.quantize_all(vec![block.clone()]).unwrap();
        assert_eq!(out[0], block);
    }

    #[test]
    fn test_empty_stage() {
        let engine = BlockEngine::new(&CodecConfig::default().threads(2)).unwrap();
        let out: Vec<Block<i16>> = engine.inverse_all(Vec::<Block<i16>>::new()).unwrap();
        assert!(out.is_empty());
    }
}
