use super::header::{EzcHeader, BLOCK_PAYLOAD_SIZE, CONTAINER_TX_SIZE};
use crate::block::Block;
use crate::error::{EzcError, EzcResult};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Write the header followed by every block in raster-scan order.
///
/// Blocks are placed by the index derived from their own coordinates, so
/// `blocks` may arrive in any order. The grid must be covered exactly once
/// by 8x8 blocks.
pub fn write_blocks<W: Write>(
    writer: &mut W,
    header: &EzcHeader,
    blocks: &[Block<i16>],
) -> EzcResult<()> {
    header.validate()?;
    let ordered = order_blocks(header, blocks)?;

    header.write(writer)?;
    for block in ordered {
        for &coeff in block.iter() {
            writer.write_i16::<LittleEndian>(coeff)?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn order_blocks<'a>(
    header: &EzcHeader,
    blocks: &'a [Block<i16>],
) -> EzcResult<Vec<&'a Block<i16>>> {
    let expected = header.block_count();
    if blocks.len() != expected {
        return Err(EzcError::InvalidFormat(format!(
            "expected {} blocks for a {}x{} grid, got {}",
            expected,
            header.block_count_x,
            header.block_count_y,
            blocks.len()
        )));
    }

    let mut slots: Vec<Option<&Block<i16>>> = vec![None; expected];
    for block in blocks {
        if block.size() != CONTAINER_TX_SIZE {
            return Err(EzcError::InvalidFormat(format!(
                "block ({}, {}) is {:?}, only 8x8 blocks can be stored",
                block.block_x(),
                block.block_y(),
                block.size()
            )));
        }
        let index = header
            .linear_index(block.block_x(), block.block_y())
            .ok_or_else(|| {
                EzcError::InvalidFormat(format!(
                    "block ({}, {}) lies outside the {}x{} grid",
                    block.block_x(),
                    block.block_y(),
                    header.block_count_x,
                    header.block_count_y
                ))
            })?;
        if slots[index].replace(block).is_some() {
            return Err(EzcError::InvalidFormat(format!(
                "duplicate block ({}, {})",
                block.block_x(),
                block.block_y()
            )));
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                let (x, y) = header.block_coords(index);
                EzcError::InvalidFormat(format!("missing block ({}, {})", x, y))
            })
        })
        .collect()
}

/// Read a header and its block payload. Block coordinates are rebuilt from
/// each block's position in the stream.
pub fn read_blocks<R: Read>(reader: &mut R) -> EzcResult<(EzcHeader, Vec<Block<i16>>)> {
    let header = EzcHeader::read(reader)?;
    header.validate()?;

    let total = header.block_count();
    let mut blocks = Vec::with_capacity(total);
    let mut raw = [0u8; BLOCK_PAYLOAD_SIZE];

    for index in 0..total {
        reader.read_exact(&mut raw).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => EzcError::TruncatedPayload {
                block: index,
                expected: total,
            },
            _ => EzcError::Io(e),
        })?;

        let (x, y) = header.block_coords(index);
        let mut block = Block::new(CONTAINER_TX_SIZE, x, y);
        let mut payload = &raw[..];
        payload.read_i16_into::<LittleEndian>(block.as_mut_slice())?;
        blocks.push(block);
    }

    Ok((header, blocks))
}

/// Write a container file. On failure the partially written file is
/// removed; the destination must not be trusted either way.
pub fn write_ezc_file<P: AsRef<Path>>(
    path: P,
    header: &EzcHeader,
    blocks: &[Block<i16>],
) -> EzcResult<()> {
    let path = path.as_ref();
    let result = File::create(path).map_err(EzcError::from).and_then(|file| {
        let mut writer = BufWriter::new(file);
        write_blocks(&mut writer, header, blocks)?;
        writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        Ok(())
    });

    if result.is_err() {
        let _ = fs::remove_file(path);
    }
    result
}

pub fn read_ezc_file<P: AsRef<Path>>(path: P) -> EzcResult<(EzcHeader, Vec<Block<i16>>)> {
    let mut reader = BufReader::new(File::open(path)?);
    read_blocks(&mut reader)
}
