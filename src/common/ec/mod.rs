mod block;
mod galois;

pub(crate) use block::Block;

use rayon::prelude::*;

use super::error::QRResult;
use super::metadata::{ECLevel, Version};

pub static MAX_EC_SIZE: usize = 30;

/// Splits the data codewords into blocks & appends the ec codewords of each.
pub(crate) fn ecc(data: &[u8], version: Version, ec_level: ECLevel) -> QRResult<Vec<Block>> {
    let ec_len = version.ecc_per_block(ec_level);
    blockify(data, version, ec_level)
        .par_iter()
        .map(|b| Block::new(b, ec_len))
        .collect::<QRResult<Vec<_>>>()
}

// Group 1 blocks come first, group 2 blocks hold one extra data codeword
pub(crate) fn blockify(data: &[u8], version: Version, ec_level: ECLevel) -> Vec<&[u8]> {
    let (block1_size, block1_count, block2_size, block2_count) =
        version.data_codewords_per_block(ec_level);

    let total_blocks = block1_count + block2_count;
    let total_block1_size = block1_size * block1_count;
    let total_size = total_block1_size + block2_size * block2_count;

    debug_assert!(
        total_size == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        total_size
    );

    let mut data_blocks = Vec::with_capacity(total_blocks);
    data_blocks.extend(data[..total_block1_size].chunks(block1_size));
    if block2_size > 0 {
        data_blocks.extend(data[total_block1_size..].chunks(block2_size));
    }
    data_blocks
}
