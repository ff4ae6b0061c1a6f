//! Decompression entry point.

use std::io::{BufWriter, Read, Write};

use haagenti_core::Result;
use tracing::debug;

use crate::bits::BitUnpacker;
use crate::header::ContainerHeader;
use crate::tree::HuffmanTree;

/// Decompress a container from `input` into `output`.
///
/// Decoding stops as soon as the header's original size has been produced;
/// anything after that point in `input` is left unread. The writer is
/// flushed before returning.
pub fn decompress<R: Read, W: Write>(mut input: R, output: W) -> Result<()> {
    let header = ContainerHeader::read_from(&mut input)?;
    let original_size = header.original_size as u64;

    let mut out = BufWriter::new(output);
    let Some(tree) = HuffmanTree::build(&header.entries) else {
        out.flush()?;
        debug!("empty container");
        return Ok(());
    };

    let mut unpacker = BitUnpacker::new(&mut input, &tree);
    unpacker.decode_into(&mut out, original_size)?;
    out.flush()?;

    debug!(
        original_size,
        tokens = header.token_count(),
        payload_bytes = unpacker.bytes_read(),
        "decompressed"
    );
    Ok(())
}
