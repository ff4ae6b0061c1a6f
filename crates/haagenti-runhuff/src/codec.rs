//! RunHuff codec (combined compressor + decompressor).

use haagenti_core::{Algorithm, Codec, Compressor, Decompressor, Error, Result};

use crate::compress::compress_bytes;
use crate::decompress::decompress;
use crate::header::ContainerHeader;

/// Run-length + Huffman codec over in-memory buffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunHuffCodec;

impl RunHuffCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        Self
    }

    /// Read only the container header of `input`.
    pub fn inspect(&self, input: &[u8]) -> Result<ContainerHeader> {
        ContainerHeader::read_from(&mut &input[..])
    }
}

impl Compressor for RunHuffCodec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RunHuffman
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        compress_bytes(input, &mut output)?;
        Ok(output)
    }
}

impl Decompressor for RunHuffCodec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RunHuffman
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        decompress(input, &mut output)?;
        Ok(output)
    }

    fn decompress_to(&self, input: &[u8], output: &mut [u8]) -> Result<usize> {
        // The header states the exact size, so check it before decoding.
        let header = self.inspect(input)?;
        let size = header.original_size as usize;
        if size > output.len() {
            return Err(Error::buffer_too_small(size, output.len()));
        }
        let mut cursor = &mut output[..size];
        decompress(input, &mut cursor)?;
        Ok(size)
    }
}

impl Codec for RunHuffCodec {
    fn new() -> Self {
        RunHuffCodec::new()
    }
}
