//! Plain run-length coding without an entropy stage.
//!
//! Each run is one 5-byte record: the symbol followed by its run length as a
//! big-endian `u32`. There is no header; the stream ends after the last
//! complete record. Runs longer than `u32::MAX` span several records.

use std::io::{self, BufWriter, Read, Write};

use haagenti_core::{Algorithm, Codec, Compressor, Decompressor, Error, Result};

use crate::bits::read_up_to;
use crate::run::Runs;

/// Bytes per record.
pub const RECORD_LEN: usize = 5;

/// Run-length encode everything readable from `input`.
pub fn encode<R: Read, W: Write>(mut input: R, output: W) -> Result<()> {
    let mut data = Vec::new();
    input.read_to_end(&mut data)?;

    let mut out = BufWriter::new(output);
    for token in Runs::new(&data) {
        out.write_all(&[token.symbol])?;
        out.write_all(&token.run_length.to_be_bytes())?;
    }
    out.flush()?;
    Ok(())
}

/// Expand run-length records from `input` into `output`.
pub fn decode<R: Read, W: Write>(mut input: R, output: W) -> Result<()> {
    let mut out = BufWriter::new(output);
    let mut offset = 0u64;

    loop {
        let mut record = [0u8; RECORD_LEN];
        let filled = read_up_to(&mut input, &mut record)?;
        if filled == 0 {
            break;
        }
        if filled < RECORD_LEN {
            return Err(Error::truncated("rle record", offset + filled as u64));
        }

        let symbol = record[0];
        let run_length = u32::from_be_bytes([record[1], record[2], record[3], record[4]]);
        if run_length == 0 {
            return Err(Error::corrupted(format!(
                "zero run length for symbol 0x{symbol:02x} at offset {offset}"
            )));
        }

        io::copy(&mut io::repeat(symbol).take(run_length as u64), &mut out)?;
        offset += RECORD_LEN as u64;
    }

    out.flush()?;
    Ok(())
}

/// Plain run-length codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct RleCodec;

impl RleCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        Self
    }
}

impl Compressor for RleCodec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RunLength
    }

    fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        encode(input, &mut output)?;
        Ok(output)
    }
}

impl Decompressor for RleCodec {
    fn algorithm(&self) -> Algorithm {
        Algorithm::RunLength
    }

    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        decode(input, &mut output)?;
        Ok(output)
    }
}

impl Codec for RleCodec {
    fn new() -> Self {
        RleCodec::new()
    }
}
