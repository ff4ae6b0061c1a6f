//! Big-endian bit packing for the codeword payload.
//!
//! The payload is a sequence of 32-bit big-endian chunks. Codewords are
//! written most-significant bit first and may straddle chunk boundaries.
//! Only the final chunk is partial: its pending bits are left-aligned and
//! its trailing zero bytes are dropped, keeping at least one byte.
//!
//! The payload carries no end marker. [`BitUnpacker`] stops once it has
//! produced the original byte count from the container header, so padding
//! bits in the last chunk are never decoded.

use std::io::{self, Read, Write};

use haagenti_core::{Error, Result};

use crate::codeword::Codeword;
use crate::tree::{HuffmanTree, NodeKind};

/// Width of the accumulator and of every full payload chunk.
pub const CHUNK_BITS: u32 = 32;

/// Bytes per full payload chunk.
pub const CHUNK_BYTES: usize = (CHUNK_BITS / 8) as usize;

#[inline]
fn low_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Read until `buf` is full or the input ends; returns the bytes read.
pub(crate) fn read_up_to<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match input.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::Io(e)),
        }
    }
    Ok(filled)
}

/// Packs codewords into 32-bit chunks.
pub struct BitPacker<W: Write> {
    out: W,
    buffer: u32,
    free_bits: u32,
    bytes_written: u64,
}

impl<W: Write> BitPacker<W> {
    /// Create a packer writing to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            buffer: 0,
            free_bits: CHUNK_BITS,
            bytes_written: 0,
        }
    }

    /// Append a codeword, flushing every chunk it fills.
    pub fn pack(&mut self, codeword: Codeword) -> Result<()> {
        let mut bits = codeword.bits & low_mask(codeword.len as u32);
        let mut len = codeword.len as u32;

        while len >= self.free_bits {
            let take = self.free_bits;
            let rest = len - take;
            let head = (bits >> rest) & low_mask(take);
            self.buffer = (((self.buffer as u64) << take) | head) as u32;
            self.flush_chunk()?;

            bits &= low_mask(rest);
            len = rest;
        }

        if len > 0 {
            self.buffer = (self.buffer << len) | bits as u32;
            self.free_bits -= len;
        }
        Ok(())
    }

    fn flush_chunk(&mut self) -> Result<()> {
        self.out.write_all(&self.buffer.to_be_bytes())?;
        self.bytes_written += CHUNK_BYTES as u64;
        self.buffer = 0;
        self.free_bits = CHUNK_BITS;
        Ok(())
    }

    /// Bits waiting in the accumulator.
    pub fn pending_bits(&self) -> u32 {
        CHUNK_BITS - self.free_bits
    }

    /// Flush the final partial chunk and return the writer with the total
    /// payload byte count.
    pub fn finish(mut self) -> Result<(W, u64)> {
        if self.free_bits < CHUNK_BITS {
            let aligned = self.buffer << self.free_bits;
            let bytes = aligned.to_be_bytes();
            let keep = bytes.iter().rposition(|&b| b != 0).map_or(1, |i| i + 1);
            self.out.write_all(&bytes[..keep])?;
            self.bytes_written += keep as u64;
        }
        Ok((self.out, self.bytes_written))
    }
}

/// Decodes a payload by walking the tree one bit at a time.
pub struct BitUnpacker<'t, R: Read> {
    input: R,
    tree: &'t HuffmanTree,
    bytes_read: u64,
}

impl<'t, R: Read> BitUnpacker<'t, R> {
    /// Create an unpacker over `input` for `tree`.
    pub fn new(input: R, tree: &'t HuffmanTree) -> Self {
        Self {
            input,
            tree,
            bytes_read: 0,
        }
    }

    /// Payload bytes consumed so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Read the next chunk, zero-filling a short final one.
    ///
    /// Returns `None` once the input is exhausted.
    fn next_chunk(&mut self) -> Result<Option<u32>> {
        let mut buf = [0u8; CHUNK_BYTES];
        let filled = read_up_to(&mut self.input, &mut buf)?;
        self.bytes_read += filled as u64;
        if filled == 0 {
            return Ok(None);
        }
        Ok(Some(u32::from_be_bytes(buf)))
    }

    /// Decode until exactly `original_size` bytes have been written to `out`.
    ///
    /// Returns the number of bytes written, which always equals
    /// `original_size` on success.
    pub fn decode_into<W: Write>(&mut self, out: &mut W, original_size: u64) -> Result<u64> {
        let tree = self.tree;
        let root = tree.root();
        let mut cursor = root;
        let mut emitted = 0u64;

        'chunks: while emitted < original_size {
            let Some(mut chunk) = self.next_chunk()? else {
                return Err(Error::truncated("payload", self.bytes_read));
            };

            for _ in 0..CHUNK_BITS {
                let bit = chunk & 0x8000_0000 != 0;
                chunk <<= 1;

                // A lone-leaf root consumes one 0 bit per token.
                match tree.node(cursor).kind {
                    NodeKind::Internal { left, right } => {
                        cursor = if bit { right } else { left };
                    }
                    NodeKind::Leaf { .. } if bit => {
                        return Err(Error::corrupted(format!(
                            "set bit in single-token payload at byte {emitted}"
                        )));
                    }
                    NodeKind::Leaf { .. } => {}
                }

                if let NodeKind::Leaf { token, .. } = tree.node(cursor).kind {
                    let run = token.run_length as u64;
                    if emitted + run > original_size {
                        return Err(Error::corrupted(format!(
                            "payload decodes past original size {original_size} at byte {emitted}"
                        )));
                    }
                    io::copy(&mut io::repeat(token.symbol).take(run), out)?;
                    emitted += run;
                    cursor = root;

                    if emitted == original_size {
                        break 'chunks;
                    }
                }
            }
        }

        Ok(emitted)
    }
}
