//! Container header: token table plus original size.
//!
//! ```text
//! offset  size  field
//! 0       2     token_count    (u16, big-endian)
//! 2       4     original_size  (u32, big-endian)
//! 6       9×n   symbol u8 | run_length u32 | frequency u32
//! ```
//!
//! Codewords are not stored. The decoder rebuilds the Huffman tree from the
//! frequencies in table order.

use std::collections::HashSet;
use std::io::{Read, Write};

use haagenti_core::{Error, Result};

use crate::run::{FrequencyEntry, Token};

/// Size of the fixed part of the header.
pub const FIXED_LEN: usize = 6;

/// Size of one token table record.
pub const ENTRY_LEN: usize = 9;

/// Largest token table the 16-bit count field can describe.
pub const MAX_TOKENS: usize = u16::MAX as usize;

/// Decoded container header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Decompressed length in bytes.
    pub original_size: u32,
    /// Token table in transmission order.
    pub entries: Vec<FrequencyEntry>,
}

impl ContainerHeader {
    /// Build a header, checking the fixed-width limits.
    pub fn new(original_size: u64, entries: Vec<FrequencyEntry>) -> Result<Self> {
        if entries.len() > MAX_TOKENS {
            return Err(Error::limit_exceeded(
                "token count",
                entries.len() as u64,
                MAX_TOKENS as u64,
            ));
        }
        let original_size = u32::try_from(original_size).map_err(|_| {
            Error::limit_exceeded("original size", original_size, u32::MAX as u64)
        })?;
        Ok(Self {
            original_size,
            entries,
        })
    }

    /// Number of tokens in the table.
    pub fn token_count(&self) -> usize {
        self.entries.len()
    }

    /// Encoded size of this header in bytes.
    pub fn encoded_len(&self) -> usize {
        FIXED_LEN + ENTRY_LEN * self.entries.len()
    }

    /// Serialize the header.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&(self.entries.len() as u16).to_be_bytes());
        buf.extend_from_slice(&self.original_size.to_be_bytes());
        for entry in &self.entries {
            buf.push(entry.token.symbol);
            buf.extend_from_slice(&entry.token.run_length.to_be_bytes());
            buf.extend_from_slice(&entry.count.to_be_bytes());
        }
        out.write_all(&buf)?;
        Ok(())
    }

    /// Parse and validate a header, leaving `input` at the payload.
    ///
    /// Rejects zero run lengths, zero frequencies, duplicate tokens, and
    /// tables whose runs do not add up to `original_size`.
    pub fn read_from<R: Read>(input: &mut R) -> Result<Self> {
        let mut reader = FieldReader { input, offset: 0 };

        let token_count = u16::from_be_bytes(reader.array("header")?) as usize;
        let original_size = u32::from_be_bytes(reader.array("header")?);

        let mut entries = Vec::with_capacity(token_count);
        let mut seen = HashSet::with_capacity(token_count);
        let mut total = 0u64;

        for _ in 0..token_count {
            let [symbol] = reader.array::<1>("token table")?;
            let run_length = u32::from_be_bytes(reader.array("token table")?);
            let count = u32::from_be_bytes(reader.array("token table")?);
            let token = Token::new(symbol, run_length);

            if run_length == 0 {
                return Err(Error::corrupted(format!(
                    "zero run length for symbol 0x{symbol:02x}"
                )));
            }
            if count == 0 {
                return Err(Error::corrupted(format!(
                    "zero frequency for symbol 0x{symbol:02x} run {run_length}"
                )));
            }
            if !seen.insert(token) {
                return Err(Error::corrupted(format!(
                    "duplicate token 0x{symbol:02x} run {run_length}"
                )));
            }

            let entry = FrequencyEntry::new(token, count);
            total += entry.expanded_len();
            entries.push(entry);
        }

        if total != original_size as u64 {
            return Err(Error::corrupted(format!(
                "token table covers {total} bytes but original size is {original_size}"
            )));
        }

        Ok(Self {
            original_size,
            entries,
        })
    }
}

/// Reads fixed-width fields, tracking the offset for truncation errors.
struct FieldReader<'a, R: Read> {
    input: &'a mut R,
    offset: u64,
}

impl<R: Read> FieldReader<'_, R> {
    fn array<const N: usize>(&mut self, section: &'static str) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        self.input
            .read_exact(&mut buf)
            .map_err(|e| Error::from_read(e, section, self.offset))?;
        self.offset += N as u64;
        Ok(buf)
    }
}
