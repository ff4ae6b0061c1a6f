//! Run collection: the token alphabet and its frequency table.
//!
//! A [`Token`] is one maximal run of a byte. [`RunCatalog`] scans the input
//! once and counts how often each distinct token occurs, keeping entries in
//! first-seen order. That order is what the container transmits and what the
//! tree builder consumes, on both the encode and the decode side.
//!
//! Memory is O(distinct tokens). Input with no repeated neighbours is the
//! worst case: every byte is its own run of length 1, bounded by 256 tokens,
//! while inputs with many different run lengths can produce up to one token
//! per run.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;

use haagenti_core::{Error, Result};
use tracing::debug;

/// A `(symbol, run_length)` pair, the unit of the compression alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Token {
    /// Raw byte value.
    pub symbol: u8,
    /// Number of consecutive copies, always at least 1.
    pub run_length: u32,
}

impl Token {
    /// Create a token.
    pub const fn new(symbol: u8, run_length: u32) -> Self {
        Self { symbol, run_length }
    }
}

/// How many times a token occurred in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyEntry {
    pub token: Token,
    pub count: u32,
}

impl FrequencyEntry {
    /// Create an entry.
    pub const fn new(token: Token, count: u32) -> Self {
        Self { token, count }
    }

    /// Number of output bytes this entry accounts for.
    pub fn expanded_len(&self) -> u64 {
        self.token.run_length as u64 * self.count as u64
    }
}

/// Iterator over the maximal runs of a byte slice.
///
/// Runs longer than `u32::MAX` are split so that every token fits the
/// container's 32-bit run length field.
#[derive(Debug, Clone)]
pub struct Runs<'a> {
    data: &'a [u8],
}

impl<'a> Runs<'a> {
    /// Iterate the runs of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }
}

impl Iterator for Runs<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let (&symbol, rest) = self.data.split_first()?;
        let limit = rest.len().min(u32::MAX as usize - 1);
        let repeats = rest[..limit].iter().take_while(|&&b| b == symbol).count();
        let run_length = repeats + 1;

        self.data = &self.data[run_length..];
        Some(Token::new(symbol, run_length as u32))
    }
}

/// Frequency table of every distinct token in an input.
#[derive(Debug, Clone, Default)]
pub struct RunCatalog {
    entries: Vec<FrequencyEntry>,
    positions: HashMap<Token, usize>,
    input_len: u64,
}

impl RunCatalog {
    /// Scan `input` once and count its runs.
    ///
    /// Zero-length input yields an empty catalog.
    pub fn collect(input: &[u8]) -> Result<Self> {
        let input_len = input.len() as u64;
        if input_len > u32::MAX as u64 {
            return Err(Error::limit_exceeded(
                "input size",
                input_len,
                u32::MAX as u64,
            ));
        }

        let mut catalog = RunCatalog {
            input_len,
            ..Default::default()
        };
        for token in Runs::new(input) {
            catalog.record(token);
        }

        debug!(
            input_len,
            tokens = catalog.entries.len(),
            "collected runs"
        );
        Ok(catalog)
    }

    fn record(&mut self, token: Token) {
        match self.positions.entry(token) {
            Entry::Occupied(slot) => self.entries[*slot.get()].count += 1,
            Entry::Vacant(slot) => {
                slot.insert(self.entries.len());
                self.entries.push(FrequencyEntry::new(token, 1));
            }
        }
    }

    /// Entries in first-seen order.
    pub fn entries(&self) -> &[FrequencyEntry] {
        &self.entries
    }

    /// Consume the catalog, keeping the ordered entries.
    pub fn into_entries(self) -> Vec<FrequencyEntry> {
        self.entries
    }

    /// Frequency of a token, if it occurred.
    pub fn count(&self, token: Token) -> Option<u32> {
        self.positions.get(&token).map(|&i| self.entries[i].count)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for zero-length input.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Length of the scanned input in bytes.
    pub fn input_len(&self) -> u64 {
        self.input_len
    }
}

impl fmt::Display for RunCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SYM LENG FREQ")?;
        for entry in &self.entries {
            writeln!(
                f,
                " {:02x} {:4} {}",
                entry.token.symbol, entry.token.run_length, entry.count
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(data: &[u8]) -> Vec<(u8, u32)> {
        Runs::new(data).map(|t| (t.symbol, t.run_length)).collect()
    }

    #[test]
    fn test_runs_basic() {
        assert_eq!(
            tokens(b"aaaabbbccd"),
            vec![(b'a', 4), (b'b', 3), (b'c', 2), (b'd', 1)]
        );
    }

    #[test]
    fn test_runs_closes_final_run() {
        assert_eq!(tokens(b"abbb"), vec![(b'a', 1), (b'b', 3)]);
        assert_eq!(tokens(b"z"), vec![(b'z', 1)]);
        assert!(tokens(b"").is_empty());
    }

    #[test]
    fn test_catalog_scenario() {
        let catalog = RunCatalog::collect(b"aaaabbbccd").unwrap();
        assert_eq!(
            catalog.entries(),
            &[
                FrequencyEntry::new(Token::new(b'a', 4), 1),
                FrequencyEntry::new(Token::new(b'b', 3), 1),
                FrequencyEntry::new(Token::new(b'c', 2), 1),
                FrequencyEntry::new(Token::new(b'd', 1), 1),
            ]
        );
        assert_eq!(catalog.input_len(), 10);
    }

    #[test]
    fn test_catalog_aggregates_in_first_seen_order() {
        let catalog = RunCatalog::collect(b"aabaacaab").unwrap();
        assert_eq!(
            catalog.entries(),
            &[
                FrequencyEntry::new(Token::new(b'a', 2), 3),
                FrequencyEntry::new(Token::new(b'b', 1), 2),
                FrequencyEntry::new(Token::new(b'c', 1), 1),
            ]
        );
        assert_eq!(catalog.count(Token::new(b'a', 2)), Some(3));
        assert_eq!(catalog.count(Token::new(b'a', 1)), None);
    }

    #[test]
    fn test_catalog_same_symbol_different_lengths() {
        let catalog = RunCatalog::collect(b"xyxxyxxx").unwrap();
        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog.count(Token::new(b'x', 1)), Some(1));
        assert_eq!(catalog.count(Token::new(b'x', 2)), Some(1));
        assert_eq!(catalog.count(Token::new(b'x', 3)), Some(1));
        assert_eq!(catalog.count(Token::new(b'y', 1)), Some(2));
    }

    #[test]
    fn test_catalog_empty() {
        let catalog = RunCatalog::collect(b"").unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.input_len(), 0);
    }

    #[test]
    fn test_catalog_no_repeats() {
        let data: Vec<u8> = (0..=255u8).collect();
        let catalog = RunCatalog::collect(&data).unwrap();
        assert_eq!(catalog.len(), 256);
        assert!(catalog.entries().iter().all(|e| e.token.run_length == 1 && e.count == 1));
    }

    #[test]
    fn test_expanded_len_covers_input() {
        let data = b"mississippi riverbank";
        let catalog = RunCatalog::collect(data).unwrap();
        let total: u64 = catalog.entries().iter().map(FrequencyEntry::expanded_len).sum();
        assert_eq!(total, data.len() as u64);
    }

    #[test]
    fn test_catalog_display() {
        let catalog = RunCatalog::collect(b"aaab").unwrap();
        assert_eq!(catalog.to_string(), "SYM LENG FREQ\n 61    3 1\n 62    1 1\n");
    }
}
