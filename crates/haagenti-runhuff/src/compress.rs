//! Compression entry points.

use std::io::{BufWriter, Read, Write};

use haagenti_core::{Error, Result};
use tracing::debug;

use crate::bits::BitPacker;
use crate::codeword;
use crate::header::ContainerHeader;
use crate::run::{RunCatalog, Runs};
use crate::tree::HuffmanTree;

/// Sizes reported by a completed compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeSummary {
    /// Input length in bytes.
    pub original_size: u64,
    /// Distinct tokens in the container's table.
    pub token_count: usize,
    /// Header bytes written.
    pub header_bytes: u64,
    /// Payload bytes written.
    pub payload_bytes: u64,
    /// Longest codeword depth; 0 for empty input or a single-leaf tree.
    pub tree_depth: usize,
}

impl EncodeSummary {
    /// Total compressed size.
    pub fn compressed_size(&self) -> u64 {
        self.header_bytes + self.payload_bytes
    }
}

/// Compress everything readable from `input` into `output`.
///
/// The whole input is buffered: run collection and encoding are two passes
/// over the same bytes. The writer is flushed before returning. On error the
/// output holds an unspecified partial container.
pub fn compress<R: Read, W: Write>(mut input: R, output: W) -> Result<()> {
    let mut data = Vec::new();
    input.read_to_end(&mut data)?;
    compress_bytes(&data, output)?;
    Ok(())
}

/// Compress an in-memory input into `output`.
pub fn compress_bytes<W: Write>(input: &[u8], output: W) -> Result<EncodeSummary> {
    compress_with_tree(input, output).map(|(summary, _)| summary)
}

/// Like [`compress_bytes`], also handing back the tree with its codewords
/// assigned. The tree is `None` for empty input.
pub fn compress_with_tree<W: Write>(
    input: &[u8],
    output: W,
) -> Result<(EncodeSummary, Option<HuffmanTree>)> {
    let mut out = BufWriter::new(output);

    let catalog = RunCatalog::collect(input)?;
    let header = ContainerHeader::new(catalog.input_len(), catalog.into_entries())?;
    header.write_to(&mut out)?;

    let mut summary = EncodeSummary {
        original_size: input.len() as u64,
        token_count: header.token_count(),
        header_bytes: header.encoded_len() as u64,
        ..Default::default()
    };

    let Some(mut tree) = HuffmanTree::build(&header.entries) else {
        out.flush()?;
        debug!("empty input, header only");
        return Ok((summary, None));
    };
    let index = codeword::assign(&mut tree)?;

    let mut packer = BitPacker::new(&mut out);
    for token in Runs::new(input) {
        let code = index
            .lookup(&tree, token)
            .ok_or_else(|| Error::codeword_not_found(token.symbol, token.run_length))?;
        packer.pack(code)?;
    }
    let (_, payload_bytes) = packer.finish()?;
    out.flush()?;

    summary.payload_bytes = payload_bytes;
    summary.tree_depth = tree.depth();

    debug!(
        original_size = summary.original_size,
        tokens = summary.token_count,
        depth = summary.tree_depth,
        compressed_size = summary.compressed_size(),
        "compressed"
    );
    Ok((summary, Some(tree)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packed(input: &[u8]) -> (Vec<u8>, EncodeSummary) {
        let mut out = Vec::new();
        let summary = compress_bytes(input, &mut out).unwrap();
        (out, summary)
    }

    #[test]
    fn test_compress_scenario_bytes() {
        let (out, summary) = packed(b"aaaabbbccd");

        let mut expected = vec![0x00, 0x04, 0x00, 0x00, 0x00, 0x0A];
        for (sym, run) in [(b'a', 4u8), (b'b', 3), (b'c', 2), (b'd', 1)] {
            expected.extend_from_slice(&[sym, 0, 0, 0, run, 0, 0, 0, 1]);
        }
        expected.push(0x1B);

        assert_eq!(out, expected);
        assert_eq!(summary.token_count, 4);
        assert_eq!(summary.header_bytes, 42);
        assert_eq!(summary.payload_bytes, 1);
        assert_eq!(summary.compressed_size(), out.len() as u64);
        assert_eq!(summary.tree_depth, 2);
    }

    #[test]
    fn test_compress_empty() {
        let (out, summary) = packed(b"");
        assert_eq!(out, vec![0; 6]);
        assert_eq!(summary.payload_bytes, 0);
        assert_eq!(summary.token_count, 0);
    }

    #[test]
    fn test_compress_single_run() {
        let data = vec![b'x'; 1_000_000];
        let (out, summary) = packed(&data);
        assert_eq!(
            out,
            vec![
                0x00, 0x01, 0x00, 0x0F, 0x42, 0x40, //
                b'x', 0x00, 0x0F, 0x42, 0x40, 0x00, 0x00, 0x00, 0x01, //
                0x00,
            ]
        );
        assert_eq!(summary.tree_depth, 0);
    }

    #[test]
    fn test_compress_from_reader() {
        let mut out = Vec::new();
        compress(&b"aaaabbbccd"[..], &mut out).unwrap();
        assert_eq!(out.len(), 43);
    }

    #[test]
    fn test_compress_with_tree() {
        let mut out = Vec::new();
        let (summary, tree) = compress_with_tree(b"aaaabbbccd", &mut out).unwrap();
        let tree = tree.unwrap();

        assert_eq!(out.len() as u64, summary.compressed_size());
        assert_eq!(tree.leaf_count(), summary.token_count);
        assert_eq!(tree.depth(), summary.tree_depth);
        assert!(tree.leaves().all(|(_, n)| n.codeword().map(|c| c.len) == Some(2)));

        let (_, none) = compress_with_tree(b"", Vec::new()).unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_compress_is_deterministic() {
        let data = b"abracadabra, abracadabra!! zzzzzz yyyy";
        assert_eq!(packed(data).0, packed(data).0);
    }
}
