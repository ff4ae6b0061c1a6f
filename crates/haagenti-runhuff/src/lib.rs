//! # Haagenti RunHuff
//!
//! Lossless byte-stream compression that runs Huffman coding over
//! run-length tokens instead of raw bytes.
//!
//! Every maximal run of identical bytes becomes one `(symbol, run_length)`
//! token, so long runs collapse into a single symbol before entropy coding.
//! The Huffman alphabet is the set of distinct tokens seen in the input.
//!
//! ## Pipeline
//!
//! ```text
//! compress:   RunCatalog → ContainerHeader → HuffmanTree → codewords → BitPacker
//! decompress: ContainerHeader → HuffmanTree (rebuilt from frequencies) → BitUnpacker
//! ```
//!
//! The container never carries codewords. The decoder rebuilds the exact
//! tree from the transmitted frequencies, which relies on the heap's
//! deterministic tie-break (see [`tree`]).
//!
//! ## Container format
//!
//! All integers big-endian:
//!
//! ```text
//! token_count   u16
//! original_size u32
//! token_count × { symbol u8, run_length u32, frequency u32 }
//! payload       32-bit packed codeword chunks, final chunk trimmed
//! ```
//!
//! ## Example
//!
//! ```
//! use haagenti_runhuff::{compress, decompress};
//!
//! let mut packed = Vec::new();
//! compress(&b"aaaabbbccd"[..], &mut packed).unwrap();
//!
//! let mut restored = Vec::new();
//! decompress(packed.as_slice(), &mut restored).unwrap();
//! assert_eq!(restored, b"aaaabbbccd");
//! ```

pub mod bits;
pub mod codec;
pub mod codeword;
pub mod compress;
pub mod decompress;
pub mod header;
pub mod heap;
pub mod rle;
pub mod run;
pub mod tree;

// Re-export main types
pub use codec::RunHuffCodec;
pub use codeword::{Codeword, SymbolIndex};
pub use compress::{compress, compress_bytes, compress_with_tree, EncodeSummary};
pub use decompress::decompress;
pub use header::ContainerHeader;
pub use heap::PriorityHeap;
pub use rle::RleCodec;
pub use run::{FrequencyEntry, RunCatalog, Runs, Token};
pub use tree::HuffmanTree;
