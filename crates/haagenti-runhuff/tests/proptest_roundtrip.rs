//! Property-based tests for run-length + Huffman compression.
//!
//! These tests verify that codec properties hold across a wide range of inputs:
//! - Decompress(compress(x)) == x for arbitrary and run-heavy data
//! - Compression is deterministic and the header records the true size
//! - The priority heap always yields its minimum
//! - Built trees are full binary trees with prefix-free codewords
//!
//! Run with: cargo test -p haagenti-runhuff --test proptest_roundtrip

use proptest::prelude::*;

use haagenti_core::{Codec, Compressor, Decompressor};
use haagenti_runhuff::tree::NodeKind;
use haagenti_runhuff::{codeword, HuffmanTree, PriorityHeap, RleCodec, RunCatalog, RunHuffCodec};

/// Strategy for data made of runs over a small alphabet.
fn run_heavy_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec((0u8..4, 1usize..300), 0..64).prop_map(|runs| {
        runs.into_iter()
            .flat_map(|(symbol, len)| std::iter::repeat(symbol).take(len))
            .collect()
    })
}

/// Strategy for arbitrary bytes.
fn arbitrary_bytes_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..2048)
}

/// Heap operation: `Some(v)` pushes, `None` pops.
fn heap_ops_strategy() -> impl Strategy<Value = Vec<Option<u32>>> {
    prop::collection::vec(prop::option::weighted(0.6, 0u32..1000), 0..200)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        max_shrink_iters: 200,
        ..ProptestConfig::default()
    })]

    /// Property: arbitrary bytes survive a round trip.
    #[test]
    fn prop_roundtrip_arbitrary(data in arbitrary_bytes_strategy()) {
        let codec = RunHuffCodec::new();
        let compressed = codec.compress(&data).unwrap();
        let decompressed = codec.decompress(&compressed).unwrap();
        prop_assert_eq!(decompressed, data);
    }

    /// Property: run-heavy data survives a round trip and compresses well.
    #[test]
    fn prop_roundtrip_run_heavy(data in run_heavy_strategy()) {
        let codec = RunHuffCodec::new();
        prop_assert!(codec.verify_roundtrip(&data).unwrap());
    }

    /// Property: compressing the same input twice gives identical bytes.
    #[test]
    fn prop_compress_deterministic(data in run_heavy_strategy()) {
        let codec = RunHuffCodec::new();
        prop_assert_eq!(codec.compress(&data).unwrap(), codec.compress(&data).unwrap());
    }

    /// Property: the header's original size equals the input length and the
    /// table matches the run catalog.
    #[test]
    fn prop_header_honest(data in run_heavy_strategy()) {
        let codec = RunHuffCodec::new();
        let compressed = codec.compress(&data).unwrap();
        let header = codec.inspect(&compressed).unwrap();
        let catalog = RunCatalog::collect(&data).unwrap();

        prop_assert_eq!(header.original_size as usize, data.len());
        prop_assert_eq!(header.entries.as_slice(), catalog.entries());
        prop_assert!(compressed.len() >= header.encoded_len());
    }

    /// Property: after any push/pop sequence, peek is the model minimum.
    #[test]
    fn prop_heap_yields_minimum(ops in heap_ops_strategy()) {
        let mut heap = PriorityHeap::new();
        let mut model: Vec<u32> = Vec::new();

        for op in ops {
            match op {
                Some(value) => {
                    heap.push(value);
                    model.push(value);
                }
                None => {
                    let expected = model.iter().copied().min();
                    if let Some(min) = expected {
                        let pos = model.iter().position(|&v| v == min).unwrap();
                        model.swap_remove(pos);
                    }
                    prop_assert_eq!(heap.pop(), expected);
                }
            }
            prop_assert!(heap.is_valid());
            prop_assert_eq!(heap.len(), model.len());
            prop_assert_eq!(heap.peek().copied(), model.iter().copied().min());
        }
    }

    /// Property: N distinct tokens give N leaves and N - 1 internal nodes,
    /// each internal frequency the sum of its children.
    #[test]
    fn prop_tree_shape(data in run_heavy_strategy()) {
        let catalog = RunCatalog::collect(&data).unwrap();
        match HuffmanTree::build(catalog.entries()) {
            None => prop_assert!(catalog.is_empty()),
            Some(tree) => {
                prop_assert_eq!(tree.leaf_count(), catalog.len());
                prop_assert_eq!(tree.internal_count(), catalog.len() - 1);
                let leaf_sum: u64 = tree.leaves().map(|(_, node)| node.frequency).sum();
                prop_assert_eq!(tree.total_frequency(), leaf_sum);

                for id in 0..tree.len() {
                    if let NodeKind::Internal { left, right } = tree.node(id).kind {
                        prop_assert_eq!(
                            tree.node(id).frequency,
                            tree.node(left).frequency + tree.node(right).frequency
                        );
                    }
                }
            }
        }
    }

    /// Property: no assigned codeword is a prefix of another.
    #[test]
    fn prop_codewords_prefix_free(data in arbitrary_bytes_strategy()) {
        let catalog = RunCatalog::collect(&data).unwrap();
        let Some(mut tree) = HuffmanTree::build(catalog.entries()) else {
            return Ok(());
        };
        codeword::assign(&mut tree).unwrap();

        let codes: Vec<_> = tree
            .leaves()
            .filter_map(|(_, node)| node.codeword())
            .collect();
        prop_assert_eq!(codes.len(), catalog.len());

        for (i, a) in codes.iter().enumerate() {
            prop_assert!(a.len >= 1);
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    prop_assert!(!a.is_prefix_of(b), "{} is a prefix of {}", a, b);
                }
            }
        }
    }

    /// Property: the plain run-length codec round trips.
    #[test]
    fn prop_rle_roundtrip(data in run_heavy_strategy()) {
        let codec = RleCodec::new();
        let compressed = codec.compress(&data).unwrap();
        prop_assert_eq!(compressed.len() % 5, 0);
        prop_assert_eq!(codec.decompress(&compressed).unwrap(), data);
    }
}
