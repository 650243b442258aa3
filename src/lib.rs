//! A lossless byte-stream compressor built on Huffman coding.
//!
//! Data is compressed into a self-describing container: a fixed 16 byte header,
//! a post-order dump of the code tree and the bit-packed codes of every input byte.
//!
//! # Examples
//! ```
//! let data = b"AAAAAAAAB";
//! let compressed = ruhuff::compress_to_vec(data, 0o644).unwrap();
//! let decompressed = ruhuff::decompress_to_vec(&compressed).unwrap();
//! assert_eq!(&decompressed[..], &data[..]);
//! ```
#![deny(trivial_casts, trivial_numeric_casts, rust_2018_idioms)]

/// Size in bytes of the blocks the bit reader, the bit writer and the histogram pass
/// move between the buffers and the underlying io.
pub const BLOCK_SIZE: usize = 4096;

/// Number of distinct symbols, one per possible byte value.
pub const ALPHABET_SIZE: usize = 256;

pub mod container;
pub mod decoding;
pub mod encoding;
pub mod histogram;
pub mod huffman;
pub mod io;
pub mod stats;

pub use container::{read_container_header, ContainerHeader, MAGIC_NUM};
pub use decoding::{decode, decompress_to_vec, CorruptionKind, DecodeError, StreamingDecoder};
pub use encoding::{compress_to_vec, encode, EncodeError};
pub use histogram::{Histogram, HistogramError};
pub use stats::{CompressionStats, DecompressionStats};
