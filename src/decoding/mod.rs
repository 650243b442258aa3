//! Structures and utilities used for decoding containers
pub(crate) mod bit_reader;
mod container_decoder;
pub mod errors;
pub mod streaming_decoder;

pub use bit_reader::BitReader;
pub use container_decoder::{decode, decompress_to_vec, ContainerDecoder};
pub use errors::{CorruptionKind, DecodeError};
pub use streaming_decoder::StreamingDecoder;
