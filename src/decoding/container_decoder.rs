//! Reading a container back: header, tree dump and the payload walk

use super::bit_reader::BitReader;
use super::errors::DecodeError;
use crate::container::{read_container_header, ContainerHeader, HEADER_SIZE};
use crate::huffman::{delete_tree, rebuild_tree, Node};
use crate::io::{read_fill, Read, Write};
use crate::stats::DecompressionStats;
use crate::BLOCK_SIZE;

/// Decodes the symbols of one container, one at a time.
///
/// The header and the tree dump are read on construction, the payload is read lazily
/// as symbols are requested.
pub struct ContainerDecoder<R: Read> {
    header: ContainerHeader,
    tree: Option<Box<Node>>,
    bits: BitReader<R>,
    decoded: u64,
}

impl<R: Read> ContainerDecoder<R> {
    /// Read the header and the tree dump from `source`.
    ///
    /// Fails with a format error before reading anything past the header if the magic number is wrong.
    pub fn new(mut source: R) -> Result<Self, DecodeError> {
        let header = read_container_header(&mut source)?;

        let mut dump = vec![0u8; usize::from(header.tree_size)];
        let got = read_fill(&mut source, &mut dump).map_err(DecodeError::ReadError)?;
        if got != dump.len() {
            return Err(DecodeError::TreeDumpTooShort {
                expected: dump.len(),
                got,
            });
        }

        let tree = rebuild_tree(&dump)?;
        if tree.is_none() && header.original_file_size > 0 {
            return Err(DecodeError::MissingTree {
                original_file_size: header.original_file_size,
            });
        }

        Ok(ContainerDecoder {
            header,
            tree,
            bits: BitReader::new(source),
            decoded: 0,
        })
    }

    pub fn header(&self) -> &ContainerHeader {
        &self.header
    }

    /// Symbols decoded so far
    pub fn decoded(&self) -> u64 {
        self.decoded
    }

    /// Symbols left until the announced size is reached
    pub fn remaining(&self) -> u64 {
        self.header.original_file_size - self.decoded
    }

    pub fn is_finished(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes of the container read so far
    pub fn bytes_read(&self) -> u64 {
        (HEADER_SIZE + usize::from(self.header.tree_size)) as u64 + self.bits.bytes_consumed()
    }

    /// Walk the tree from the root, one payload bit per step, until a leaf is reached.
    ///
    /// Returns `None` once all announced symbols have been decoded. Trailing payload bits are never read.
    pub fn next_symbol(&mut self) -> Result<Option<u8>, DecodeError> {
        if self.is_finished() {
            return Ok(None);
        }
        let root = match self.tree.as_deref() {
            Some(root) => root,
            None => {
                return Err(DecodeError::MissingTree {
                    original_file_size: self.header.original_file_size,
                })
            }
        };

        let mut node = root;
        loop {
            let bit = match self.bits.read_bit().map_err(DecodeError::ReadError)? {
                Some(bit) => bit,
                None => {
                    return Err(DecodeError::UnexpectedEndOfPayload {
                        decoded: self.decoded,
                        expected: self.header.original_file_size,
                    })
                }
            };

            // A tree that is a single leaf behaves like the left child of a virtual root
            let next = if root.is_leaf() {
                if bit {
                    None
                } else {
                    Some(root)
                }
            } else {
                node.child(bit)
            };
            node = next.ok_or(DecodeError::AbsentChild {
                decoded: self.decoded,
            })?;

            if node.is_leaf() {
                self.decoded += 1;
                return Ok(Some(node.symbol));
            }
        }
    }

    /// Returns the source, dropping the tree
    pub fn into_inner(mut self) -> R {
        delete_tree(&mut self.tree);
        self.bits.into_inner()
    }
}

/// Decode the container `source` yields and write the original bytes to `sink`.
///
/// Output is written in blocks while decoding. If an error is returned the sink may already hold
/// part of the output, which must not be treated as valid.
///
/// # Examples
/// ```
/// let container = ruhuff::compress_to_vec(b"ZZZZ", 0).unwrap();
/// let mut output: Vec<u8> = Vec::new();
/// let stats = ruhuff::decode(&container[..], &mut output).unwrap();
/// assert_eq!(output, b"ZZZZ");
/// assert_eq!(stats.decompressed_size, 4);
/// ```
pub fn decode<R: Read, W: Write>(source: R, mut sink: W) -> Result<DecompressionStats, DecodeError> {
    let mut decoder = ContainerDecoder::new(source)?;

    let mut output = Vec::with_capacity(BLOCK_SIZE);
    while let Some(symbol) = decoder.next_symbol()? {
        output.push(symbol);
        if output.len() == BLOCK_SIZE {
            sink.write_all(&output).map_err(DecodeError::WriteError)?;
            output.clear();
        }
    }
    sink.write_all(&output).map_err(DecodeError::WriteError)?;
    sink.flush().map_err(DecodeError::WriteError)?;

    let stats = DecompressionStats {
        compressed_size: decoder.bytes_read(),
        decompressed_size: decoder.decoded(),
    };
    tracing::debug!(
        compressed_size = stats.compressed_size,
        decompressed_size = stats.decompressed_size,
        "decoded container"
    );
    Ok(stats)
}

/// Decode a container held in memory
pub fn decompress_to_vec(container: &[u8]) -> Result<Vec<u8>, DecodeError> {
    let mut output = Vec::new();
    decode(container, &mut output)?;
    Ok(output)
}
