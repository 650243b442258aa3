//! Writing a complete container: header, tree dump and payload

use core::convert::TryFrom;

use super::bit_writer::BitWriter;
use crate::container::{ContainerHeader, HEADER_SIZE};
use crate::histogram::Histogram;
use crate::huffman::{build_codes, build_tree, delete_tree, serialize_tree, BuildTreeError, CodeError};
use crate::io::{read_fill, Error, Read, Write};
use crate::stats::CompressionStats;
use crate::BLOCK_SIZE;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum EncodeError {
    #[error(transparent)]
    BuildTreeError(#[from] BuildTreeError),
    #[error(transparent)]
    CodeError(#[from] CodeError),
    #[error("Source contains the symbol 0x{symbol:02X} which the histogram never counted")]
    UnknownSymbol { symbol: u8 },
    #[error("Histogram counted {expected} bytes but the source yielded {got} bytes")]
    SourceMismatch { expected: u64, got: u64 },
    #[error("Tree dump of {size} bytes does not fit into the header")]
    TreeTooLarge { size: usize },
    #[error("Error while reading the source: {0}")]
    ReadError(#[source] Error),
    #[error("Error while writing the container: {0}")]
    WriteError(#[source] Error),
}

/// Compress everything `source` yields into a container written to `sink`.
///
/// `histogram` must have been computed over exactly the bytes `source` yields: every byte needs
/// a code, and the header announces `histogram.total()` bytes. `permissions` is stored in the header as is.
///
/// # Examples
/// ```
/// use ruhuff::{encode, Histogram};
/// let data: &[u8] = b"abracadabra";
/// let histogram = Histogram::from_bytes(data);
/// let mut container: Vec<u8> = Vec::new();
/// let stats = encode(data, &histogram, 0o600, &mut container).unwrap();
/// assert_eq!(stats.original_size, 11);
/// assert_eq!(stats.compressed_size, container.len() as u64);
/// ```
pub fn encode<R: Read, W: Write>(
    mut source: R,
    histogram: &Histogram,
    permissions: u16,
    mut sink: W,
) -> Result<CompressionStats, EncodeError> {
    let mut tree = build_tree(histogram)?;
    let table = build_codes(tree.as_deref())?;
    let dump = serialize_tree(tree.as_deref());
    delete_tree(&mut tree);

    let tree_size =
        u16::try_from(dump.len()).map_err(|_| EncodeError::TreeTooLarge { size: dump.len() })?;
    let header = ContainerHeader {
        permissions,
        tree_size,
        original_file_size: histogram.total(),
    };
    tracing::debug!(
        distinct_symbols = table.len(),
        tree_size,
        original_file_size = header.original_file_size,
        "writing container"
    );

    header
        .write_to(&mut sink)
        .map_err(EncodeError::WriteError)?;
    sink.write_all(&dump).map_err(EncodeError::WriteError)?;

    let expected = header.original_file_size;
    let mut consumed: u64 = 0;
    let mut writer = BitWriter::new(&mut sink);
    let mut buf = vec![0u8; BLOCK_SIZE];
    loop {
        let read = read_fill(&mut source, &mut buf).map_err(EncodeError::ReadError)?;
        if read == 0 {
            break;
        }
        for symbol in &buf[..read] {
            consumed += 1;
            // keep counting past the announced size so the error can report the real length
            if consumed > expected {
                continue;
            }
            let code = table
                .get(*symbol)
                .ok_or(EncodeError::UnknownSymbol { symbol: *symbol })?;
            writer.write_code(code).map_err(EncodeError::WriteError)?;
        }
    }

    if consumed != expected {
        return Err(EncodeError::SourceMismatch {
            expected,
            got: consumed,
        });
    }

    writer.flush().map_err(EncodeError::WriteError)?;
    let payload_size = writer.bytes_written();

    Ok(CompressionStats {
        original_size: expected,
        compressed_size: (HEADER_SIZE + dump.len()) as u64 + payload_size,
    })
}

/// Compress `data` into a freshly allocated container
pub fn compress_to_vec(data: &[u8], permissions: u16) -> Result<Vec<u8>, EncodeError> {
    let histogram = Histogram::from_bytes(data);
    let mut container = Vec::new();
    encode(data, &histogram, permissions, &mut container)?;
    Ok(container)
}

#[cfg(test)]
mod tests {
    use super::{compress_to_vec, encode, EncodeError};
    use crate::container::{read_container_header, HEADER_SIZE};
    use crate::histogram::Histogram;
    use crate::huffman::{INTERIOR_TAG, LEAF_TAG};

    #[test]
    fn two_symbol_layout() {
        let container = compress_to_vec(b"AAAAAAAAB", 0o640).unwrap();
        let header = read_container_header(&container[..]).unwrap();
        assert_eq!(header.permissions, 0o640);
        assert_eq!(header.tree_size, 5);
        assert_eq!(header.original_file_size, 9);

        let dump = &container[HEADER_SIZE..HEADER_SIZE + 5];
        // B is rarer and extracted first, so it becomes the left child
        assert_eq!(dump, &[LEAF_TAG, b'B', LEAF_TAG, b'A', INTERIOR_TAG]);

        // A = 1, B = 0: eight ones and a zero, the zero landing in bit 0 of the second byte
        let payload = &container[HEADER_SIZE + 5..];
        assert_eq!(payload, &[0xFF, 0x00]);
    }

    #[test]
    fn single_symbol_layout() {
        let container = compress_to_vec(b"ZZZZ", 0).unwrap();
        assert_eq!(container.len(), HEADER_SIZE + 2 + 1);
        assert_eq!(&container[HEADER_SIZE..HEADER_SIZE + 2], &[LEAF_TAG, b'Z']);
        assert_eq!(container[HEADER_SIZE + 2], 0);
    }

    #[test]
    fn empty_input_is_only_a_header() {
        let container = compress_to_vec(&[], 0).unwrap();
        assert_eq!(container.len(), HEADER_SIZE);
        let header = read_container_header(&container[..]).unwrap();
        assert_eq!(header.tree_size, 0);
        assert_eq!(header.original_file_size, 0);
    }

    #[test]
    fn stats_match_output() {
        let data = b"mississippi river";
        let mut container: Vec<u8> = Vec::new();
        let stats = encode(&data[..], &Histogram::from_bytes(data), 0, &mut container).unwrap();
        assert_eq!(stats.original_size, data.len() as u64);
        assert_eq!(stats.compressed_size, container.len() as u64);
    }

    #[test]
    fn histogram_must_match_source() {
        let histogram = Histogram::from_bytes(b"aab");
        match encode(&b"acb"[..], &histogram, 0, Vec::<u8>::new()) {
            Err(EncodeError::UnknownSymbol { symbol }) => assert_eq!(symbol, b'c'),
            other => panic!("expected UnknownSymbol, got {:?}", other),
        }
        match encode(&b"aabb"[..], &histogram, 0, Vec::<u8>::new()) {
            Err(EncodeError::SourceMismatch { expected, got }) => {
                assert_eq!(expected, 3);
                assert_eq!(got, 4);
            }
            other => panic!("expected SourceMismatch, got {:?}", other),
        }
        match encode(&b"ab"[..], &histogram, 0, Vec::<u8>::new()) {
            Err(EncodeError::SourceMismatch { expected, got }) => {
                assert_eq!(expected, 3);
                assert_eq!(got, 2);
            }
            other => panic!("expected SourceMismatch, got {:?}", other),
        }
    }
}
