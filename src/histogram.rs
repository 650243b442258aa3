//! Counting how often each byte value occurs in the input

use crate::huffman::tree_dump_size;
use crate::io::{read_fill, Error, Read};
use crate::{ALPHABET_SIZE, BLOCK_SIZE};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum HistogramError {
    #[error("Adding {count} occurrences of 0x{symbol:02X} to {total} counted bytes overflows the total")]
    TotalOverflow { symbol: u8, count: u64, total: u64 },
}

/// Occurrence count for every byte value
///
/// The sum of all counts always fits into a `u64`, since it is announced in the container header.
#[derive(Clone, PartialEq, Eq)]
pub struct Histogram {
    counts: [u64; ALPHABET_SIZE],
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    pub fn new() -> Self {
        Histogram {
            counts: [0; ALPHABET_SIZE],
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        let mut histogram = Self::new();
        histogram.add_bytes(data);
        histogram
    }

    /// Count every byte `source` yields until it is exhausted
    pub fn from_reader(mut source: impl Read) -> Result<Self, Error> {
        let mut histogram = Self::new();
        let mut buf = vec![0u8; BLOCK_SIZE];
        loop {
            let read = read_fill(&mut source, &mut buf)?;
            if read == 0 {
                break;
            }
            histogram.add_bytes(&buf[..read]);
        }
        Ok(histogram)
    }

    pub fn add_bytes(&mut self, data: &[u8]) {
        for byte in data {
            self.counts[usize::from(*byte)] += 1;
        }
    }

    /// Count `symbol` another `count` times. Fails and leaves the histogram untouched
    /// if the total would no longer fit into a `u64`.
    pub fn add(&mut self, symbol: u8, count: u64) -> Result<(), HistogramError> {
        let total = self.total();
        if total.checked_add(count).is_none() {
            return Err(HistogramError::TotalOverflow {
                symbol,
                count,
                total,
            });
        }
        self.counts[usize::from(symbol)] += count;
        Ok(())
    }

    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[usize::from(symbol)]
    }

    /// Sum of all counts, the amount of bytes that were counted
    pub fn total(&self) -> u64 {
        self.counts
            .iter()
            .fold(0u64, |total, count| total.saturating_add(*count))
    }

    /// How many byte values occurred at least once
    pub fn distinct_symbols(&self) -> usize {
        self.counts.iter().filter(|count| **count > 0).count()
    }

    /// All symbols that occurred at least once with their count, in ascending symbol order
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        (0..=u8::MAX)
            .map(move |symbol| (symbol, self.count(symbol)))
            .filter(|(_, count)| *count > 0)
    }

    /// Size of the tree dump the huffman tree for this histogram serializes to
    pub fn tree_size(&self) -> usize {
        tree_dump_size(self.distinct_symbols())
    }
}

impl core::fmt::Debug for Histogram {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter_nonzero()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Histogram, HistogramError};

    #[test]
    fn counts_bytes() {
        let histogram = Histogram::from_bytes(b"abracadabra");
        assert_eq!(histogram.count(b'a'), 5);
        assert_eq!(histogram.count(b'b'), 2);
        assert_eq!(histogram.count(b'r'), 2);
        assert_eq!(histogram.count(b'c'), 1);
        assert_eq!(histogram.count(b'd'), 1);
        assert_eq!(histogram.count(b'z'), 0);
        assert_eq!(histogram.total(), 11);
        assert_eq!(histogram.distinct_symbols(), 5);
        assert_eq!(histogram.tree_size(), 14);
        let symbols: Vec<u8> = histogram.iter_nonzero().map(|(symbol, _)| symbol).collect();
        assert_eq!(symbols, b"abcdr".to_vec());
    }

    #[test]
    fn reader_spanning_several_blocks() {
        let data: Vec<u8> = (0..crate::BLOCK_SIZE * 3 + 17).map(|idx| (idx % 7) as u8).collect();
        let from_reader = Histogram::from_reader(&data[..]).unwrap();
        assert_eq!(from_reader, Histogram::from_bytes(&data));
        assert_eq!(from_reader.total(), data.len() as u64);
    }

    #[test]
    fn total_never_overflows() {
        let mut histogram = Histogram::new();
        histogram.add(1, u64::MAX).unwrap();
        assert_eq!(
            histogram.add(2, u64::MAX),
            Err(HistogramError::TotalOverflow {
                symbol: 2,
                count: u64::MAX,
                total: u64::MAX
            })
        );
        assert!(histogram.add(3, 1).is_err());
        assert_eq!(histogram.count(2), 0);
        assert_eq!(histogram.count(3), 0);
        assert_eq!(histogram.total(), u64::MAX);

        // the announced size can't be met, but encoding reports that instead of panicking
        let result = crate::encoding::encode(&b"\x01"[..], &histogram, 0, std::io::sink());
        assert!(matches!(
            result,
            Err(crate::encoding::EncodeError::SourceMismatch {
                expected: u64::MAX,
                got: 1
            })
        ));
    }

    #[test]
    fn empty() {
        let histogram = Histogram::from_reader(&[0u8; 0][..]).unwrap();
        assert_eq!(histogram.total(), 0);
        assert_eq!(histogram.distinct_symbols(), 0);
        assert_eq!(histogram.tree_size(), 0);
    }
}
