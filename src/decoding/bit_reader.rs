use crate::io::{read_fill, Error, Read};
use crate::BLOCK_SIZE;

/// Reads single bits from a source, refilling a block sized buffer whenever it runs dry.
///
/// Bits are handed out least significant bit first within each byte.
pub struct BitReader<R: Read> {
    buffer: Vec<u8>,
    /// Number of valid bytes in `buffer`
    filled: usize,
    idx: usize, //index counts bits already read from the buffer
    bytes_consumed: u64,
    source: R,
}

impl<R: Read> BitReader<R> {
    pub fn new(source: R) -> BitReader<R> {
        Self::with_block_size(source, BLOCK_SIZE)
    }

    /// # Panics
    /// If `block_size` is zero
    pub fn with_block_size(source: R, block_size: usize) -> BitReader<R> {
        assert!(block_size > 0, "block size must not be zero");
        BitReader {
            buffer: vec![0; block_size],
            filled: 0,
            idx: 0,
            bytes_consumed: 0,
            source,
        }
    }

    fn bits_left_in_buffer(&self) -> usize {
        self.filled * 8 - self.idx
    }

    /// Read the next bit. Returns `None` once the source is exhausted.
    pub fn read_bit(&mut self) -> Result<Option<bool>, Error> {
        if self.bits_left_in_buffer() == 0 {
            self.filled = read_fill(&mut self.source, &mut self.buffer)?;
            self.idx = 0;
            self.bytes_consumed += self.filled as u64;
            if self.filled == 0 {
                return Ok(None);
            }
        }

        let bit = (self.buffer[self.idx / 8] >> (self.idx % 8)) & 1 == 1;
        self.idx += 1;
        Ok(Some(bit))
    }

    /// Bytes pulled from the source so far, including ones still buffered
    pub fn bytes_consumed(&self) -> u64 {
        self.bytes_consumed
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    /// Returns the source. Bytes that were already buffered are lost.
    pub fn into_inner(self) -> R {
        self.source
    }
}
