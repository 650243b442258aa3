use crate::huffman::Code;
use crate::io::{Error, Write};
use crate::BLOCK_SIZE;

/// An interface for writing an arbitrary number of codes into a sink, one bit at a time.
///
/// Bits are collected in a block sized buffer and handed to the sink whenever the block is full.
/// Within a byte the bits are filled from the *least significant position* upwards.
pub struct BitWriter<W: Write> {
    /// The buffer that's filled with bits
    output: Vec<u8>,
    /// The index pointing to the next unoccupied bit. Effectively just
    /// the number of bits that have been written into the buffer since the last flush.
    bit_idx: usize,
    /// Bytes handed to the sink so far
    bytes_written: u64,
    sink: W,
}

impl<W: Write> BitWriter<W> {
    /// Initialize a new writer with the default block size. Write codes with `write_code`,
    /// and finish the stream with `flush`
    pub fn new(sink: W) -> Self {
        Self::with_block_size(sink, BLOCK_SIZE)
    }

    /// # Panics
    /// If `block_size` is zero
    pub fn with_block_size(sink: W, block_size: usize) -> Self {
        assert!(block_size > 0, "block size must not be zero");
        Self {
            output: vec![0; block_size],
            bit_idx: 0,
            bytes_written: 0,
            sink,
        }
    }

    fn block_bits(&self) -> usize {
        self.output.len() * 8
    }

    /// Append a single bit, handing the block to the sink if it filled up.
    ///
    /// Returns how many bytes were written to the sink.
    pub fn write_bit(&mut self, bit: bool) -> Result<u64, Error> {
        let mask = 1 << (self.bit_idx % 8);
        let byte = &mut self.output[self.bit_idx / 8];
        // set and clear explicitly, the buffer still holds bits of the previous block
        if bit {
            *byte |= mask;
        } else {
            *byte &= !mask;
        }
        self.bit_idx += 1;

        if self.bit_idx == self.block_bits() {
            self.sink.write_all(&self.output)?;
            self.bit_idx = 0;
            let flushed = self.output.len() as u64;
            self.bytes_written += flushed;
            tracing::trace!(bytes = flushed, "flushed full block");
            return Ok(flushed);
        }
        Ok(0)
    }

    /// Append every bit of `code`, starting at the root side of the path.
    ///
    /// Returns how many bytes were written to the sink during this call. Bits still sitting
    /// in the buffer are not counted until they are written by a later call or by `flush`.
    pub fn write_code(&mut self, code: &Code) -> Result<u64, Error> {
        let mut flushed = 0;
        for bit in code.iter() {
            flushed += self.write_bit(bit)?;
        }
        Ok(flushed)
    }

    /// How many bits are buffered and not yet written to the sink
    pub fn pending_bits(&self) -> usize {
        self.bit_idx
    }

    /// Write out everything still in the buffer.
    ///
    /// If the buffered bits do not end on a byte boundary the last byte is padded with zeros in its unused
    /// high bits. Flushing an empty buffer writes nothing. Afterwards the writer is empty and can start a new stream.
    ///
    /// Returns how many bytes were written.
    pub fn flush(&mut self) -> Result<u64, Error> {
        if self.bit_idx == 0 {
            return Ok(0);
        }

        let mut len = self.bit_idx / 8;
        let misaligned = self.bit_idx % 8;
        if misaligned != 0 {
            self.output[len] &= (1 << misaligned) - 1;
            len += 1;
        }

        self.sink.write_all(&self.output[..len])?;
        self.sink.flush()?;
        self.bit_idx = 0;
        self.bytes_written += len as u64;
        Ok(len as u64)
    }

    /// Bytes handed to the sink since the writer was created
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Returns the sink. Buffered bits that were not flushed are lost.
    pub fn into_inner(self) -> W {
        self.sink
    }
}
