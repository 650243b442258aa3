//! Re-exports of the std io items the codec is written against, plus the blocking
//! fill helper shared by the bit reader, the decoder and the histogram pass.
pub use std::io::{Error, ErrorKind, Read, Write};

/// Read into `buf` until it is full or the source reports the end of the stream.
///
/// Returns how many bytes were read. Anything short of `buf.len()` means the source is exhausted.
pub fn read_fill(source: &mut impl Read, buf: &mut [u8]) -> Result<usize, Error> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::read_fill;
    use std::io::Read;

    /// Hands out at most `chunk` bytes per call, like a pipe would.
    struct Trickle<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn fills_across_short_reads() {
        let mut source = Trickle {
            data: &[1, 2, 3, 4, 5, 6, 7],
            chunk: 2,
        };
        let mut buf = [0u8; 5];
        assert_eq!(read_fill(&mut source, &mut buf).unwrap(), 5);
        assert_eq!(buf, [1, 2, 3, 4, 5]);
        assert_eq!(read_fill(&mut source, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[6, 7]);
        assert_eq!(read_fill(&mut source, &mut buf).unwrap(), 0);
    }
}
