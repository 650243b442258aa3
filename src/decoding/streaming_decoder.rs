use super::container_decoder::ContainerDecoder;
use super::errors::DecodeError;
use crate::container::ContainerHeader;
use crate::io::{Error, Read};

/// High level decoder that implements a io::Read that can be used with
/// io::Read::read_to_end / io::Read::read_exact or passing this to another library / module as a source for the decoded content
///
/// Decode errors surface as `io::Error`s of kind `InvalidData` for malformed containers and `UnexpectedEof`
/// for truncated ones. The wrapped [DecodeError] is available through `Error::into_inner`.
/// After an error the decoder should not be read from again.
///
/// # Examples
/// ```
/// use std::io::Read;
/// let container = ruhuff::compress_to_vec(b"streaming", 0).unwrap();
/// let mut decoder = ruhuff::StreamingDecoder::new(&container[..]).unwrap();
/// let mut output = String::new();
/// decoder.read_to_string(&mut output).unwrap();
/// assert_eq!(output, "streaming");
/// ```
pub struct StreamingDecoder<READ: Read> {
    pub decoder: ContainerDecoder<READ>,
}

impl<READ: Read> StreamingDecoder<READ> {
    pub fn new(source: READ) -> Result<StreamingDecoder<READ>, DecodeError> {
        Ok(StreamingDecoder {
            decoder: ContainerDecoder::new(source)?,
        })
    }

    pub fn header(&self) -> &ContainerHeader {
        self.decoder.header()
    }

    pub fn inner(self) -> ContainerDecoder<READ> {
        self.decoder
    }
}

impl<READ: Read> Read for StreamingDecoder<READ> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        let mut written = 0;
        while written < buf.len() {
            match self.decoder.next_symbol()? {
                Some(symbol) => {
                    buf[written] = symbol;
                    written += 1;
                }
                //No more bytes can ever be decoded
                None => break,
            }
        }
        Ok(written)
    }
}
