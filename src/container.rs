//! The fixed size header every container starts with.
//!
//! ```text
//! offset  size  field
//!      0     4  magic_number        (little endian)
//!      4     2  permissions         (little endian)
//!      6     2  tree_size           (little endian)
//!      8     8  original_file_size  (little endian)
//! ```
//! The header is followed by `tree_size` bytes of tree dump and the bit packed payload.
use crate::io::{Error, ErrorKind, Read, Write};

pub const MAGIC_NUM: u32 = 0x121D_DBC0;
pub const HEADER_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    /// Mode bits of the original file. Not interpreted by the codec.
    pub permissions: u16,
    /// Length of the tree dump following the header
    pub tree_size: u16,
    /// Amount of bytes the payload decodes to
    pub original_file_size: u64,
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ReadHeaderError {
    #[error("Container is too short to hold a header: {0}")]
    HeaderReadError(#[source] Error),
    #[error("Read wrong magic number: 0x{0:X}")]
    BadMagicNumber(u32),
}

impl ContainerHeader {
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut raw = [0u8; HEADER_SIZE];
        raw[0..4].copy_from_slice(&MAGIC_NUM.to_le_bytes());
        raw[4..6].copy_from_slice(&self.permissions.to_le_bytes());
        raw[6..8].copy_from_slice(&self.tree_size.to_le_bytes());
        raw[8..16].copy_from_slice(&self.original_file_size.to_le_bytes());
        raw
    }

    /// Parse a header, checking the magic number
    pub fn from_bytes(raw: &[u8; HEADER_SIZE]) -> Result<Self, ReadHeaderError> {
        let magic_num = u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]);
        if magic_num != MAGIC_NUM {
            return Err(ReadHeaderError::BadMagicNumber(magic_num));
        }
        Ok(ContainerHeader {
            permissions: u16::from_le_bytes([raw[4], raw[5]]),
            tree_size: u16::from_le_bytes([raw[6], raw[7]]),
            original_file_size: u64::from_le_bytes([
                raw[8], raw[9], raw[10], raw[11], raw[12], raw[13], raw[14], raw[15],
            ]),
        })
    }

    /// Returns how many bytes were written
    pub fn write_to(&self, mut w: impl Write) -> Result<usize, Error> {
        w.write_all(&self.to_bytes())?;
        Ok(HEADER_SIZE)
    }
}

pub fn read_container_header(mut r: impl Read) -> Result<ContainerHeader, ReadHeaderError> {
    let mut raw = [0u8; HEADER_SIZE];
    r.read_exact(&mut raw)
        .map_err(ReadHeaderError::HeaderReadError)?;
    let header = ContainerHeader::from_bytes(&raw)?;
    tracing::debug!(
        permissions = header.permissions,
        tree_size = header.tree_size,
        original_file_size = header.original_file_size,
        "read container header"
    );
    Ok(header)
}

impl ReadHeaderError {
    /// True if the container ended before the header was complete
    pub fn is_truncated(&self) -> bool {
        match self {
            ReadHeaderError::HeaderReadError(e) => e.kind() == ErrorKind::UnexpectedEof,
            ReadHeaderError::BadMagicNumber(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{read_container_header, ContainerHeader, ReadHeaderError, HEADER_SIZE, MAGIC_NUM};

    #[test]
    fn layout_is_little_endian() {
        let header = ContainerHeader {
            permissions: 0o644,
            tree_size: 0x0102,
            original_file_size: 0x0807_0605_0403_0201,
        };
        let raw = header.to_bytes();
        assert_eq!(&raw[0..4], &[0xC0, 0xDB, 0x1D, 0x12]);
        assert_eq!(&raw[4..6], &[0xA4, 0x01]);
        assert_eq!(&raw[6..8], &[0x02, 0x01]);
        assert_eq!(&raw[8..16], &[1, 2, 3, 4, 5, 6, 7, 8]);

        let parsed = read_container_header(&raw[..]).unwrap();
        assert_eq!(parsed, header);
    }

    #[test]
    fn bad_magic() {
        let mut raw = ContainerHeader {
            permissions: 0,
            tree_size: 2,
            original_file_size: 4,
        }
        .to_bytes();
        raw[0] ^= 0xFF;
        match read_container_header(&raw[..]) {
            Err(ReadHeaderError::BadMagicNumber(magic)) => {
                assert_eq!(magic, MAGIC_NUM ^ 0xFF);
            }
            other => panic!("expected BadMagicNumber, got {:?}", other),
        }
    }

    #[test]
    fn short_header() {
        let raw = [0u8; HEADER_SIZE - 1];
        let err = read_container_header(&raw[..]).unwrap_err();
        assert!(err.is_truncated());
    }
}
