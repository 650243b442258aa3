//! Errors that can occur while decoding a container
use crate::container::ReadHeaderError;
use crate::huffman::RebuildTreeError;
use crate::io::{Error, ErrorKind};

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error(transparent)]
    ReadHeaderError(#[from] ReadHeaderError),
    #[error("Header announces a tree dump of {expected} bytes but only {got} bytes are left in the container")]
    TreeDumpTooShort { expected: usize, got: usize },
    #[error(transparent)]
    RebuildTreeError(#[from] RebuildTreeError),
    #[error("Header announces {original_file_size} bytes of content but the container holds no tree to decode them with")]
    MissingTree { original_file_size: u64 },
    #[error("Payload ended after {decoded} of {expected} symbols")]
    UnexpectedEndOfPayload { decoded: u64, expected: u64 },
    #[error("Payload walked into a missing branch of the tree while decoding symbol {decoded}")]
    AbsentChild { decoded: u64 },
    #[error("Error while reading the container: {0}")]
    ReadError(#[source] Error),
    #[error("Error while writing the decoded data: {0}")]
    WriteError(#[source] Error),
}

/// Coarse classification of a [DecodeError]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorruptionKind {
    /// The container is not in the expected format: wrong magic number, malformed tree dump,
    /// or a header that contradicts itself
    Format,
    /// The container ended early or its payload does not contain enough valid codes
    Truncated,
    /// The source or the sink failed
    Io,
}

impl DecodeError {
    pub fn kind(&self) -> CorruptionKind {
        match self {
            DecodeError::ReadHeaderError(e) => match e {
                ReadHeaderError::BadMagicNumber(_) => CorruptionKind::Format,
                e if e.is_truncated() => CorruptionKind::Truncated,
                _ => CorruptionKind::Io,
            },
            DecodeError::RebuildTreeError(_) | DecodeError::MissingTree { .. } => {
                CorruptionKind::Format
            }
            DecodeError::TreeDumpTooShort { .. }
            | DecodeError::UnexpectedEndOfPayload { .. }
            | DecodeError::AbsentChild { .. } => CorruptionKind::Truncated,
            DecodeError::ReadError(_) | DecodeError::WriteError(_) => CorruptionKind::Io,
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        let kind = match e.kind() {
            CorruptionKind::Format => ErrorKind::InvalidData,
            CorruptionKind::Truncated => ErrorKind::UnexpectedEof,
            CorruptionKind::Io => match &e {
                DecodeError::ReadError(inner) | DecodeError::WriteError(inner) => inner.kind(),
                _ => ErrorKind::Other,
            },
        };
        Error::new(kind, e)
    }
}
