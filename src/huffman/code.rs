use core::fmt;

/// The longest code a tree over a 256 symbol alphabet can produce.
pub const MAX_CODE_BITS: usize = crate::ALPHABET_SIZE;

const MAX_CODE_BYTES: usize = MAX_CODE_BITS / 8;

/// A path from the root of a huffman tree to one of its leaves.
///
/// `false` (0) means "go left", `true` (1) means "go right". Bits are stored least significant
/// bit first, the same order the bit writer puts them into the output.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Code {
    top: usize,
    bytes: [u8; MAX_CODE_BYTES],
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum CodeError {
    #[error("Code is already {MAX_CODE_BITS} bits long, can't push another bit")]
    Full,
    #[error("Can't pop a bit from an empty code")]
    Empty,
}

impl Default for Code {
    fn default() -> Self {
        Self::new()
    }
}

impl Code {
    pub const fn new() -> Self {
        Code {
            top: 0,
            bytes: [0; MAX_CODE_BYTES],
        }
    }

    /// Number of bits in the code
    pub fn len(&self) -> usize {
        self.top
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    pub fn is_full(&self) -> bool {
        self.top == MAX_CODE_BITS
    }

    pub fn push_bit(&mut self, bit: bool) -> Result<(), CodeError> {
        if self.is_full() {
            return Err(CodeError::Full);
        }
        let mask = 1 << (self.top % 8);
        if bit {
            self.bytes[self.top / 8] |= mask;
        } else {
            self.bytes[self.top / 8] &= !mask;
        }
        self.top += 1;
        Ok(())
    }

    pub fn pop_bit(&mut self) -> Result<bool, CodeError> {
        if self.is_empty() {
            return Err(CodeError::Empty);
        }
        let bit = self.bit(self.top - 1);
        self.top -= 1;
        Ok(bit)
    }

    /// Get the bit at `idx`, counted from the root side of the path.
    ///
    /// # Panics
    /// If `idx >= self.len()`
    pub fn bit(&self, idx: usize) -> bool {
        assert!(idx < self.top, "bit {} out of range for code of length {}", idx, self.top);
        (self.bytes[idx / 8] >> (idx % 8)) & 1 == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.top).map(move |idx| self.bit(idx))
    }

    /// True if `self` is a (not necessarily proper) prefix of `other`
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len() <= other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code(")?;
        for bit in self.iter() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        write!(f, ")")
    }
}
