//! Byte counts of a compression or decompression run, for reporting

/// Sizes of one compression run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionStats {
    pub original_size: u64,
    /// Size of the whole container, header and tree dump included
    pub compressed_size: u64,
}

/// Sizes of one decompression run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressionStats {
    /// Bytes of the container that were read, header and tree dump included
    pub compressed_size: u64,
    pub decompressed_size: u64,
}

impl CompressionStats {
    /// Percentage of the original size that compression saved. Negative if the container grew.
    pub fn space_saving(&self) -> f64 {
        space_saving(self.original_size, self.compressed_size)
    }
}

impl DecompressionStats {
    /// Percentage of the decompressed size the container saved. Negative if the container is larger.
    pub fn space_saving(&self) -> f64 {
        space_saving(self.decompressed_size, self.compressed_size)
    }
}

fn space_saving(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    100.0 * (1.0 - compressed_size as f64 / original_size as f64)
}
