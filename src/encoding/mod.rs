//! Structures and utilities used for compressing data into the container format.
pub(crate) mod bit_writer;
mod container_encoder;

pub use bit_writer::BitWriter;
pub use container_encoder::*;
