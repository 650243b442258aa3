//! Utilities for displaying a progress monitor to track compression/decompression
//!
//! The bar is drawn by `tracing-indicatif` on the span the monitor owns, see <https://docs.rs/tracing-indicatif>

use std::io::Read;
use std::time::Instant;

use indicatif::{HumanBytes, HumanDuration, ProgressStyle};
use tracing::{info, info_span, Span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

/// A generic wrapper around a reader that keeps track of how many bytes have been read
/// from the total.
pub struct ProgressMonitor<R: Read> {
    /// The total amount that the reader will read
    pub total: u64,
    /// Amount read so far
    pub read: u64,
    /// The internal reader
    reader: R,
    span: Span,
    started: Instant,
}

impl<R: Read> ProgressMonitor<R> {
    /// Create a new progress monitor, initialized with zero bytes read
    pub fn new(reader: R, total: u64, action: &'static str) -> Self {
        // https://docs.rs/indicatif/latest/indicatif/index.html#templates
        let style = ProgressStyle::with_template(
            "{span_name} {wide_bar} {binary_bytes}/{binary_total_bytes}  \n[est. {eta} remaining]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        let span = info_span!("progress", action);
        span.pb_set_style(&style);
        span.pb_set_length(total);
        span.pb_start();
        Self {
            total,
            read: 0,
            reader,
            span,
            started: Instant::now(),
        }
    }

    /// This function is called whenever a new read is made, and is responsible for updating the UI
    fn update(&mut self, delta: u64) {
        self.span.pb_inc(delta);
        if delta > 0 && self.total == self.read {
            let elapsed = self.started.elapsed();
            let per_second = self.total as f64 / elapsed.as_secs_f64().max(1e-3);
            info!(
                "processed {} in {} ({}/s avg)",
                HumanBytes(self.total),
                HumanDuration(elapsed),
                HumanBytes(per_second as u64)
            );
        }
    }
}

impl<R: Read> Read for ProgressMonitor<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        // Fall back on the internally stored reader, but filch the number of bytes read
        // along the way
        let out = self.reader.read(buf)?;
        self.read += out as u64;
        self.update(out as u64);
        Ok(out)
    }
}
