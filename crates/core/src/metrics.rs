//! Compression size reporting.
//!
//! Figures here are informational only; nothing in the codec reads them.
//! The tree snapshot is counted as part of the compressed size because it
//! has to travel with the payload.
//!
//! - percentage = `100 - ((compressed + tree) / original * 100)`
//! - ratio      = `original / (compressed + tree)`

use std::time::{Duration, Instant};

/// Sizes (in bytes) of one compression run.
#[derive(Debug, Clone)]
pub struct CompressionReport {
    /// Input size
    pub original_size: u64,

    /// Packed payload size (padding header included)
    pub compressed_size: u64,

    /// Persisted tree size
    pub tree_size: u64,

    /// Distinct symbols in the input
    pub distinct_symbols: usize,

    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,
}

impl CompressionReport {
    /// Start a report for an input of `original_size` bytes.
    pub fn new(original_size: u64) -> Self {
        Self {
            original_size,
            compressed_size: 0,
            tree_size: 0,
            distinct_symbols: 0,
            start_time: Instant::now(),
            end_time: None,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Payload plus tree.
    pub fn stored_size(&self) -> u64 {
        self.compressed_size + self.tree_size
    }

    /// Space saved, in percent of the original. Negative when the output
    /// is larger than the input. Returns 0.0 for empty input.
    pub fn percentage(&self) -> f64 {
        if self.original_size == 0 {
            0.0
        } else {
            100.0 - (self.stored_size() as f64 / self.original_size as f64 * 100.0)
        }
    }

    /// Original size over stored size. Returns 0.0 when nothing was stored.
    pub fn ratio(&self) -> f64 {
        if self.stored_size() == 0 {
            0.0
        } else {
            self.original_size as f64 / self.stored_size() as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Compression Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!("Original:   {} bytes", self.original_size);
        println!("Compressed: {} bytes", self.compressed_size);
        println!("Tree:       {} bytes", self.tree_size);
        println!("Distinct symbols: {}", self.distinct_symbols);
        println!("Compression Percentage: {:.3}%", self.percentage());
        println!("Compression Ratio: {:.3} : 1", self.ratio());
        println!();
    }

    /// Export the report as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             original_bytes={}\n\
             compressed_bytes={}\n\
             tree_bytes={}\n\
             distinct_symbols={}\n\
             percentage={:.4}\n\
             ratio={:.4}\n",
            self.duration().as_millis(),
            self.original_size,
            self.compressed_size,
            self.tree_size,
            self.distinct_symbols,
            self.percentage(),
            self.ratio(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(original: u64, compressed: u64, tree: u64) -> CompressionReport {
        let mut report = CompressionReport::new(original);
        report.compressed_size = compressed;
        report.tree_size = tree;
        report
    }

    #[test]
    fn test_percentage_and_ratio() {
        let r = report(1000, 400, 100);
        assert_eq!(r.stored_size(), 500);
        assert_eq!(r.percentage(), 50.0);
        assert_eq!(r.ratio(), 2.0);
    }

    #[test]
    fn test_expansion_is_negative_percentage() {
        let r = report(10, 15, 5);
        assert_eq!(r.percentage(), -100.0);
        assert_eq!(r.ratio(), 0.5);
    }

    #[test]
    fn test_empty_input() {
        let r = report(0, 0, 0);
        assert_eq!(r.percentage(), 0.0);
        assert_eq!(r.ratio(), 0.0);
    }

    #[test]
    fn test_completion() {
        let mut r = report(1, 1, 1);
        assert!(r.end_time.is_none());
        r.complete();
        assert!(r.end_time.is_some());
        assert!(r.duration().as_millis() < 1000);
    }

    #[test]
    fn test_export_text() {
        let mut r = report(1000, 400, 100);
        r.distinct_symbols = 12;
        let text = r.export_text();
        assert!(text.contains("original_bytes=1000"));
        assert!(text.contains("tree_bytes=100"));
        assert!(text.contains("distinct_symbols=12"));
        assert!(text.contains("ratio=2.0000"));
    }
}
