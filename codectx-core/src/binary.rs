//! Binary file detection by sampling a file's leading bytes.

use std::io;
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

/// Number of leading bytes inspected.
pub const BINARY_SAMPLE_LEN: usize = 8000;

/// Share of suspicious control bytes above which a sample counts as binary.
const SUSPICIOUS_RATIO: f64 = 0.3;

/// Classifies a byte sample.
///
/// Any NUL byte means binary. Otherwise control bytes outside BEL..=SO
/// (which covers tab, line feed, vertical tab, form feed and carriage return)
/// are counted, and more than 30% of them means binary. An empty sample is
/// text.
pub fn is_binary_bytes(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    let mut suspicious = 0usize;
    for &byte in sample {
        if byte == 0 {
            return true;
        }
        if byte < 7 || (byte > 14 && byte < 32) {
            suspicious += 1;
        }
    }
    suspicious as f64 / sample.len() as f64 > SUSPICIOUS_RATIO
}

/// Reads up to [`BINARY_SAMPLE_LEN`] bytes from the start of `path` and
/// classifies them. Open and read errors are returned to the caller.
pub async fn is_binary<P: AsRef<Path>>(path: P) -> io::Result<bool> {
    let file = File::open(path.as_ref()).await?;
    let mut sample = Vec::with_capacity(BINARY_SAMPLE_LEN);
    file.take(BINARY_SAMPLE_LEN as u64)
        .read_to_end(&mut sample)
        .await?;
    Ok(is_binary_bytes(&sample))
}
