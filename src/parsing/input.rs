//! Opening inputs as buffered text streams.
//!
//! Supported inputs:
//! - `-` (standard input)
//! - any path ending in `.gz` or `.bgz` (gzip, multi-member aware so bgzip works)
//! - any other path (read as-is)

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

/// Path that selects standard input
pub const STDIN: &str = "-";

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
#[must_use]
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Open a path for line-oriented reading, decompressing gzip by suffix.
///
/// The returned reader owns the file handle; dropping it closes the file.
///
/// # Errors
///
/// Returns the underlying `io::Error` if the file cannot be opened.
pub fn open_input(path: &Path) -> io::Result<Box<dyn BufRead>> {
    if path.as_os_str() == STDIN {
        debug!("Reading from stdin");
        return Ok(Box::new(BufReader::new(io::stdin())));
    }

    let file = File::open(path)?;
    if is_gzipped(path) {
        debug!(path = %path.display(), "Opening gzip input");
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        debug!(path = %path.display(), "Opening plain input");
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Strip a trailing `\n` or `\r\n` from a line read with `read_line`.
pub(crate) fn trim_line_end(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}
