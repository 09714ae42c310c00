//! Line-delimited address file parsing.

use std::io;
use std::path::Path;

/// How blank lines are treated.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// Drop lines that are empty after trimming.
    pub skip_blank_lines: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            skip_blank_lines: true,
        }
    }
}

/// Split text into trimmed raw addresses, one per line, in input order.
pub fn parse_addresses(text: &str, options: ReadOptions) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !(options.skip_blank_lines && line.is_empty()))
        .map(str::to_string)
        .collect()
}

/// Read a line-delimited address file.
///
/// Fails with `InvalidData` when the file is not UTF-8 text.
pub async fn read_addresses(path: &Path, options: ReadOptions) -> io::Result<Vec<String>> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(parse_addresses(&text, options))
}
