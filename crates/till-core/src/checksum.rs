//! SHA-256 checksum utility for migration drift detection.

use sha2::{Digest, Sha256};

/// Hex SHA-256 of migration text.
///
/// CRLF line endings hash the same as LF and a leading byte order mark is
/// ignored, so a Windows checkout of an applied file is not reported as
/// modified.
pub fn compute_checksum(text: &str) -> String {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let digest = if text.contains("\r\n") {
        Sha256::digest(text.replace("\r\n", "\n").as_bytes())
    } else {
        Sha256::digest(text.as_bytes())
    };
    format!("{digest:x}")
}

#[cfg(test)]
#[path = "checksum_test.rs"]
mod tests;
