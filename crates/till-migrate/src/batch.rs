//! Splitting migration text into independently executed batches.

/// Split `text` into batches on lines that consist solely of `separator`.
///
/// A leading byte order mark is dropped and line endings are normalized to
/// `\n` first. A separator line may carry
/// surrounding whitespace and matches case-insensitively; anything else on
/// the line (`GO;`, `GO -- done`) keeps it an ordinary SQL line. Separator
/// lines are dropped, every segment is trimmed, and empty segments are
/// discarded, so text with no separator yields one batch and blank text
/// yields none.
pub fn split_batches(text: &str, separator: &str) -> Vec<String> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut batches = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.split('\n') {
        if line.trim().eq_ignore_ascii_case(separator) {
            push_batch(&mut batches, &current);
            current.clear();
        } else {
            current.push(line);
        }
    }
    push_batch(&mut batches, &current);

    batches
}

fn push_batch(batches: &mut Vec<String>, lines: &[&str]) {
    let batch = lines.join("\n");
    let trimmed = batch.trim();
    if !trimmed.is_empty() {
        batches.push(trimmed.to_string());
    }
}

#[cfg(test)]
#[path = "batch_test.rs"]
mod tests;
