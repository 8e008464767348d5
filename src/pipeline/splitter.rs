//! Balanced, lossless partitioning of oversized text.

/// An ordered partition of a text into contiguous parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionPlan {
    pub parts: Vec<String>,
}

impl PartitionPlan {
    pub fn new(text: &str, part_count: usize) -> Self {
        Self {
            parts: split(text, part_count),
        }
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

/// Split `text` into exactly `part_count` contiguous parts.
///
/// Lengths are counted in characters and differ by at most one: the first
/// `len % part_count` parts get the extra character. Concatenating the parts
/// in order yields `text`. A `part_count` of 0 is treated as 1.
pub fn split(text: &str, part_count: usize) -> Vec<String> {
    let part_count = part_count.max(1);
    if part_count == 1 {
        return vec![text.to_string()];
    }

    let total_chars = text.chars().count();
    let base = total_chars / part_count;
    let remainder = total_chars % part_count;

    let mut parts = Vec::with_capacity(part_count);
    // Byte offset of every char start, then the end of the text
    let mut offsets = text
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(text.len()));
    let mut start = offsets.next().unwrap_or(0);

    for i in 0..part_count {
        let len = base + usize::from(i < remainder);
        let end = if len == 0 {
            start
        } else {
            offsets.nth(len - 1).unwrap_or(text.len())
        };
        parts.push(text[start..end].to_string());
        start = end;
    }

    parts
}
