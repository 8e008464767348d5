//! Prompt size classification.

/// Character limits that decide whether and how a prompt is split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    /// Prompts with at least this many characters take the long path.
    pub split_threshold_chars: usize,
    /// Divisor for the part count on the long path.
    pub chunk_size_chars: usize,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            split_threshold_chars: 75_000,
            chunk_size_chars: 74_000,
        }
    }
}

impl SizeLimits {
    /// `len / chunk_size + 1`, so no balanced part of a `len`-char text
    /// exceeds `chunk_size`. A zero chunk size is treated as 1.
    pub fn part_count(&self, len_chars: usize) -> usize {
        len_chars / self.chunk_size_chars.max(1) + 1
    }
}

/// Which route a prompt takes through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeClass {
    /// Fits in one completion call.
    ShortPath,
    /// Must be split into `part_count` parts and summarized first.
    LongPath { part_count: usize },
}

/// Classify a text by its length in characters.
///
/// The part count of a long text comes from [`SizeLimits::part_count`].
pub fn classify(len_chars: usize, limits: &SizeLimits) -> SizeClass {
    if len_chars < limits.split_threshold_chars {
        SizeClass::ShortPath
    } else {
        SizeClass::LongPath {
            part_count: limits.part_count(len_chars),
        }
    }
}
