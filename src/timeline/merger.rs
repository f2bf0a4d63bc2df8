//! Sentence merger: collapses a multi-word line into a single timed unit.
//!
//! The transform is lossy. Callers that want to toggle back keep the
//! unmerged timeline around (the cache does this by recomputing from raw data).

use crate::lyric_model::{LyricLine, WordTiming};

/// Merge every line with two or more words into one line-spanning word
pub fn merge(lines: &[LyricLine]) -> Vec<LyricLine> {
    lines.iter().map(merge_line).collect()
}

/// Merge a single line; lines with at most one word are returned unchanged
pub fn merge_line(line: &LyricLine) -> LyricLine {
    let (Some(first), Some(last)) = (line.words.first(), line.words.last()) else {
        return line.clone();
    };
    if line.words.len() < 2 {
        return line.clone();
    }

    let start_ms = first.start_ms;
    let end_ms = last.end_ms;

    LyricLine {
        text: line.text.clone(),
        words: vec![WordTiming::new(line.text.clone(), start_ms, end_ms)],
        start_ms,
        end_ms,
    }
}
