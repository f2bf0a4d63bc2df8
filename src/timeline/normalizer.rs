/*!
 * Timing normalizer.
 *
 * Shifts every word by the global delay and guarantees two properties on the
 * result, within each line:
 * - every word lasts at least `MIN_WORD_DURATION_MS`
 * - every word starts at least `MIN_GAP_MS` after the previous word ends
 *
 * Words are processed in a single forward pass. A word's start only ever
 * moves later (never earlier than its shifted source start) and its end is
 * derived from the final start, so a word pushed by its predecessor keeps a
 * displayable duration. Lines are not shifted relative to each other beyond
 * the delay.
 */

use log::debug;

use crate::lyric_model::{LyricLine, WordTiming};

/// Minimum time a word stays highlighted
pub const MIN_WORD_DURATION_MS: i64 = 300;

/// Minimum distance between a word's end and the next word's start
pub const MIN_GAP_MS: i64 = 100;

/// Lower bound for the global delay
pub const MIN_DELAY_MS: i64 = -10_000;

/// Upper bound for the global delay
pub const MAX_DELAY_MS: i64 = 10_000;

/// Clamp a control value into `[MIN_DELAY_MS, MAX_DELAY_MS]`
pub fn clamp_delay(delay_ms: i64) -> i64 {
    delay_ms.clamp(MIN_DELAY_MS, MAX_DELAY_MS)
}

/// Normalize all lines with the given delay
pub fn normalize(lines: &[LyricLine], delay_ms: i64) -> Vec<LyricLine> {
    let normalized: Vec<LyricLine> = lines.iter().map(|line| normalize_line(line, delay_ms)).collect();

    debug!("Normalized {} lines with delay {}ms", normalized.len(), delay_ms);

    normalized
}

/// Normalize a single line's words and recompute its bounds
pub fn normalize_line(line: &LyricLine, delay_ms: i64) -> LyricLine {
    let mut words: Vec<WordTiming> = Vec::with_capacity(line.words.len());

    for word in &line.words {
        let mut start_ms = word.start_ms.saturating_add(delay_ms);
        if let Some(prev) = words.last() {
            start_ms = start_ms.max(prev.end_ms.saturating_add(MIN_GAP_MS));
        }
        let end_ms = word
            .end_ms
            .saturating_add(delay_ms)
            .max(start_ms.saturating_add(MIN_WORD_DURATION_MS));

        words.push(WordTiming::new(word.text.clone(), start_ms, end_ms));
    }

    let mut normalized = LyricLine {
        text: line.text.clone(),
        words,
        start_ms: line.start_ms.saturating_add(delay_ms),
        end_ms: line.end_ms.saturating_add(delay_ms),
    };
    normalized.recompute_bounds();
    normalized
}
