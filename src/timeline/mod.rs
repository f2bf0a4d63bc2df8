/*!
 * Lyric timing pipeline.
 *
 * Raw records flow through these stages:
 * - `parser`: raw records to validated lines
 * - `normalizer`: delay shift, minimum word duration and inter-word gap
 * - `merger`: optional collapse of each line into one timed unit
 * - `cache`: single-slot memo of the three stages above
 * - `locator`: active line / word for a playback timestamp
 *
 * Every stage is synchronous and infallible.
 */

pub mod parser;
pub mod normalizer;
pub mod merger;
pub mod locator;
pub mod cache;

// Re-export main types
pub use cache::{CacheStats, TimelineCache};
pub use locator::{locate_line, locate_word, LinePosition, WordPosition};
pub use merger::merge;
pub use normalizer::{clamp_delay, normalize, MAX_DELAY_MS, MIN_DELAY_MS, MIN_GAP_MS, MIN_WORD_DURATION_MS};
pub use parser::{parse, ParsePolicy, TimedWordParser};

use crate::lyric_model::LyricLine;
use crate::raw_lyrics::RawLyrics;

/// Run parser, normalizer and (optionally) merger without any caching
pub fn process(
    parser: &TimedWordParser,
    raw: &RawLyrics,
    delay_ms: i64,
    merge_enabled: bool,
) -> Vec<LyricLine> {
    let parsed = parser.parse(raw);
    let normalized = normalize(&parsed, delay_ms);
    if merge_enabled {
        merge(&normalized)
    } else {
        normalized
    }
}
