use std::fmt;
use serde::{Deserialize, Serialize};

// @module: Internal lyric timeline model

/// Latest accepted timestamp for a parsed word (one year)
pub const MAX_TIMESTAMP_MS: i64 = 365 * 24 * 3_600_000;

/// A single word with a closed millisecond interval `[start_ms, end_ms]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordTiming {
    // @field: Trimmed, non-empty word text
    pub text: String,

    // @field: Start time in ms
    pub start_ms: i64,

    // @field: End time in ms
    pub end_ms: i64,
}

impl WordTiming {
    /// Creates a word without validation - used by tests and the merger
    pub fn new(text: impl Into<String>, start_ms: i64, end_ms: i64) -> Self {
        WordTiming {
            text: text.into(),
            start_ms,
            end_ms,
        }
    }

    // @creates: Validated word timing
    // @validates: Trimmed text non-empty, start >= 0, end > start, end <= MAX_TIMESTAMP_MS
    pub fn new_validated(text: &str, start_ms: i64, end_ms: i64) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() || start_ms < 0 || end_ms <= start_ms || end_ms > MAX_TIMESTAMP_MS {
            return None;
        }

        Some(WordTiming {
            text: trimmed.to_string(),
            start_ms,
            end_ms,
        })
    }

    /// Length of the interval in ms
    pub fn duration_ms(&self) -> i64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Whether `time_ms` falls inside the closed interval
    pub fn contains(&self, time_ms: i64) -> bool {
        self.start_ms <= time_ms && time_ms <= self.end_ms
    }
}

impl fmt::Display for WordTiming {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "<{}> {} <{}>",
            format_timestamp(self.start_ms),
            self.text,
            format_timestamp(self.end_ms)
        )
    }
}

/// A lyric line: ordered words plus bounds derived from the first and last word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricLine {
    /// Word texts joined with a single space
    pub text: String,

    /// Time-ordered words, never empty for lines produced by the parser
    pub words: Vec<WordTiming>,

    /// Start of the first word
    pub start_ms: i64,

    /// End of the last word
    pub end_ms: i64,
}

impl LyricLine {
    /// Build a line from its words, deriving text and bounds.
    ///
    /// Returns `None` for an empty word list since a line without words
    /// has no meaningful bounds.
    pub fn from_words(words: Vec<WordTiming>) -> Option<Self> {
        let start_ms = words.first()?.start_ms;
        let end_ms = words.last()?.end_ms;
        let text = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Some(LyricLine {
            text,
            words,
            start_ms,
            end_ms,
        })
    }

    /// Re-derive `start_ms`/`end_ms` from the first and last word
    pub fn recompute_bounds(&mut self) {
        if let (Some(first), Some(last)) = (self.words.first(), self.words.last()) {
            self.start_ms = first.start_ms;
            self.end_ms = last.end_ms;
        }
    }

    /// Whether `time_ms` falls inside the line's closed interval
    pub fn contains(&self, time_ms: i64) -> bool {
        self.start_ms <= time_ms && time_ms <= self.end_ms
    }

    /// Number of words in the line
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Convert start time to formatted timestamp
    pub fn format_start_time(&self) -> String {
        format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted timestamp
    pub fn format_end_time(&self) -> String {
        format_timestamp(self.end_ms)
    }
}

impl fmt::Display for LyricLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{} --> {}] {}",
            self.format_start_time(),
            self.format_end_time(),
            self.text
        )
    }
}

/// Format milliseconds as `mm:ss.mmm`, with an hour field once past 60 minutes.
///
/// Negative values (words shifted before zero by a delay) get a leading `-`.
pub fn format_timestamp(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let ms = ms.unsigned_abs();
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    if hours > 0 {
        format!("{}{:02}:{:02}:{:02}.{:03}", sign, hours, minutes, seconds, millis)
    } else {
        format!("{}{:02}:{:02}.{:03}", sign, minutes, seconds, millis)
    }
}
