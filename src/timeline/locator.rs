/*!
 * Active line / word lookup for a playback timestamp.
 *
 * Both lookups are linear scans; a song has at most a few hundred lines and
 * a line a few dozen words. Intervals are closed on both ends, so a word is
 * still active at exactly its end time.
 */

use serde::{Deserialize, Serialize};

use crate::lyric_model::LyricLine;

/// Position of the playback clock relative to the timeline's lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinePosition {
    /// Before the first line starts (or no lines at all)
    BeforeStart,
    /// Index of the line to display
    Line(usize),
}

impl LinePosition {
    /// Index form used at the rendering boundary: `-1` before the start
    pub fn as_index(&self) -> i64 {
        match self {
            Self::BeforeStart => -1,
            Self::Line(idx) => *idx as i64,
        }
    }

    /// Line index, if any line is active
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::BeforeStart => None,
            Self::Line(idx) => Some(*idx),
        }
    }
}

/// Position of the playback clock relative to one line's words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordPosition {
    /// Before the first word starts
    BeforeFirst,
    /// Index of the word whose interval contains the time
    Word(usize),
    /// Past the last word's end
    AfterLast,
}

impl WordPosition {
    /// Index form used at the rendering boundary: `-1` before the first
    /// word, `word_count` past the last one
    pub fn as_index(&self, word_count: usize) -> i64 {
        match self {
            Self::BeforeFirst => -1,
            Self::Word(idx) => *idx as i64,
            Self::AfterLast => word_count as i64,
        }
    }

    /// Word index, if a word is active
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Word(idx) => Some(*idx),
            _ => None,
        }
    }
}

/// Find the line to display at `time_ms`.
///
/// - before the first line starts: `BeforeStart`
/// - inside a line's `[start, end]`: the first such line
/// - in a gap: the last line that has started (sticky display)
/// - past the end: the last line
pub fn locate_line(lines: &[LyricLine], time_ms: i64) -> LinePosition {
    let Some(first) = lines.first() else {
        return LinePosition::BeforeStart;
    };
    if time_ms < first.start_ms {
        return LinePosition::BeforeStart;
    }

    if let Some(idx) = lines.iter().position(|line| line.contains(time_ms)) {
        return LinePosition::Line(idx);
    }

    let idx = lines
        .iter()
        .rposition(|line| line.start_ms <= time_ms)
        .unwrap_or(lines.len() - 1);
    LinePosition::Line(idx)
}

/// Find the active word inside `line` at `time_ms`.
///
/// A time inside the gap between two words keeps the earlier word active,
/// mirroring the sticky line behaviour.
pub fn locate_word(line: &LyricLine, time_ms: i64) -> WordPosition {
    let (Some(first), Some(last)) = (line.words.first(), line.words.last()) else {
        return WordPosition::BeforeFirst;
    };
    if time_ms < first.start_ms {
        return WordPosition::BeforeFirst;
    }

    if let Some(idx) = line.words.iter().position(|word| word.contains(time_ms)) {
        return WordPosition::Word(idx);
    }

    if time_ms > last.end_ms {
        return WordPosition::AfterLast;
    }

    // Between two words: keep the previous word highlighted
    match line.words.iter().rposition(|word| word.start_ms <= time_ms) {
        Some(idx) => WordPosition::Word(idx),
        None => WordPosition::BeforeFirst,
    }
}
