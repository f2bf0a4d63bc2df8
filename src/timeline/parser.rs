/*!
 * Timed-word parser.
 *
 * Turns untrusted raw records into `LyricLine`s. Invalid words are dropped,
 * lines left without words are dropped, and nothing here ever fails: a
 * completely unusable payload simply yields an empty timeline.
 */

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::lyric_model::{LyricLine, WordTiming};
use crate::raw_lyrics::{RawLineRecord, RawLyrics, RawWordRecord};

/// Duration given to a word with no end time under the lenient policy
pub const DEFAULT_SYNTHESIZED_DURATION_MS: i64 = 500;

/// How to treat words whose end time is missing upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParsePolicy {
    /// Drop words without an end time
    #[default]
    Strict,
    /// Synthesize `end = start + 500ms` for words without an end time
    Lenient,
}

impl std::fmt::Display for ParsePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Lenient => write!(f, "lenient"),
        }
    }
}

impl std::str::FromStr for ParsePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(anyhow::anyhow!("Invalid parse policy: {}", s)),
        }
    }
}

/// Parser configured with a strictness policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedWordParser {
    policy: ParsePolicy,
    synthesized_duration_ms: i64,
}

impl TimedWordParser {
    /// Create a parser for the given policy with the default synthesized duration
    pub fn new(policy: ParsePolicy) -> Self {
        Self {
            policy,
            synthesized_duration_ms: DEFAULT_SYNTHESIZED_DURATION_MS,
        }
    }

    /// Override the duration synthesized for words missing an end time
    pub fn with_synthesized_duration(mut self, duration_ms: i64) -> Self {
        self.synthesized_duration_ms = duration_ms;
        self
    }

    /// Same parser with a different policy
    pub fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active policy
    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    /// Parse every line, keeping source order
    pub fn parse(&self, raw: &RawLyrics) -> Vec<LyricLine> {
        if !raw.available {
            debug!("Raw lyrics flagged as unavailable, producing empty timeline");
            return Vec::new();
        }

        let lines: Vec<LyricLine> = raw
            .lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| self.parse_line(idx, line))
            .collect();

        if lines.is_empty() && !raw.lines.is_empty() {
            warn!(
                "None of the {} raw lyric lines contained a usable word",
                raw.lines.len()
            );
        } else {
            debug!(
                "Parsed {} of {} raw lines ({} policy)",
                lines.len(),
                raw.lines.len(),
                self.policy
            );
        }

        lines
    }

    fn parse_line(&self, idx: usize, line: &RawLineRecord) -> Option<LyricLine> {
        let words: Vec<WordTiming> = line
            .words
            .iter()
            .filter_map(|word| self.parse_word(word))
            .collect();

        if words.len() < line.words.len() {
            debug!(
                "Line {}: dropped {} of {} words",
                idx,
                line.words.len() - words.len(),
                line.words.len()
            );
        }

        let parsed = LyricLine::from_words(words);
        if parsed.is_none() {
            debug!("Line {}: no usable words, skipping", idx);
        }
        parsed
    }

    fn parse_word(&self, word: &RawWordRecord) -> Option<WordTiming> {
        let text = word.text.as_deref()?;
        let start_ms = word.start_ms?;
        let end_ms = match (word.end_ms, self.policy) {
            (Some(end_ms), _) => end_ms,
            (None, ParsePolicy::Lenient) => start_ms.saturating_add(self.synthesized_duration_ms),
            (None, ParsePolicy::Strict) => return None,
        };

        WordTiming::new_validated(text, start_ms, end_ms)
    }
}

impl Default for TimedWordParser {
    fn default() -> Self {
        Self::new(ParsePolicy::default())
    }
}

/// Parse with the given policy
pub fn parse(raw: &RawLyrics, policy: ParsePolicy) -> Vec<LyricLine> {
    TimedWordParser::new(policy).parse(raw)
}
