/*!
 * Raw timed-word records as supplied by the import side.
 *
 * Upstream payloads come in several loosely related shapes, so nothing about
 * field presence or type is trusted here. Every accessor has a default and a
 * field that cannot be read is recorded as absent; deciding what to keep is
 * left to the parser.
 */

use std::fs;
use std::path::Path;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::errors::LyricError;

// @const: Clock-style timestamps such as "01:02.500" or "1:01:02,5"
static CLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d+):(\d{1,2})(?:[.,](\d{1,3}))?$").unwrap()
});

const TEXT_KEYS: [&str; 2] = ["text", "word"];
const START_KEYS: [&str; 4] = ["startTime", "start", "start_ms", "begin"];
const END_KEYS: [&str; 3] = ["endTime", "end", "end_ms"];
const LINE_KEYS: [&str; 2] = ["lines", "lyrics"];
const WORD_KEYS: [&str; 2] = ["words", "syllables"];
const FLAG_KEYS: [&str; 3] = ["valid", "available", "hasData"];

/// One untrusted word record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWordRecord {
    /// Word text, untrimmed
    pub text: Option<String>,
    /// Start in ms, if readable
    pub start_ms: Option<i64>,
    /// End in ms, if readable
    pub end_ms: Option<i64>,
}

impl RawWordRecord {
    /// Record with all three fields present
    pub fn new(text: &str, start_ms: i64, end_ms: i64) -> Self {
        Self {
            text: Some(text.to_string()),
            start_ms: Some(start_ms),
            end_ms: Some(end_ms),
        }
    }

    /// Record whose end time is missing upstream
    pub fn without_end(text: &str, start_ms: i64) -> Self {
        Self {
            text: Some(text.to_string()),
            start_ms: Some(start_ms),
            end_ms: None,
        }
    }

    fn from_value(value: &Value) -> Self {
        Self {
            text: lookup(value, &TEXT_KEYS).and_then(read_text),
            start_ms: lookup(value, &START_KEYS).and_then(read_millis),
            end_ms: lookup(value, &END_KEYS).and_then(read_millis),
        }
    }
}

/// One untrusted line record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLineRecord {
    /// Word records in source order
    pub words: Vec<RawWordRecord>,
}

impl RawLineRecord {
    /// Create a line record from words
    pub fn new(words: Vec<RawWordRecord>) -> Self {
        Self { words }
    }

    fn from_value(value: &Value) -> Self {
        let words = match value {
            // A bare array of word objects is accepted as a line
            Value::Array(items) => items.iter().map(RawWordRecord::from_value).collect(),
            _ => lookup(value, &WORD_KEYS)
                .and_then(Value::as_array)
                .map(|items| items.iter().map(RawWordRecord::from_value).collect())
                .unwrap_or_default(),
        };
        Self { words }
    }
}

/// Raw lyric payload with its "data present" flag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawLyrics {
    /// Whether the collaborator reported any data at all
    pub available: bool,
    /// Line records in source order
    pub lines: Vec<RawLineRecord>,
}

impl RawLyrics {
    /// Payload flagged as present
    pub fn new(lines: Vec<RawLineRecord>) -> Self {
        Self {
            available: true,
            lines,
        }
    }

    /// Payload representing "no data"
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a JSON document. Only a syntactically broken document is an error;
    /// any valid JSON is accepted and unusable parts are left for the parser to drop.
    pub fn from_json_str(content: &str) -> Result<Self, LyricError> {
        let value: Value = serde_json::from_str(content)?;
        Ok(Self::from_value(&value))
    }

    /// Read and parse a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LyricError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Build from an already parsed JSON value
    pub fn from_value(value: &Value) -> Self {
        let line_values = match value {
            Value::Array(items) => Some(items),
            _ => lookup(value, &LINE_KEYS).and_then(Value::as_array),
        };

        let lines: Vec<RawLineRecord> = line_values
            .map(|items| items.iter().map(RawLineRecord::from_value).collect())
            .unwrap_or_default();

        let available = lookup(value, &FLAG_KEYS)
            .and_then(Value::as_bool)
            .unwrap_or(line_values.is_some());

        debug!(
            "Read raw lyrics: {} line records, {} word records (available: {})",
            lines.len(),
            lines.iter().map(|l| l.words.len()).sum::<usize>(),
            available
        );

        Self { available, lines }
    }

    /// Whether there is anything to process
    pub fn has_data(&self) -> bool {
        self.available && !self.lines.is_empty()
    }

    /// Total number of word records across all lines
    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| l.words.len()).sum()
    }
}

/// First present key among the aliases
fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let map = value.as_object()?;
    keys.iter().find_map(|k| map.get(*k)).filter(|v| !v.is_null())
}

fn read_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a millisecond value from a number, a numeric string or a clock string
fn read_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(round_millis)),
        Value::String(s) => parse_millis_str(s),
        _ => None,
    }
}

fn round_millis(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() < i64::MAX as f64 {
        Some(value.round() as i64)
    } else {
        None
    }
}

/// Parse "1500", "1500.4" or a clock string like "00:01.500" into ms
pub fn parse_millis_str(input: &str) -> Option<i64> {
    let trimmed = input.trim();
    if let Ok(ms) = trimmed.parse::<i64>() {
        return Some(ms);
    }
    if let Ok(ms) = trimmed.parse::<f64>() {
        return round_millis(ms);
    }

    let caps = CLOCK_REGEX.captures(trimmed)?;
    let field = |idx: usize| -> Option<i64> {
        caps.get(idx).map_or(Some(0), |m| m.as_str().parse().ok())
    };
    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    if seconds >= 60 {
        return None;
    }

    // Fraction digits are decimal places: ".5" is 500ms, ".05" is 50ms
    let millis = match caps.get(4) {
        Some(m) => {
            let digits = m.as_str();
            let value: i64 = digits.parse().ok()?;
            value * 10_i64.pow(3 - digits.len() as u32)
        }
        None => 0,
    };

    // Absurdly long hour or minute fields overflow; treat them as absent
    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(millis)
}
