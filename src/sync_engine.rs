use std::sync::Arc;
use log::{debug, trace, warn};

use crate::app_config::SyncConfig;
use crate::lyric_model::{LyricLine, WordTiming};
use crate::raw_lyrics::RawLyrics;
use crate::timeline::{
    clamp_delay, locate_line, locate_word, CacheStats, LinePosition, ParsePolicy,
    TimelineCache, WordPosition,
};

// @module: Synchronization engine driven by playback ticks

/// What the renderer needs for one playback tick
#[derive(Debug, Clone)]
pub struct SyncFrame {
    /// Active line
    pub line: LinePosition,

    /// Active word inside the active line
    pub word: WordPosition,

    /// Processed timeline the positions refer to
    pub lines: Arc<Vec<LyricLine>>,
}

impl SyncFrame {
    /// Line index with `-1` meaning nothing is active yet
    pub fn line_index(&self) -> i64 {
        self.line.as_index()
    }

    /// Word index with `-1` before the first word and `word_count` past the last
    pub fn word_index(&self) -> i64 {
        let word_count = self.active_line().map_or(0, |line| line.word_count());
        self.word.as_index(word_count)
    }

    /// Line currently displayed, if any
    pub fn active_line(&self) -> Option<&LyricLine> {
        self.line.index().and_then(|idx| self.lines.get(idx))
    }

    /// Word currently highlighted, if any
    pub fn active_word(&self) -> Option<&WordTiming> {
        let line = self.active_line()?;
        self.word.index().and_then(|idx| line.words.get(idx))
    }
}

/// Owns the current raw lyrics, the control values and the processed
/// timeline cache, and answers "what is active now" for each tick.
pub struct SyncEngine {
    // @field: Raw lyrics currently loaded
    source: Option<Arc<RawLyrics>>,

    // @field: Single-slot processed timeline cache
    cache: TimelineCache,

    // @field: Clamped global delay
    delay_ms: i64,

    // @field: Sentence merge toggle
    merge_enabled: bool,

    // @field: Line shown on the previous tick, for change logging
    last_line: Option<LinePosition>,
}

impl SyncEngine {
    /// Create an engine with default settings and no lyrics loaded
    pub fn new() -> Self {
        Self::with_config(&SyncConfig::default())
    }

    // @method: Create an engine from synchronization settings
    pub fn with_config(config: &SyncConfig) -> Self {
        let mut engine = Self {
            source: None,
            cache: TimelineCache::new(config.parser()),
            delay_ms: 0,
            merge_enabled: config.merge_sentences,
            last_line: None,
        };
        engine.set_delay(config.delay_ms);
        engine
    }

    /// Replace the raw lyrics. The previous timeline is dropped immediately.
    pub fn load(&mut self, raw: Arc<RawLyrics>) {
        debug!(
            "Loading lyrics: {} lines, {} words",
            raw.lines.len(),
            raw.word_count()
        );
        self.source = Some(raw);
        self.cache.invalidate();
        self.last_line = None;
    }

    /// Force reprocessing on the next read, for raw data mutated in place
    pub fn reload(&mut self) {
        self.cache.invalidate();
        self.last_line = None;
    }

    /// Unload the lyrics
    pub fn clear(&mut self) {
        self.source = None;
        self.cache.invalidate();
        self.last_line = None;
    }

    /// Check if lyrics are loaded and flagged as present
    pub fn has_lyrics(&self) -> bool {
        self.source.as_ref().is_some_and(|raw| raw.has_data())
    }

    /// Set the global delay, clamped to the accepted range. Returns the applied value.
    pub fn set_delay(&mut self, delay_ms: i64) -> i64 {
        let clamped = clamp_delay(delay_ms);
        if clamped != delay_ms {
            warn!("Delay {}ms out of range, clamped to {}ms", delay_ms, clamped);
        }
        self.delay_ms = clamped;
        clamped
    }

    /// Current global delay
    pub fn delay_ms(&self) -> i64 {
        self.delay_ms
    }

    /// Enable or disable sentence merging
    pub fn set_merge(&mut self, merge_enabled: bool) {
        self.merge_enabled = merge_enabled;
    }

    /// Check if sentence merging is enabled
    pub fn merge_enabled(&self) -> bool {
        self.merge_enabled
    }

    /// Switch the parser strictness policy
    pub fn set_parse_policy(&mut self, policy: ParsePolicy) {
        let parser = self.cache.parser().with_policy(policy);
        self.cache.set_parser(parser);
    }

    /// Processed timeline for the current source and settings
    pub fn timeline(&mut self) -> Arc<Vec<LyricLine>> {
        match &self.source {
            Some(raw) => self.cache.get_processed(raw, self.delay_ms, self.merge_enabled),
            None => Arc::new(Vec::new()),
        }
    }

    /// Resolve the active line and word for a playback timestamp.
    ///
    /// Safe to call with repeated or out-of-order timestamps; only the
    /// cache is touched and only when the settings changed.
    pub fn tick(&mut self, time_ms: i64) -> SyncFrame {
        let lines = self.timeline();
        let line = locate_line(&lines, time_ms);
        let word = match line.index().and_then(|idx| lines.get(idx)) {
            Some(active) => locate_word(active, time_ms),
            None => WordPosition::BeforeFirst,
        };

        if self.last_line != Some(line) {
            trace!("t={}ms: line {:?}, word {:?}", time_ms, line, word);
            self.last_line = Some(line);
        }

        SyncFrame { line, word, lines }
    }

    /// Cache hit/miss counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self::new()
    }
}
