/*!
 * Timing audit for processed lyric timelines.
 *
 * This module checks that a timeline is:
 * - Made of non-empty lines whose bounds match their first and last word
 * - Free of words shorter than the minimum display duration
 * - Free of word pairs closer together than the minimum gap
 * - In chronological line order
 */

use log::debug;

use crate::lyric_model::LyricLine;
use crate::timeline::normalizer::{MIN_GAP_MS, MIN_WORD_DURATION_MS};

/// Result of validating a single line
#[derive(Debug, Clone)]
pub struct LineTimingResult {
    /// Index of the line in the timeline
    pub line_index: usize,
    /// Whether the line passed validation
    pub passed: bool,
    /// Issues found
    pub issues: Vec<TimingIssue>,
}

impl LineTimingResult {
    /// Create a passing result
    pub fn passed(line_index: usize) -> Self {
        Self {
            line_index,
            passed: true,
            issues: vec![],
        }
    }

    /// Create a failing result
    pub fn failed(line_index: usize, issues: Vec<TimingIssue>) -> Self {
        Self {
            line_index,
            passed: false,
            issues,
        }
    }
}

/// Types of timing issues
#[derive(Debug, Clone, PartialEq)]
pub enum TimingIssue {
    /// Line has no words
    EmptyLine,
    /// Line bounds disagree with its words
    BoundsMismatch {
        start_ms: i64,
        end_ms: i64,
        words_start_ms: i64,
        words_end_ms: i64,
    },
    /// Word is displayed for too short a time
    WordTooShort {
        word_index: usize,
        duration_ms: i64,
        min_duration_ms: i64,
    },
    /// Word starts too soon after the previous one ends
    GapTooSmall {
        word_index: usize,
        gap_ms: i64,
        min_gap_ms: i64,
    },
    /// Line starts before the previous line
    OutOfOrder {
        prev_line_index: usize,
        prev_start_ms: i64,
        start_ms: i64,
    },
}

impl std::fmt::Display for TimingIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimingIssue::EmptyLine => write!(f, "Line has no words"),
            TimingIssue::BoundsMismatch { start_ms, end_ms, words_start_ms, words_end_ms } => {
                write!(
                    f,
                    "Line bounds [{}, {}]ms do not match words [{}, {}]ms",
                    start_ms, end_ms, words_start_ms, words_end_ms
                )
            }
            TimingIssue::WordTooShort { word_index, duration_ms, min_duration_ms } => {
                write!(
                    f,
                    "Word {} too short: {}ms (min: {}ms)",
                    word_index, duration_ms, min_duration_ms
                )
            }
            TimingIssue::GapTooSmall { word_index, gap_ms, min_gap_ms } => {
                write!(
                    f,
                    "Word {} starts {}ms after the previous word (min: {}ms)",
                    word_index, gap_ms, min_gap_ms
                )
            }
            TimingIssue::OutOfOrder { prev_line_index, prev_start_ms, start_ms } => {
                write!(
                    f,
                    "Starts at {}ms, before line {} at {}ms",
                    start_ms, prev_line_index, prev_start_ms
                )
            }
        }
    }
}

/// Result of validating a whole timeline
#[derive(Debug, Clone)]
pub struct TimingValidationResult {
    /// Overall pass/fail status
    pub passed: bool,
    /// Results for each line
    pub line_results: Vec<LineTimingResult>,
    /// Total number of issues
    pub total_issues: usize,
    /// Number of lines starting before their predecessor
    pub out_of_order_count: usize,
}

impl TimingValidationResult {
    /// Get all failed lines
    pub fn failed_lines(&self) -> Vec<&LineTimingResult> {
        self.line_results.iter().filter(|r| !r.passed).collect()
    }
}

/// Configuration for timing validation
#[derive(Debug, Clone)]
pub struct TimingValidatorConfig {
    /// Minimum word duration in ms
    pub min_word_duration_ms: i64,
    /// Minimum gap between consecutive words in ms
    pub min_gap_ms: i64,
    /// Whether to check chronological line order
    pub check_line_order: bool,
}

impl Default for TimingValidatorConfig {
    fn default() -> Self {
        Self {
            min_word_duration_ms: MIN_WORD_DURATION_MS,
            min_gap_ms: MIN_GAP_MS,
            check_line_order: true,
        }
    }
}

/// Timing validator for processed lines
pub struct TimingValidator {
    config: TimingValidatorConfig,
}

impl TimingValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self {
            config: TimingValidatorConfig::default(),
        }
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimingValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate a single line
    pub fn validate_line(&self, line_index: usize, line: &LyricLine) -> LineTimingResult {
        let (Some(first), Some(last)) = (line.words.first(), line.words.last()) else {
            return LineTimingResult::failed(line_index, vec![TimingIssue::EmptyLine]);
        };

        let mut issues = Vec::new();

        if line.start_ms != first.start_ms || line.end_ms != last.end_ms {
            issues.push(TimingIssue::BoundsMismatch {
                start_ms: line.start_ms,
                end_ms: line.end_ms,
                words_start_ms: first.start_ms,
                words_end_ms: last.end_ms,
            });
        }

        for (word_index, word) in line.words.iter().enumerate() {
            let duration_ms = word.duration_ms();
            if duration_ms < self.config.min_word_duration_ms {
                issues.push(TimingIssue::WordTooShort {
                    word_index,
                    duration_ms,
                    min_duration_ms: self.config.min_word_duration_ms,
                });
            }

            if word_index > 0 {
                let gap_ms = word.start_ms.saturating_sub(line.words[word_index - 1].end_ms);
                if gap_ms < self.config.min_gap_ms {
                    issues.push(TimingIssue::GapTooSmall {
                        word_index,
                        gap_ms,
                        min_gap_ms: self.config.min_gap_ms,
                    });
                }
            }
        }

        if issues.is_empty() {
            LineTimingResult::passed(line_index)
        } else {
            LineTimingResult::failed(line_index, issues)
        }
    }

    /// Validate every line of a timeline
    pub fn validate_timeline(&self, lines: &[LyricLine]) -> TimingValidationResult {
        let mut line_results: Vec<LineTimingResult> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| self.validate_line(i, line))
            .collect();

        let mut out_of_order_count = 0;

        if self.config.check_line_order {
            for i in 1..lines.len() {
                let prev = &lines[i - 1];
                let current = &lines[i];
                if current.start_ms < prev.start_ms {
                    out_of_order_count += 1;
                    if let Some(result) = line_results.get_mut(i) {
                        result.issues.push(TimingIssue::OutOfOrder {
                            prev_line_index: i - 1,
                            prev_start_ms: prev.start_ms,
                            start_ms: current.start_ms,
                        });
                        result.passed = false;
                    }
                }
            }
        }

        let total_issues: usize = line_results.iter().map(|r| r.issues.len()).sum();
        let passed = line_results.iter().all(|r| r.passed);

        debug!(
            "Timing validation: {} lines, {} issues, {} out of order",
            lines.len(),
            total_issues,
            out_of_order_count
        );

        TimingValidationResult {
            passed,
            line_results,
            total_issues,
            out_of_order_count,
        }
    }
}

impl Default for TimingValidator {
    fn default() -> Self {
        Self::new()
    }
}
