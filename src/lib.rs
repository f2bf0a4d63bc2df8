/*!
 * # lyricsync - word-level lyric synchronization
 *
 * A Rust library that keeps timed lyrics in step with an audio playback clock.
 *
 * ## Features
 *
 * - Tolerant ingestion of raw timed-word JSON in several upstream shapes
 * - Strict or lenient handling of words without an end time
 * - Global delay offset with minimum word duration and inter-word gap
 * - Optional sentence merging (one highlight per line)
 * - Active line / word lookup with sticky display through gaps
 * - Single-slot cache so per-tick lookups never reprocess unchanged data
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `lyric_model`: Word and line timing types
 * - `raw_lyrics`: Untrusted raw records and JSON ingestion
 * - `timeline`: The timing pipeline:
 *   - `timeline::parser`: Raw records to validated lines
 *   - `timeline::normalizer`: Delay, minimum duration and gap enforcement
 *   - `timeline::merger`: Sentence merging
 *   - `timeline::locator`: Active line / word lookup
 *   - `timeline::cache`: Processed timeline caching
 * - `sync_engine`: Per-tick driver owning the cache and control values
 * - `validation`: Timing audit of processed timelines
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod lyric_model;
pub mod raw_lyrics;
pub mod timeline;
pub mod sync_engine;
pub mod validation;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use lyric_model::{LyricLine, WordTiming};
pub use raw_lyrics::{RawLineRecord, RawLyrics, RawWordRecord};
pub use sync_engine::{SyncEngine, SyncFrame};
pub use timeline::{LinePosition, ParsePolicy, TimelineCache, WordPosition};
pub use errors::{AppError, ConfigError, LyricError};
