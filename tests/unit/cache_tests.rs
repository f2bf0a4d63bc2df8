/*!
 * Tests for processed timeline caching
 */

use std::sync::Arc;

use lyricsync::raw_lyrics::RawLyrics;
use lyricsync::timeline::cache::TimelineCache;
use lyricsync::timeline::parser::{ParsePolicy, TimedWordParser};
use crate::common;

#[test]
fn test_cache_getProcessed_twiceWithSameArguments_shouldReturnIdenticalObject() {
    let mut cache = TimelineCache::default();
    let data = common::raw_lyrics(&[&[("a", 0, 400), ("b", 500, 900)]]);

    let first = cache.get_processed(&data, 100, false);
    let second = cache.get_processed(&data, 100, false);

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_cache_getProcessed_withDelayChange_shouldMissAndShift() {
    let mut cache = TimelineCache::default();
    let data = common::raw_lyrics(&[&[("a", 0, 400)], &[("b", 2000, 2500)]]);

    let first = cache.get_processed(&data, 0, false);
    let second = cache.get_processed(&data, 200, false);

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(second[0].start_ms, first[0].start_ms + 200);
    assert_eq!(cache.stats().misses, 2);
}

#[test]
fn test_cache_getProcessed_withMergeToggle_shouldMissBothWays() {
    let mut cache = TimelineCache::default();
    let data = common::raw_lyrics(&[&[("a", 0, 400), ("b", 500, 900)]]);

    let plain = cache.get_processed(&data, 0, false);
    let merged = cache.get_processed(&data, 0, true);
    let plain_again = cache.get_processed(&data, 0, false);

    assert_eq!(plain[0].words.len(), 2);
    assert_eq!(merged[0].words.len(), 1);
    assert!(!Arc::ptr_eq(&plain, &plain_again));
    assert_eq!(plain, plain_again);
}

#[test]
fn test_cache_getProcessed_withNewSourceReference_shouldReplaceSlot() {
    let mut cache = TimelineCache::default();
    let first_song = common::raw_lyrics(&[&[("a", 0, 400)]]);
    let second_song = common::raw_lyrics(&[&[("z", 5000, 5400)]]);

    cache.get_processed(&first_song, 0, false);
    let second = cache.get_processed(&second_song, 0, false);
    let first_again = cache.get_processed(&first_song, 0, false);

    assert_eq!(second[0].text, "z");
    assert_eq!(first_again[0].text, "a");
    assert_eq!(cache.stats().misses, 3);
    assert_eq!(cache.stats().hits, 0);
}

#[test]
fn test_cache_invalidate_withInPlaceMutation_shouldPickUpChanges() {
    let mut cache = TimelineCache::default();
    let mut data = common::raw_lyrics(&[&[("a", 0, 400)]]);

    let before = cache.get_processed(&data, 0, false);
    assert_eq!(before[0].text, "a");
    drop(before);

    // Invalidation releases the cache's reference, so the raw data can be edited in place
    cache.invalidate();
    Arc::get_mut(&mut data)
        .expect("no other references")
        .lines[0]
        .words[0]
        .text = Some("changed".to_string());

    let after = cache.get_processed(&data, 0, false);

    assert_eq!(after[0].text, "changed");
}

#[test]
fn test_cache_withUnavailableData_shouldCacheEmptyTimeline() {
    let mut cache = TimelineCache::default();
    let data = Arc::new(RawLyrics::empty());

    let first = cache.get_processed(&data, 0, false);
    let second = cache.get_processed(&data, 0, false);

    assert!(first.is_empty());
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_cache_withLenientParser_shouldKeepEndlessWords() {
    let mut cache = TimelineCache::new(TimedWordParser::new(ParsePolicy::Lenient));
    let data = Arc::new(RawLyrics::from_json_str(r#"[{"words": [{"text": "la", "start": 100}]}]"#).unwrap());

    let lines = cache.get_processed(&data, 0, false);

    assert_eq!((lines[0].start_ms, lines[0].end_ms), (100, 600));
}

#[test]
fn test_cache_clear_shouldResetCounters() {
    let mut cache = TimelineCache::default();
    let data = common::raw_lyrics(&[&[("a", 0, 400)]]);
    cache.get_processed(&data, 0, false);
    cache.get_processed(&data, 0, false);

    cache.clear();

    assert!(cache.is_empty());
    assert_eq!(cache.stats().hits + cache.stats().misses, 0);
}
