/*!
 * Randomised checks of the pipeline's timing guarantees
 */

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use lyricsync::lyric_model::MAX_TIMESTAMP_MS;
use lyricsync::raw_lyrics::{RawLineRecord, RawLyrics, RawWordRecord};
use lyricsync::timeline::{
    locate_line, merge, normalize, parse, ParsePolicy, TimedWordParser, TimelineCache, MAX_DELAY_MS,
    MIN_GAP_MS, MIN_WORD_DURATION_MS,
};

/// Build messy raw data: overlaps, zero-length words, blanks, missing ends
/// and the occasional word pinned near the top of the `i64` range
fn random_raw(rng: &mut StdRng) -> RawLyrics {
    let line_count = rng.random_range(0..25);
    let mut cursor: i64 = rng.random_range(0..3000);
    let mut lines = Vec::with_capacity(line_count);

    for _ in 0..line_count {
        let word_count = rng.random_range(0..8);
        let mut words = Vec::with_capacity(word_count);
        for w in 0..word_count {
            let (start, end) = if rng.random_range(0..30) == 0 {
                let start = i64::MAX - rng.random_range(0..1000);
                (start, start.saturating_add(rng.random_range(-50..700)))
            } else {
                let start = cursor + rng.random_range(-200..400);
                cursor = start.max(0) + rng.random_range(0..300);
                (start, start + rng.random_range(-50..700))
            };
            let text = if rng.random_range(0..10) == 0 { "  ".to_string() } else { format!("w{}", w) };
            let end_ms = if rng.random_range(0..8) == 0 { None } else { Some(end) };
            words.push(RawWordRecord {
                text: Some(text),
                start_ms: Some(start),
                end_ms,
            });
        }
        cursor += rng.random_range(0..2000);
        lines.push(RawLineRecord::new(words));
    }

    RawLyrics::new(lines)
}

#[test]
fn test_normalize_withRandomInput_shouldHoldDurationAndGapInvariants() {
    let mut rng = StdRng::seed_from_u64(0x1f2e_3d4c);

    for _ in 0..200 {
        let raw = random_raw(&mut rng);
        let policy = if rng.random_range(0..2) == 0 { ParsePolicy::Strict } else { ParsePolicy::Lenient };
        let delay = rng.random_range(-10_000..=10_000);

        let lines = normalize(&parse(&raw, policy), delay);

        for line in &lines {
            assert!(!line.words.is_empty());
            assert_eq!(line.start_ms, line.words[0].start_ms);
            assert_eq!(line.end_ms, line.words[line.words.len() - 1].end_ms);
            for word in &line.words {
                assert!(word.end_ms - word.start_ms >= MIN_WORD_DURATION_MS);
                assert!(!word.text.trim().is_empty());
            }
            for pair in line.words.windows(2) {
                assert!(pair[1].start_ms >= pair[0].end_ms + MIN_GAP_MS);
            }
        }

        // Repeated calls are byte-identical
        assert_eq!(lines, normalize(&parse(&raw, policy), delay));
    }
}

#[test]
fn test_merge_withRandomInput_shouldPreserveBounds() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..100 {
        let raw = random_raw(&mut rng);
        let lines = normalize(&parse(&raw, ParsePolicy::Lenient), 0);
        let merged = merge(&lines);

        assert_eq!(merged.len(), lines.len());
        for (before, after) in lines.iter().zip(&merged) {
            assert_eq!(after.words.len(), 1);
            assert_eq!((after.start_ms, after.end_ms), (before.start_ms, before.end_ms));
            if before.words.len() == 1 {
                assert_eq!(after, before);
            }
        }
    }
}

#[test]
fn test_locateLine_withRandomTimelines_shouldNeverGoBackwards() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..100 {
        let raw = random_raw(&mut rng);
        let lines = normalize(&parse(&raw, ParsePolicy::Strict), 0);

        // Locator monotonicity presumes chronologically ordered lines
        if lines.windows(2).any(|pair| pair[1].start_ms < pair[0].start_ms) {
            continue;
        }

        let mut previous = -1;
        let mut time_ms = -500;
        while time_ms < 60_000 {
            let idx = locate_line(&lines, time_ms).as_index();
            assert!(idx >= previous);
            assert!(idx < lines.len() as i64);
            previous = idx;
            time_ms += rng.random_range(1..250);
        }
    }
}

#[test]
fn test_cache_withRandomTickSequence_shouldMatchUncachedPipeline() {
    let mut rng = StdRng::seed_from_u64(99);
    let raw = Arc::new(random_raw(&mut rng));
    let mut cache = TimelineCache::default();

    for _ in 0..300 {
        let delay = [0, 150, -300][rng.random_range(0..3)];
        let merge_enabled = rng.random_range(0..4) == 0;

        let cached = cache.get_processed(&raw, delay, merge_enabled);
        let mut expected = normalize(&parse(&raw, ParsePolicy::Strict), delay);
        if merge_enabled {
            expected = merge(&expected);
        }

        assert_eq!(*cached, expected);
    }
}

#[test]
fn test_cache_withExtremeTimings_shouldDropThemWithoutPanicking() {
    let raw = Arc::new(RawLyrics::from_json_str(
        r#"[{"words": [
            {"text": "huge", "start": 9223372036854775000, "end": 9223372036854775807},
            {"text": "open", "start": 9223372036854775800}
        ]}]"#,
    )
    .unwrap());

    let mut strict = TimelineCache::default();
    assert!(strict.get_processed(&raw, 100, false).is_empty());

    let mut lenient = TimelineCache::new(TimedWordParser::new(ParsePolicy::Lenient));
    assert!(lenient.get_processed(&raw, MAX_DELAY_MS, true).is_empty());
}

#[test]
fn test_normalize_withLatestAcceptedTimestamp_shouldHoldInvariants() {
    let raw = RawLyrics::new(vec![RawLineRecord::new(vec![
        RawWordRecord::new("late", MAX_TIMESTAMP_MS - 50, MAX_TIMESTAMP_MS - 10),
        RawWordRecord::new("later", MAX_TIMESTAMP_MS - 5, MAX_TIMESTAMP_MS),
    ])]);

    let lines = normalize(&parse(&raw, ParsePolicy::Strict), MAX_DELAY_MS);
    let words = &lines[0].words;

    assert_eq!(words.len(), 2);
    assert!(words[0].duration_ms() >= MIN_WORD_DURATION_MS);
    assert!(words[1].duration_ms() >= MIN_WORD_DURATION_MS);
    assert!(words[1].start_ms >= words[0].end_ms + MIN_GAP_MS);
}
