// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use lyricsync::app_config::{Config, LogLevel};
use lyricsync::lyric_model::format_timestamp;
use lyricsync::timeline::ParsePolicy;
use lyricsync::validation::TimingValidator;
use lyricsync::errors::{AppError, LyricError};
use lyricsync::{RawLyrics, SyncEngine};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Options shared by every command that builds a timeline
#[derive(Args, Debug, Clone)]
struct TimelineArgs {
    /// Raw timed-word JSON file
    #[arg(value_name = "LYRICS_FILE")]
    lyrics_file: PathBuf,

    /// Delay in ms applied to every word (overrides config, clamped to ±10000)
    #[arg(short, long, allow_negative_numbers = true)]
    delay: Option<i64>,

    /// Collapse each line into one timed unit
    #[arg(short, long)]
    merge: bool,

    /// Synthesize end times for words that lack one instead of dropping them
    #[arg(long)]
    lenient: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the processed timeline
    Process {
        #[command(flatten)]
        timeline: TimelineArgs,

        /// Print JSON instead of a readable listing
        #[arg(long)]
        json: bool,
    },

    /// Show the active line and word at a timestamp
    Locate {
        #[command(flatten)]
        timeline: TimelineArgs,

        /// Playback position in ms
        #[arg(short, long, allow_negative_numbers = true)]
        at: i64,
    },

    /// Simulate playback and print lines as they become active
    Play {
        #[command(flatten)]
        timeline: TimelineArgs,

        /// Start position in ms
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        from: i64,

        /// Stop position in ms (defaults to one second after the last line)
        #[arg(long)]
        to: Option<i64>,

        /// Playback speed multiplier
        #[arg(long, default_value_t = 1.0)]
        speed: f64,
    },

    /// Audit the processed timeline for timing problems
    Check {
        #[command(flatten)]
        timeline: TimelineArgs,
    },

    /// Generate shell completions for lyricsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// lyricsync - word-level lyric synchronization
///
/// Processes timed-word lyric data and resolves the active line and word
/// for a playback position.
#[derive(Parser, Debug)]
#[command(name = "lyricsync")]
#[command(version)]
#[command(about = "Word-level lyric timing and synchronization")]
#[command(long_about = "lyricsync normalizes timed-word lyric data and tracks the active line and word against a playback clock.

EXAMPLES:
    lyricsync process song.json                 # Show the normalized timeline
    lyricsync process --merge --json song.json  # Sentence-level timeline as JSON
    lyricsync locate --at 12500 song.json       # Active line/word at 12.5s
    lyricsync play --delay -300 song.json       # Simulated playback, 300ms earlier
    lyricsync check --lenient song.json         # Audit timing issues
    lyricsync completions bash > lyricsync.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Install at the most verbose level; the effective level is set below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "lyricsync", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = load_or_create_config(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    match cli.command {
        Commands::Process { timeline, json } => run_process(&config, &timeline, json),
        Commands::Locate { timeline, at } => run_locate(&config, &timeline, at),
        Commands::Play { timeline, from, to, speed } => run_play(&config, &timeline, from, to, speed).await,
        Commands::Check { timeline } => run_check(&config, &timeline),
        Commands::Completions { .. } => Ok(()),
    }
}

/// Load the config file, writing a default one when it does not exist
fn load_or_create_config(config_path: &str) -> Result<Config, AppError> {
    if Path::new(config_path).exists() {
        Ok(Config::from_file(config_path)?)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        config.save_to_file(config_path).map_err(|e| {
            AppError::File(format!("Failed to write default config to {}: {}", config_path, e))
        })?;
        Ok(config)
    }
}

/// Build an engine from config plus command-line overrides and load the lyrics
fn build_engine(config: &Config, args: &TimelineArgs) -> Result<SyncEngine, AppError> {
    let raw = RawLyrics::from_file(&args.lyrics_file).map_err(|e| match e {
        LyricError::Io(err) => {
            AppError::File(format!("Failed to read lyrics file {:?}: {}", args.lyrics_file, err))
        }
        other => AppError::Lyric(other),
    })?;

    if !raw.has_data() {
        warn!("No lyric data found in {:?}", args.lyrics_file);
    }

    let mut engine = SyncEngine::with_config(&config.sync);
    if let Some(delay) = args.delay {
        engine.set_delay(delay);
    }
    if args.merge {
        engine.set_merge(true);
    }
    if args.lenient {
        engine.set_parse_policy(ParsePolicy::Lenient);
    }
    engine.load(Arc::new(raw));

    debug!(
        "Engine ready: delay {}ms, merge {}",
        engine.delay_ms(),
        engine.merge_enabled()
    );

    Ok(engine)
}

fn run_process(config: &Config, args: &TimelineArgs, json: bool) -> Result<()> {
    let mut engine = build_engine(config, args)?;
    let lines = engine.timeline();

    if json {
        let output = serde_json::to_string_pretty(lines.as_slice())
            .context("Failed to serialize timeline")?;
        println!("{}", output);
        return Ok(());
    }

    if lines.is_empty() {
        info!("Timeline is empty");
        return Ok(());
    }

    for (idx, line) in lines.iter().enumerate() {
        println!("{:>4}  {}", idx, line);
        if line.words.len() > 1 {
            for word in &line.words {
                println!("        {}", word);
            }
        }
    }

    Ok(())
}

fn run_locate(config: &Config, args: &TimelineArgs, at: i64) -> Result<()> {
    let mut engine = build_engine(config, args)?;
    let frame = engine.tick(at);

    println!("time:  {}", format_timestamp(at));
    println!("line:  {}", frame.line_index());
    println!("word:  {}", frame.word_index());
    if let Some(line) = frame.active_line() {
        println!("text:  {}", line.text);
    }
    if let Some(word) = frame.active_word() {
        println!("focus: {}", word.text);
    }

    Ok(())
}

async fn run_play(
    config: &Config,
    args: &TimelineArgs,
    from: i64,
    to: Option<i64>,
    speed: f64,
) -> Result<()> {
    if !(speed.is_finite() && speed > 0.0) {
        return Err(anyhow!("Playback speed must be a positive number, got {}", speed));
    }

    let mut engine = build_engine(config, args)?;
    let lines = engine.timeline();
    let Some(last) = lines.last() else {
        info!("Timeline is empty, nothing to play");
        return Ok(());
    };
    let to = to.unwrap_or(last.end_ms.saturating_add(1000));
    if to <= from {
        return Err(anyhow!("Stop position {}ms is not after start position {}ms", to, from));
    }

    let progress_bar = ProgressBar::new(playback_span_ms(from, to));
    let style = ProgressStyle::default_bar()
        .template("{spinner} [{elapsed_precise}] [{bar:40}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style);

    let mut interval = tokio::time::interval(Duration::from_millis(config.sync.tick_interval_ms));
    let started = tokio::time::Instant::now();
    let mut shown_line = None;

    loop {
        interval.tick().await;
        let elapsed_ms = (started.elapsed().as_millis() as f64 * speed) as i64;
        let position = from.saturating_add(elapsed_ms);
        if position > to {
            break;
        }

        let frame = engine.tick(position);
        if shown_line != Some(frame.line) {
            if let Some(line) = frame.active_line() {
                progress_bar.println(format!("{}  {}", format_timestamp(position), line.text));
            }
            shown_line = Some(frame.line);
        }

        let focus = frame.active_word().map(|w| w.text.as_str()).unwrap_or("");
        progress_bar.set_position(playback_span_ms(from, position));
        progress_bar.set_message(format!("{} {}", format_timestamp(position), focus));
    }

    progress_bar.finish_and_clear();

    let stats = engine.cache_stats();
    debug!(
        "Playback done: {} cache hits, {} misses ({:.1}% hit rate)",
        stats.hits,
        stats.misses,
        stats.hit_rate() * 100.0
    );

    Ok(())
}

/// Distance covered between two playback positions, never negative
fn playback_span_ms(from: i64, to: i64) -> u64 {
    to.saturating_sub(from).max(0) as u64
}

fn run_check(config: &Config, args: &TimelineArgs) -> Result<()> {
    let mut engine = build_engine(config, args)?;
    let lines = engine.timeline();
    let result = TimingValidator::new().validate_timeline(&lines);

    for line_result in result.failed_lines() {
        for issue in &line_result.issues {
            println!("line {:>4}: {}", line_result.line_index, issue);
        }
    }

    if result.passed {
        info!("{} lines checked, no timing issues", lines.len());
        Ok(())
    } else {
        Err(anyhow!(
            "{} timing issue(s) across {} line(s)",
            result.total_issues,
            result.failed_lines().len()
        ))
    }
}
