//! Stderr logging for the game loop.
//!
//! Lines look like `[   1.250s  INFO engine] round started`: session uptime,
//! level, and the last path segment of the emitting module. A global level
//! can be refined per module, e.g. `tracker=warn` to silence per-frame
//! tracking chatter while keeping engine transitions.

use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter};

/// A `module=level` refinement of the global level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLevel {
    pub module: String,
    pub level: LevelFilter,
}

impl FromStr for ModuleLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (module, level) = s
            .split_once('=')
            .ok_or_else(|| format!("expected `module=level`, got `{s}`"))?;
        let module = module.trim();
        if module.is_empty() {
            return Err(format!("empty module name in `{s}`"));
        }
        let level = level
            .trim()
            .parse()
            .map_err(|_| format!("unknown log level `{}`", level.trim()))?;
        Ok(Self {
            module: module.to_string(),
            level,
        })
    }
}

/// Levels for the loop logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub modules: Vec<ModuleLevel>,
}

impl LogSettings {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            modules: Vec::new(),
        }
    }

    pub fn with_module(mut self, module: ModuleLevel) -> Self {
        self.modules.push(module);
        self
    }

    /// Level for a record target. The last matching module entry wins; a
    /// module matches when it equals a `::` segment of the target.
    pub fn level_for(&self, target: &str) -> LevelFilter {
        self.modules
            .iter()
            .rev()
            .find(|m| target.split("::").any(|seg| seg == m.module))
            .map_or(self.level, |m| m.level)
    }

    /// Most verbose level any target can reach.
    pub fn max_level(&self) -> LevelFilter {
        self.modules
            .iter()
            .map(|m| m.level)
            .fold(self.level, Ord::max)
    }
}

struct LoopLogger {
    settings: LogSettings,
    started: Instant,
}

impl Log for LoopLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.settings.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = LogLine {
            uptime: self.started.elapsed(),
            level: record.level(),
            target: record.target(),
            args: *record.args(),
        };
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

struct LogLine<'a> {
    uptime: Duration,
    level: log::Level,
    target: &'a str,
    args: fmt::Arguments<'a>,
}

impl fmt::Display for LogLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let short = self.target.rsplit("::").next().unwrap_or(self.target);
        write!(
            f,
            "[{:8.3}s {:>5} {}] {}",
            self.uptime.as_secs_f64(),
            self.level,
            short,
            self.args
        )
    }
}

static LOGGER: OnceLock<LoopLogger> = OnceLock::new();

/// Install the loop logger. Only the first call has an effect.
pub fn init(settings: LogSettings) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let max = settings.max_level();
        let logger = LOGGER.get_or_init(|| LoopLogger {
            settings,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(max);
    }
    Ok(())
}

/// [`init`] with a single global level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    init(LogSettings::new(level))
}

/// Install a `tracing` subscriber and forward `log` records into it.
///
/// `RUST_LOG` takes precedence over `settings` when set.
#[cfg(feature = "tracing")]
pub fn init_tracing(settings: &LogSettings, json: bool) {
    let _ = tracing_log::LogTracer::init();
    log::set_max_level(settings.max_level());
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(settings)));
    if json {
        let _ = tracing_fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .flatten_event(true)
            .finish()
            .try_init();
    } else {
        let _ = tracing_fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(tracing_fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}

/// `EnvFilter` directives equivalent to `settings`. `EnvFilter` matches
/// targets by path prefix, so short module names are expanded per crate.
#[cfg(feature = "tracing")]
fn directives(settings: &LogSettings) -> String {
    const CRATES: [&str; 4] = [
        "fruit_catcher",
        "fruit_catcher_core",
        "fruit_catcher_vision",
        "fruit_catcher_game",
    ];
    let mut out = vec![settings.level.to_string().to_ascii_lowercase()];
    for m in &settings.modules {
        let level = m.level.to_string().to_ascii_lowercase();
        out.push(format!("{}={level}", m.module));
        if !m.module.contains("::") {
            out.extend(CRATES.iter().map(|c| format!("{c}::{}={level}", m.module)));
        }
    }
    out.join(",")
}
