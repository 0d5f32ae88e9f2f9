//! Logger setup
//!
//! 日志初始化

use std::fmt;
use std::str::FromStr;

use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, LevelPadding, TermLogger, TerminalMode};
use time::macros::format_description;

/// Log verbosity, ordered from most to least chatty
///
/// 日志详细程度，从最详细到最简略排序
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl Verbosity {
    pub const ALL: [Verbosity; 4] = [
        Verbosity::Debug,
        Verbosity::Info,
        Verbosity::Warn,
        Verbosity::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Debug => "DEBUG",
            Verbosity::Info => "INFO",
            Verbosity::Warn => "WARN",
            Verbosity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Verbosity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verbosity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verbosity::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown log level '{s}' (expected DEBUG, INFO, WARN or ERROR)"))
    }
}

impl From<Verbosity> for LevelFilter {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Debug => LevelFilter::Debug,
            Verbosity::Info => LevelFilter::Info,
            Verbosity::Warn => LevelFilter::Warn,
            Verbosity::Error => LevelFilter::Error,
        }
    }
}

/// Install the stderr logger; call once at startup
///
/// 安装 stderr 日志器；仅在启动时调用一次
///
/// Lines look like `2024-01-31 12:00:00,123 [WARN ] message`.
pub fn init(verbosity: Verbosity) -> Result<(), SetLoggerError> {
    let mut builder = ConfigBuilder::new();
    builder
        .set_time_format_custom(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second],[subsecond digits:3]"
        ))
        .set_level_padding(LevelPadding::Right)
        .set_thread_level(LevelFilter::Off)
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .add_filter_allow_str("fmap");
    // Falls back to UTC when the local offset cannot be determined
    let _ = builder.set_time_offset_to_local();

    TermLogger::init(
        verbosity.into(),
        builder.build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
}
