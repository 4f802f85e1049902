// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Log levels.

use std::fmt;
use std::str::FromStr;

/// An enum representing the available verbosity levels of the logger.
///
/// Levels are ordered from the most verbose to the most severe:
///
/// `Debug < Info < Warn < Error < DPanic < Panic < Fatal`
///
/// A logger configured with level `Warn` emits `Warn` and every more severe level.
#[repr(usize)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum Level {
    /// The "debug" level.
    ///
    /// Designates lower priority information, usually voluminous.
    Debug = 0,
    /// The "info" level.
    ///
    /// Designates useful information. This is the default.
    Info,
    /// The "warn" level.
    ///
    /// Designates hazardous situations that are more important than info.
    Warn,
    /// The "error" level.
    ///
    /// Designates very serious errors.
    Error,
    /// The "dpanic" level.
    ///
    /// Designates errors that are severe enough to panic in development mode.
    DPanic,
    /// The "panic" level.
    ///
    /// The logger panics after the record is written.
    Panic,
    /// The "fatal" level.
    ///
    /// The process exits after the record is written.
    Fatal,
}

impl Level {
    /// Return the string representation of the `Level`.
    ///
    /// This returns the same string as the `fmt::Display` implementation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::DPanic => "DPANIC",
            Level::Panic => "PANIC",
            Level::Fatal => "FATAL",
        }
    }

    /// Return all recognized levels, from the most verbose to the most severe.
    pub fn iter() -> impl Iterator<Item = Level> {
        [
            Level::Debug,
            Level::Info,
            Level::Warn,
            Level::Error,
            Level::DPanic,
            Level::Panic,
            Level::Fatal,
        ]
        .into_iter()
    }

    /// The most verbose [`log::LevelFilter`] that can still produce a record at this level.
    pub(crate) fn to_log_filter(self) -> log::LevelFilter {
        match self {
            Level::Debug => log::LevelFilter::Trace,
            Level::Info => log::LevelFilter::Info,
            Level::Warn => log::LevelFilter::Warn,
            _ => log::LevelFilter::Error,
        }
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug | log::Level::Trace => Self::Debug,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The type returned by [`from_str`] when the string doesn't match any of the log levels.
///
/// [`from_str`]: FromStr::from_str
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct ParseLevelError {}

impl fmt::Display for ParseLevelError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str("malformed log level, expect one of debug/info/warn/error/dpanic/panic/fatal")
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;
    fn from_str(s: &str) -> Result<Level, Self::Err> {
        for (name, level) in [
            ("debug", Level::Debug),
            ("info", Level::Info),
            ("warn", Level::Warn),
            ("error", Level::Error),
            ("dpanic", Level::DPanic),
            ("panic", Level::Panic),
            ("fatal", Level::Fatal),
        ] {
            if s.eq_ignore_ascii_case(name) {
                return Ok(level);
            }
        }

        Err(ParseLevelError {})
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_level() {
        for level in Level::iter() {
            let name = level.as_str().to_ascii_lowercase();
            assert_eq!(name.parse::<Level>(), Ok(level));
            assert_eq!(level.as_str().parse::<Level>(), Ok(level));
        }
    }

    #[test]
    fn test_parse_malformed_level() {
        for s in ["", "trace", "warning", "inf", " info"] {
            assert!(s.parse::<Level>().is_err(), "{s:?} should not parse");
        }
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Error < Level::DPanic);
        assert!(Level::Panic < Level::Fatal);
        assert_eq!(format!("{:>6}", Level::Warn), "  WARN");
    }

    #[test]
    fn test_from_log_level() {
        assert_eq!(Level::from(log::Level::Trace), Level::Debug);
        assert_eq!(Level::from(log::Level::Error), Level::Error);
    }
}
