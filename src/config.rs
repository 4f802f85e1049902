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

//! Logger settings.

use std::path::Path;
use std::path::PathBuf;

use clap::ArgAction;

use crate::Error;
use crate::Layout;
use crate::Level;
use crate::Logger;
use crate::append::RollingFile;
use crate::append::Stdout;
use crate::append::rolling_file::RollingFileWriter;
use crate::filename::DEFAULT_FILENAME;
use crate::filename::derive_filename;
use crate::layout::JsonLayout;
use crate::layout::TextLayout;

const DEFAULT_SIZE_MB: u64 = 10;
const MEGABYTE: usize = 1024 * 1024;

/// The layout of every emitted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Format {
    /// Tab separated console text, see [`TextLayout`].
    #[default]
    Text,
    /// One JSON object per line, see [`JsonLayout`].
    Json,
}

/// Settings of the process logger.
///
/// `Config` derives [`clap::Args`], so an application can flatten it into its own command line
/// parser and accept `--log.level`, `--log.path` and so on. Every setting also has a setter.
///
/// # Examples
///
/// ```
/// use clap::Parser;
/// use rotalog::Config;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     log: Config,
/// }
///
/// # let dir = tempfile::tempdir().unwrap();
/// # let path = dir.path().to_str().unwrap();
/// let cli = Cli::parse_from(["server", "--log.level", "warn", "--log.path", path]);
/// let logger = cli.log.build();
/// logger.warn("disk almost full");
/// ```
#[derive(Debug, Clone, clap::Args)]
pub struct Config {
    /// log levels: debug/info/warn/error/dpanic/panic/fatal
    #[arg(id = "log.level", long = "log.level", default_value = "info")]
    level: String,

    /// directory of the log file
    #[arg(id = "log.path", long = "log.path", default_value = "/tmp")]
    path: PathBuf,

    /// maximum size in megabytes of the log file before it gets rotated
    #[arg(id = "log.size", long = "log.size", default_value_t = DEFAULT_SIZE_MB)]
    size: u64,

    /// maximum number of old log files to retain
    #[arg(id = "log.backups", long = "log.backups", default_value_t = 5)]
    backups: usize,

    /// maximum number of days to retain old log files, based on the timestamp in their names
    #[arg(id = "log.age", long = "log.age", default_value_t = 7)]
    age: u64,

    /// log file name; "default" derives it from the executable name
    #[arg(id = "log.filename", long = "log.filename", default_value = DEFAULT_FILENAME)]
    filename: String,

    /// log the caller or not
    #[arg(
        id = "log.caller",
        long = "log.caller",
        default_value_t = true,
        action = ArgAction::Set
    )]
    caller: bool,

    /// layout of the log records
    #[arg(id = "log.format", long = "log.format", value_enum, default_value = "text")]
    format: Format,

    /// panic on dpanic records
    #[arg(id = "log.development", long = "log.development")]
    development: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            path: PathBuf::from("/tmp"),
            size: DEFAULT_SIZE_MB,
            backups: 5,
            age: 7,
            filename: DEFAULT_FILENAME.to_string(),
            caller: true,
            format: Format::Text,
            development: false,
        }
    }
}

impl Config {
    /// Set the minimum level, one of debug/info/warn/error/dpanic/panic/fatal.
    ///
    /// The value is only checked by [`Config::try_build`].
    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Set the directory of the log file.
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the maximum size in megabytes of the log file before it gets rotated.
    ///
    /// `0` falls back to the default of 10 megabytes.
    pub fn size(mut self, megabytes: u64) -> Self {
        self.size = megabytes;
        self
    }

    /// Set the maximum number of rotated files to retain. `0` retains all of them.
    pub fn backups(mut self, backups: usize) -> Self {
        self.backups = backups;
        self
    }

    /// Set the maximum number of days to retain rotated files. `0` disables age based pruning.
    pub fn age(mut self, days: u64) -> Self {
        self.age = days;
        self
    }

    /// Set the log file name, without the `.log` extension.
    ///
    /// `"default"` derives the name from the executable, see [`derive_filename`].
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Set whether records carry the source location of the logging call.
    pub fn caller(mut self, caller: bool) -> Self {
        self.caller = caller;
        self
    }

    /// Set the layout of the log records.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Set whether [`Logger::dpanic`] panics after logging.
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// The path of the log file for the given process arguments: `{path}/{derived filename}.log`.
    ///
    /// Each call with the default filename draws a new random suffix.
    pub fn log_file<I, S>(&self, args: I) -> PathBuf
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let filename = derive_filename(args, &self.filename);
        self.path.join(format!("{filename}.log"))
    }

    /// Build the root [`Logger`], writing to the rotated log file and stdout.
    ///
    /// # Errors
    ///
    /// Fails if the level is not recognized, or if the log file cannot be opened.
    pub fn try_build(&self) -> Result<Logger, Error> {
        let args = std::env::args_os().map(|arg| arg.to_string_lossy().into_owned());
        self.try_build_with_args(args)
    }

    /// Build the root [`Logger`], writing to the rotated log file and stdout.
    ///
    /// This should be called once, early in the execution of a program.
    ///
    /// # Panics
    ///
    /// Panics if the level is not recognized, or if the log file cannot be opened.
    pub fn build(&self) -> Logger {
        self.try_build()
            .expect("Config::build should be called with a valid log level and a writable path")
    }

    fn try_build_with_args<I, S>(&self, args: I) -> Result<Logger, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let level = self.level.parse::<Level>().map_err(|err| {
            Error::new("failed to parse log level")
                .with_context("level", &self.level)
                .with_source(err)
        })?;

        let filename = derive_filename(args, &self.filename);
        let writer = self.rolling_writer(&filename, &self.path)?;

        let logger = Logger::builder()
            .level(level)
            .caller(self.caller)
            .development(self.development)
            .append(RollingFile::new(writer).with_layout(self.layout()))
            .append(Stdout::default().with_layout(self.layout()))
            .build();
        Ok(logger)
    }

    fn rolling_writer(&self, filename: &str, dir: &Path) -> Result<RollingFileWriter, Error> {
        let megabytes = if self.size == 0 {
            DEFAULT_SIZE_MB
        } else {
            self.size
        };
        let max_size = usize::try_from(megabytes)
            .unwrap_or(usize::MAX)
            .saturating_mul(MEGABYTE);

        RollingFileWriter::builder()
            .filename(filename)
            .max_file_size(max_size)
            .max_backups(self.backups)
            .max_age_days(self.age)
            .build(dir)
    }

    fn layout(&self) -> Box<dyn Layout> {
        match self.format {
            Format::Text => Box::new(TextLayout::default()),
            Format::Json => Box::new(JsonLayout::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::TempDir;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[command(flatten)]
        log: Config,
    }

    #[test]
    fn test_command_line_defaults() {
        let cli = Cli::parse_from(["server"]);
        let config = cli.log;
        assert_eq!(config.level, "info");
        assert_eq!(config.path, PathBuf::from("/tmp"));
        assert_eq!(config.size, 10);
        assert_eq!(config.backups, 5);
        assert_eq!(config.age, 7);
        assert_eq!(config.filename, DEFAULT_FILENAME);
        assert!(config.caller);
        assert_eq!(config.format, Format::Text);
        assert!(!config.development);
    }

    #[test]
    fn test_command_line_overrides() {
        let cli = Cli::parse_from([
            "server",
            "--log.level",
            "warn",
            "--log.path=/var/log",
            "--log.size=1",
            "--log.backups=2",
            "--log.age=3",
            "--log.filename=app",
            "--log.caller=false",
            "--log.format=json",
            "--log.development",
        ]);
        let config = cli.log;
        assert_eq!(config.level, "warn");
        assert_eq!(config.path, PathBuf::from("/var/log"));
        assert_eq!(config.size, 1);
        assert_eq!(config.backups, 2);
        assert_eq!(config.age, 3);
        assert_eq!(config.filename, "app");
        assert!(!config.caller);
        assert_eq!(config.format, Format::Json);
        assert!(config.development);
    }

    #[test]
    fn test_unrecognized_level_is_accepted_until_build() {
        let cli = Cli::parse_from(["server", "--log.level", "verbose"]);
        assert_eq!(cli.log.level, "verbose");
    }

    #[test]
    fn test_log_file_path() {
        let config = Config::default().filename("app").path("/var/log");
        assert_eq!(
            config.log_file(["/usr/bin/server"]),
            PathBuf::from("/var/log/app.log")
        );

        let derived = Config::default().log_file(["/usr/bin/server"]);
        let name = derived.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("server_") && name.ends_with(".log"), "{name}");
        assert_eq!(name.len(), "server_".len() + 5 + ".log".len());
    }

    #[test]
    fn test_build_every_level() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        for level in ["debug", "info", "warn", "error", "dpanic", "panic", "fatal"] {
            let logger = Config::default()
                .level(level)
                .path(temp_dir.path())
                .filename("app")
                .try_build_with_args(["server"])
                .unwrap();
            assert_eq!(logger.level().as_str().to_ascii_lowercase(), level);
        }
    }

    #[test]
    fn test_build_rejects_unrecognized_level() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let err = Config::default()
            .level("verbose")
            .path(temp_dir.path())
            .try_build_with_args(["server"])
            .unwrap_err();
        assert_eq!(err.message(), "failed to parse log level");
        assert!(err.to_string().contains("level: verbose"), "{err}");
        // nothing is created before the level is validated
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    #[should_panic(expected = "Config::build should be called with a valid log level")]
    fn test_build_panics_on_unrecognized_level() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        Config::default().level("loud").path(temp_dir.path()).build();
    }

    #[test]
    fn test_level_filter_applies_to_file() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let logger = Config::default()
            .level("warn")
            .path(temp_dir.path())
            .filename("app")
            .caller(false)
            .try_build_with_args(["server"])
            .unwrap();

        logger.info("x");
        logger.flush();
        let file = temp_dir.path().join("app.log");
        assert_eq!(fs::read_to_string(&file).unwrap(), "");

        logger.warn("x");
        logger.flush();
        let content = fs::read_to_string(&file).unwrap();
        assert!(content.ends_with("\tWARN\tx\n"), "{content}");
    }

    #[test]
    fn test_json_format() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        let logger = Config::default()
            .path(temp_dir.path())
            .filename("app")
            .format(Format::Json)
            .try_build_with_args(["server"])
            .unwrap();

        logger.with_field("user", "alice").info("login");
        logger.flush();

        let content = fs::read_to_string(temp_dir.path().join("app.log")).unwrap();
        let line: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
        assert_eq!(line["level"], "INFO");
        assert_eq!(line["msg"], "login");
        assert_eq!(line["user"], "alice");
        assert!(line["caller"].as_str().unwrap().starts_with("src/config.rs:"));
    }

    #[test]
    fn test_derived_filename_on_disk() {
        let temp_dir = TempDir::new().expect("failed to create a temporary directory");
        Config::default()
            .path(temp_dir.path())
            .try_build_with_args(["/usr/local/bin/worker"])
            .unwrap()
            .info("hello");

        let names = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("worker_") && names[0].ends_with(".log"), "{names:?}");
    }
}
