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

use std::cmp::Reverse;
use std::fs;
use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use jiff::SignedDuration;
use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

use crate::Error;

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const BACKUP_TIME_PARSE_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.f";
const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Source of rotation timestamps; tests pin it to a fixed instant.
#[derive(Debug)]
enum Clock {
    System,
    #[cfg(test)]
    Fixed(Timestamp),
}

impl Clock {
    fn now(&self) -> Timestamp {
        match self {
            Clock::System => Timestamp::now(),
            #[cfg(test)]
            Clock::Fixed(now) => *now,
        }
    }
}

/// A writer for a size rotated file.
#[derive(Debug)]
pub struct RollingFileWriter {
    state: State,
    writer: File,
}

impl RollingFileWriter {
    /// Creates a new [`RollingFileWriterBuilder`].
    ///
    /// # Examples
    ///
    /// ```
    /// use rotalog::append::rolling_file::RollingFileWriter;
    ///
    /// let builder = RollingFileWriter::builder();
    /// ```
    #[must_use]
    pub fn builder() -> RollingFileWriterBuilder {
        RollingFileWriterBuilder::new()
    }

    /// The path of the active log file.
    pub fn path(&self) -> PathBuf {
        self.state.active_path()
    }
}

impl Write for RollingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = buf.len();
        if len > self.state.max_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "write length {len} exceeds maximum file size {}",
                    self.state.max_size
                ),
            ));
        }

        if self.state.should_rollover(len) {
            self.state.rotate(&mut self.writer)?;
        }

        self.writer
            .write(buf)
            .inspect(|&n| self.state.current_filesize += n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// A builder for configuring [`RollingFileWriter`].
#[derive(Debug)]
pub struct RollingFileWriterBuilder {
    filename: String,
    max_size: usize,
    max_backups: usize,
    max_age_days: u64,
    clock: Clock,
}

impl Default for RollingFileWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RollingFileWriterBuilder {
    /// Creates a new [`RollingFileWriterBuilder`].
    ///
    /// By default the file is never rotated and no backup is ever pruned.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            filename: String::new(),
            max_size: usize::MAX,
            max_backups: 0,
            max_age_days: 0,
            clock: Clock::System,
        }
    }

    /// Sets the base filename; the active file is `{filename}.log`.
    #[must_use]
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Sets the maximum size of the active log file in bytes.
    #[must_use]
    pub fn max_file_size(mut self, n: usize) -> Self {
        self.max_size = n;
        self
    }

    /// Sets the maximum number of rotated files to keep. `0` keeps all of them.
    #[must_use]
    pub fn max_backups(mut self, n: usize) -> Self {
        self.max_backups = n;
        self
    }

    /// Sets the maximum number of days to keep rotated files. `0` disables age based pruning.
    ///
    /// The age of a rotated file is taken from the timestamp encoded in its name.
    #[must_use]
    pub fn max_age_days(mut self, days: u64) -> Self {
        self.max_age_days = days;
        self
    }

    #[cfg(test)]
    fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Builds the [`RollingFileWriter`], creating the directory and opening the active file.
    ///
    /// An existing active file is appended to, and backups left over from earlier runs are pruned
    /// right away.
    pub fn build(self, dir: impl AsRef<Path>) -> Result<RollingFileWriter, Error> {
        let Self {
            filename,
            max_size,
            max_backups,
            max_age_days,
            clock,
        } = self;

        if filename.is_empty() {
            return Err(Error::new("log filename must not be empty"));
        }

        let mut state = State {
            log_dir: dir.as_ref().to_path_buf(),
            filename,
            max_size,
            max_backups,
            max_age_days,
            current_filesize: 0,
            last_backup: None,
            clock,
        };
        let writer = state.open_active().map_err(|err| {
            Error::new("failed to open log file")
                .with_context("path", state.active_path().display())
                .with_source(err)
        })?;
        if let Err(err) = state.prune_backups(state.clock.now()) {
            eprintln!("failed to prune old log files: {err:#}");
        }
        Ok(RollingFileWriter { state, writer })
    }
}

#[derive(Debug)]
struct State {
    log_dir: PathBuf,
    filename: String,
    max_size: usize,
    max_backups: usize,
    max_age_days: u64,
    current_filesize: usize,
    last_backup: Option<Timestamp>,
    clock: Clock,
}

impl State {
    fn active_path(&self) -> PathBuf {
        self.log_dir.join(format!("{}.log", self.filename))
    }

    /// The directory of the active file and its backups. The filename may carry subdirectories
    /// of its own.
    fn file_dir(&self) -> PathBuf {
        match self.active_path().parent() {
            Some(dir) => dir.to_path_buf(),
            None => self.log_dir.clone(),
        }
    }

    fn base_name(&self) -> &str {
        self.filename.rsplit('/').next().unwrap_or(self.filename.as_str())
    }

    fn backup_name(&self, time: Timestamp) -> String {
        let time = time.strftime(BACKUP_TIME_FORMAT);
        format!("{}-{time}.log", self.base_name())
    }

    /// Picks a backup name that is unused and strictly newer than the previous backup, so that
    /// names keep sorting by rotation order even when rotations happen within one millisecond.
    fn backup_path(&mut self, now: Timestamp) -> PathBuf {
        let mut time = match self.last_backup {
            Some(last) if last >= now => next_millisecond(last),
            _ => now,
        };
        let dir = self.file_dir();
        loop {
            let path = dir.join(self.backup_name(time));
            if !path.exists() {
                self.last_backup = Some(time);
                return path;
            }
            let next = next_millisecond(time);
            if next == time {
                return path;
            }
            time = next;
        }
    }

    /// Returns the rotation time of a backup of this file, or `None` for unrelated files.
    fn parse_backup_time(&self, name: &str) -> Option<Timestamp> {
        let time = name
            .strip_prefix(self.base_name())?
            .strip_prefix('-')?
            .strip_suffix(".log")?;
        let time = DateTime::strptime(BACKUP_TIME_PARSE_FORMAT, time).ok()?;
        Some(time.to_zoned(TimeZone::UTC).ok()?.timestamp())
    }

    fn open_active(&mut self) -> anyhow::Result<File> {
        let path = self.active_path();
        fs::create_dir_all(self.file_dir()).context("failed to create log directory")?;
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .context("failed to create log file")?;
        let len = file.metadata().context("failed to stat log file")?.len();
        self.current_filesize = usize::try_from(len).unwrap_or(usize::MAX);
        Ok(file)
    }

    fn should_rollover(&self, len: usize) -> bool {
        self.current_filesize.saturating_add(len) > self.max_size
    }

    fn rotate(&mut self, file: &mut File) -> io::Result<()> {
        if let Err(err) = file.flush() {
            eprintln!("failed to flush previous log file: {err}");
        }

        let now = self.clock.now();
        let backup = self.backup_path(now);
        match fs::rename(self.active_path(), backup) {
            Ok(()) => {}
            // removed behind our back: start over with a fresh file
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(err),
        }
        *file = self.open_active().map_err(io::Error::other)?;

        if let Err(err) = self.prune_backups(now) {
            eprintln!("failed to prune old log files: {err:#}");
        }
        Ok(())
    }

    fn prune_backups(&self, now: Timestamp) -> anyhow::Result<()> {
        if self.max_backups == 0 && self.max_age_days == 0 {
            return Ok(());
        }

        let dir = self.file_dir();
        let read_dir = fs::read_dir(&dir)
            .with_context(|| format!("failed to read log dir: {}", dir.display()))?;

        let mut backups = read_dir
            .filter_map(|entry| {
                let entry = entry.ok()?;
                // the writer only creates files, never touch a dir or symlink
                if !entry.file_type().ok()?.is_file() {
                    return None;
                }
                let filename = entry.file_name();
                let rotated_at = self.parse_backup_time(filename.to_str()?)?;
                Some((entry.path(), rotated_at))
            })
            .collect::<Vec<_>>();

        // newest first
        backups.sort_by_key(|(_, rotated_at)| Reverse(*rotated_at));

        let mut expired = vec![];
        if self.max_age_days > 0 {
            let max_age = i64::try_from(self.max_age_days)
                .unwrap_or(i64::MAX)
                .saturating_mul(MILLIS_PER_DAY);
            let cutoff = now.as_millisecond().saturating_sub(max_age);
            backups.retain(|(path, rotated_at)| {
                let keep = rotated_at.as_millisecond() >= cutoff;
                if !keep {
                    expired.push(path.clone());
                }
                keep
            });
        }
        if self.max_backups > 0 && backups.len() > self.max_backups {
            expired.extend(backups.drain(self.max_backups..).map(|(path, _)| path));
        }

        for path in expired {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove old log file {}", path.display()))?;
        }
        Ok(())
    }
}

fn next_millisecond(time: Timestamp) -> Timestamp {
    time.checked_add(SignedDuration::from_millis(1)).unwrap_or(time)
}
