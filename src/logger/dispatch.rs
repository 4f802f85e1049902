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

use std::io::Write;

use crate::Append;
use crate::Error;
use crate::Level;
use crate::record::Record;

/// The shared, immutable part of every [`Logger`](crate::Logger) handle.
///
/// `appends` receive every record at or above `level`; there is no per-appender filtering.
#[derive(Debug)]
pub(super) struct Dispatch {
    level: Level,
    caller: bool,
    development: bool,
    appends: Vec<Box<dyn Append>>,
}

impl Dispatch {
    pub(super) fn new(
        level: Level,
        caller: bool,
        development: bool,
        appends: Vec<Box<dyn Append>>,
    ) -> Self {
        debug_assert!(!appends.is_empty(), "A Dispatch must have at least one append");

        Self {
            level,
            caller,
            development,
            appends,
        }
    }

    pub(super) fn level(&self) -> Level {
        self.level
    }

    pub(super) fn caller(&self) -> bool {
        self.caller
    }

    pub(super) fn development(&self) -> bool {
        self.development
    }

    pub(super) fn enabled(&self, level: Level) -> bool {
        level >= self.level
    }

    pub(super) fn log(&self, record: &Record) {
        for append in &self.appends {
            if let Err(err) = append.append(record) {
                handle_log_error(record, err);
            }
        }
    }

    pub(super) fn flush(&self) {
        for append in &self.appends {
            if let Err(err) = append.flush() {
                handle_flush_error(err);
            }
        }
    }
}

impl Drop for Dispatch {
    fn drop(&mut self) {
        self.flush();
    }
}

fn log_error_report(record: &Record, error: &Error) -> String {
    format!(
        r###"
Error performing logging.
    Attempted to log: {args}
    Record: {record:?}
    Error: {error:?}
"###,
        args = record.args(),
    )
}

fn flush_error_report(error: &Error) -> String {
    format!(
        r###"
Error performing flush.
    Error: {error:?}
"###,
    )
}

fn handle_log_error(record: &Record, error: Error) {
    let report = log_error_report(record, &error);
    let Err(fallback_error) = std::io::stderr().write_all(report.as_bytes()) else {
        return;
    };

    panic!(
        r###"
Error performing stderr logging after error occurred during regular logging.
    Attempted to log: {args}
    Record: {record:?}
    Error: {error:?}
    Fallback error: {fallback_error}
"###,
        args = record.args(),
    );
}

fn handle_flush_error(error: Error) {
    let report = flush_error_report(&error);
    let Err(fallback_error) = std::io::stderr().write_all(report.as_bytes()) else {
        return;
    };

    panic!(
        r###"
Error performing stderr logging after error occurred during regular flush.
    Error: {error:?}
    Fallback error: {fallback_error}
"###,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordBuilder;

    #[test]
    fn test_error_reports() {
        let error = Error::new("disk full");
        let record = RecordBuilder::default()
            .level(Level::Warn)
            .args(format_args!("dropped"))
            .build();

        let report = log_error_report(&record, &error);
        assert!(report.starts_with("\nError performing logging.\n"), "{report}");
        assert!(report.contains("    Attempted to log: dropped\n"), "{report}");
        assert!(report.contains("    Error: disk full\n"), "{report}");

        let report = flush_error_report(&error);
        assert!(report.starts_with("\nError performing flush.\n"), "{report}");
    }
}
