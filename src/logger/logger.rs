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

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::Level;
use crate::kv::Field;
use crate::kv::Value;
use crate::logger::Builder;
use crate::logger::dispatch::Dispatch;
use crate::record::RecordBuilder;

/// A handle to a configured logger.
///
/// Handles are cheap to clone and share one immutable set of appenders. [`Logger::with`] derives
/// a new handle carrying extra fields; the parent handle is left untouched.
///
/// Every logging method captures its call site, so a direct call and a call through a derived
/// handle report the same location when issued from the same line.
///
/// # Examples
///
/// ```
/// use rotalog::Level;
/// use rotalog::Logger;
/// use rotalog::append::Testing;
///
/// let captured = Testing::default();
/// let logger = Logger::builder()
///     .level(Level::Debug)
///     .append(captured.clone())
///     .build();
///
/// logger.info("info");
/// logger.with_field("with", "field").debug("withfield debug");
/// rotalog::debug!(logger.with([("just", "with")]), "just with debugf:{}", 2020);
///
/// assert_eq!(captured.lines().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Logger {
    dispatch: Arc<Dispatch>,
    fields: Arc<[Field]>,
}

macro_rules! leveled {
    ($(#[$doc:meta] $level:ident => $msg:ident, $fmt:ident;)+) => {
        $(
            #[$doc]
            #[track_caller]
            pub fn $msg(&self, msg: impl fmt::Display) {
                self.write(Level::$level, format_args!("{msg}"), Location::caller());
            }

            #[$doc]
            ///
            /// Takes pre-formatted arguments, see also the macro of the same level.
            #[track_caller]
            pub fn $fmt(&self, args: fmt::Arguments<'_>) {
                self.write(Level::$level, args, Location::caller());
            }
        )+
    };
}

impl Logger {
    /// Create a new [`Builder`].
    pub fn builder() -> Builder<false> {
        Builder::new()
    }

    pub(super) fn new(dispatch: Arc<Dispatch>) -> Self {
        Self {
            dispatch,
            fields: Arc::new([]),
        }
    }

    /// The minimum level of emitted records.
    pub fn level(&self) -> Level {
        self.dispatch.level()
    }

    /// Whether a record at `level` would be emitted.
    pub fn enabled(&self, level: Level) -> bool {
        self.dispatch.enabled(level)
    }

    /// The fields attached to this handle, in insertion order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Derive a handle that attaches `fields` to every record, after the fields this handle
    /// already carries.
    ///
    /// ```
    /// use rotalog::Field;
    /// # let logger = rotalog::Logger::builder().append(rotalog::append::Testing::default()).build();
    ///
    /// let request = logger.with([Field::new("method", "GET"), Field::new("status", 200)]);
    /// let request = request.with([("path", "/index.html")]);
    /// assert_eq!(request.fields().len(), 3);
    /// ```
    pub fn with<I>(&self, fields: I) -> Logger
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let fields = self
            .fields
            .iter()
            .cloned()
            .chain(fields.into_iter().map(Into::into))
            .collect();

        Logger {
            dispatch: self.dispatch.clone(),
            fields,
        }
    }

    /// Derive a handle that attaches one more field to every record.
    pub fn with_field(
        &self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Value>,
    ) -> Logger {
        self.with([Field::new(key, value)])
    }

    /// Log a message at `level`.
    ///
    /// [`Level::DPanic`], [`Level::Panic`] and [`Level::Fatal`] keep their terminating behavior,
    /// see [`Logger::dpanic`], [`Logger::panic`] and [`Logger::fatal`].
    #[track_caller]
    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        let location = Location::caller();
        match level {
            Level::DPanic => self.dpanic_at(args, location),
            Level::Panic => self.panic_at(args, location),
            Level::Fatal => self.fatal_at(args, location),
            _ => self.write(level, args, location),
        }
    }

    leveled! {
        /// Log a message at the debug level.
        Debug => debug, debugf;
        /// Log a message at the info level.
        Info => info, infof;
        /// Log a message at the warn level.
        Warn => warn, warnf;
        /// Log a message at the error level.
        Error => error, errorf;
    }

    /// Log a message at the dpanic level. In development mode, the logger then panics.
    #[track_caller]
    pub fn dpanic(&self, msg: impl fmt::Display) {
        self.dpanic_at(format_args!("{msg}"), Location::caller());
    }

    /// Log a message at the dpanic level. In development mode, the logger then panics.
    #[track_caller]
    pub fn dpanicf(&self, args: fmt::Arguments<'_>) {
        self.dpanic_at(args, Location::caller());
    }

    /// Log a message at the panic level, flush, then panic with the message.
    ///
    /// The panic happens even if the panic level is filtered out.
    #[track_caller]
    pub fn panic(&self, msg: impl fmt::Display) -> ! {
        self.panic_at(format_args!("{msg}"), Location::caller())
    }

    /// Log a message at the panic level, flush, then panic with the message.
    #[track_caller]
    pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
        self.panic_at(args, Location::caller())
    }

    /// Log a message at the fatal level, flush, then exit the process with status 1.
    #[track_caller]
    pub fn fatal(&self, msg: impl fmt::Display) -> ! {
        self.fatal_at(format_args!("{msg}"), Location::caller())
    }

    /// Log a message at the fatal level, flush, then exit the process with status 1.
    #[track_caller]
    pub fn fatalf(&self, args: fmt::Arguments<'_>) -> ! {
        self.fatal_at(args, Location::caller())
    }

    /// Flush every appender.
    pub fn flush(&self) {
        self.dispatch.flush();
    }

    fn dpanic_at(&self, args: fmt::Arguments<'_>, location: &Location<'_>) {
        self.write(Level::DPanic, args, location);
        if self.dispatch.development() {
            self.flush();
            panic!("{args}");
        }
    }

    fn panic_at(&self, args: fmt::Arguments<'_>, location: &Location<'_>) -> ! {
        self.write(Level::Panic, args, location);
        self.flush();
        panic!("{args}");
    }

    fn fatal_at(&self, args: fmt::Arguments<'_>, location: &Location<'_>) -> ! {
        self.write(Level::Fatal, args, location);
        self.flush();
        std::process::exit(1);
    }

    fn write(&self, level: Level, args: fmt::Arguments<'_>, location: &Location<'_>) {
        if !self.dispatch.enabled(level) {
            return;
        }

        let (file, line) = if self.dispatch.caller() {
            (Some(location.file()), Some(location.line()))
        } else {
            (None, None)
        };
        let record = RecordBuilder::default()
            .level(level)
            .args(args)
            .file(file)
            .line(line)
            .fields(&self.fields)
            .build();
        self.dispatch.log(&record);
    }

    pub(super) fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::append::Testing;

    fn logger(level: Level, caller: bool) -> (Logger, Testing) {
        let captured = Testing::default();
        let logger = Logger::builder()
            .level(level)
            .caller(caller)
            .append(captured.clone())
            .build();
        (logger, captured)
    }

    fn columns(line: &str) -> Vec<&str> {
        line.split('\t').collect()
    }

    #[test]
    fn test_level_filter() {
        let (logger, captured) = logger(Level::Warn, true);
        logger.debug("x");
        logger.info("x");
        logger.warn("x");
        logger.error("x");
        logger.dpanic("x");

        let levels = captured
            .lines()
            .iter()
            .map(|line| columns(line)[1].to_string())
            .collect::<Vec<_>>();
        assert_eq!(levels, vec!["WARN", "ERROR", "DPANIC"]);
        assert!(!logger.enabled(Level::Info));
        assert!(logger.enabled(Level::Fatal));
    }

    #[test]
    fn test_direct_and_chained_calls_report_same_caller() {
        let (logger, captured) = logger(Level::Debug, true);

        #[rustfmt::skip]
        let line = { logger.info("direct"); logger.with_field("k", "v").info("chained"); crate::info!(logger, "macro"); line!() };

        let expected = format!("logger/logger.rs:{line}");
        let lines = captured.lines();
        assert_eq!(lines.len(), 3);
        for line in &lines {
            assert_eq!(columns(line)[2], expected, "{line}");
        }
    }

    #[test]
    fn test_hidden_caller() {
        let (logger, captured) = logger(Level::Debug, false);
        logger.infof(format_args!("answer={}", 42));
        logger.with_field("k", 1).warn("chained");

        let lines = captured.lines();
        assert_eq!(columns(&lines[0])[1..], ["INFO", "answer=42"]);
        assert_eq!(columns(&lines[1])[1..], ["WARN", "chained", r#"{"k":1}"#]);
    }

    #[test]
    fn test_with_chains_fields() {
        let (logger, captured) = logger(Level::Debug, false);
        let child = logger.with([("a", 1)]).with_field("b", "two");
        child.debug("child");
        logger.debug("parent");

        assert_eq!(child.fields().len(), 2);
        assert!(logger.fields().is_empty());
        let lines = captured.lines();
        assert!(lines[0].ends_with("\tchild\t{\"a\":1,\"b\":\"two\"}"), "{}", lines[0]);
        assert!(lines[1].ends_with("\tparent"), "{}", lines[1]);
    }

    #[test]
    fn test_log_dispatches_by_level() {
        let (logger, captured) = logger(Level::Info, false);
        logger.log(Level::Error, format_args!("via log"));
        logger.log(Level::DPanic, format_args!("not in development"));
        assert_eq!(captured.lines().len(), 2);
    }

    #[test]
    #[should_panic(expected = "boom 7")]
    fn test_panic_logs_then_panics() {
        let (logger, _captured) = logger(Level::Info, false);
        logger.panicf(format_args!("boom {}", 7));
    }

    #[test]
    fn test_panic_is_logged_before_unwinding() {
        let (logger, captured) = logger(Level::Info, false);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            logger.panic("going down");
        }));
        assert!(result.is_err());
        assert_eq!(columns(&captured.lines()[0])[1..], ["PANIC", "going down"]);
    }

    #[test]
    #[should_panic(expected = "development only")]
    fn test_dpanic_panics_in_development() {
        let captured = Testing::default();
        let logger = Logger::builder()
            .development(true)
            .append(captured)
            .build();
        logger.dpanic("development only");
    }
}
