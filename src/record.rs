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

//! Log record.

use std::fmt;

use jiff::Timestamp;

use crate::Level;
use crate::kv::Field;

/// The payload of a log message.
#[derive(Clone, Debug)]
pub struct Record<'a> {
    // the observed time
    now: Timestamp,

    level: Level,

    // the call site, absent when caller visibility is off
    file: Option<&'a str>,
    line: Option<u32>,

    // the payload
    args: fmt::Arguments<'a>,

    // structural logging
    fields: &'a [Field],
}

impl<'a> Record<'a> {
    /// The observed time.
    pub fn time(&self) -> Timestamp {
        self.now
    }

    /// The verbosity level of the message.
    pub fn level(&self) -> Level {
        self.level
    }

    /// The source file containing the message.
    pub fn file(&self) -> Option<&'a str> {
        self.file
    }

    /// The line containing the message.
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// The message body.
    pub fn args(&self) -> &fmt::Arguments<'a> {
        &self.args
    }

    /// The fields attached to the logger that emitted this record.
    pub fn fields(&self) -> &'a [Field] {
        self.fields
    }
}

/// Builder for [`Record`].
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    record: Record<'a>,
}

impl Default for RecordBuilder<'_> {
    fn default() -> Self {
        RecordBuilder {
            record: Record {
                now: Timestamp::now(),
                level: Level::Info,
                file: None,
                line: None,
                args: format_args!(""),
                fields: &[],
            },
        }
    }
}

impl<'a> RecordBuilder<'a> {
    /// Set [`args`](Record::args).
    pub fn args(mut self, args: fmt::Arguments<'a>) -> Self {
        self.record.args = args;
        self
    }

    /// Set [`level`](Record::level).
    pub fn level(mut self, level: Level) -> Self {
        self.record.level = level;
        self
    }

    /// Set [`time`](Record::time).
    pub fn time(mut self, now: Timestamp) -> Self {
        self.record.now = now;
        self
    }

    /// Set [`file`](Record::file).
    pub fn file(mut self, file: Option<&'a str>) -> Self {
        self.record.file = file;
        self
    }

    /// Set [`line`](Record::line).
    pub fn line(mut self, line: Option<u32>) -> Self {
        self.record.line = line;
        self
    }

    /// Set [`fields`](Record::fields).
    pub fn fields(mut self, fields: &'a [Field]) -> Self {
        self.record.fields = fields;
        self
    }

    /// Invoke the builder and return a `Record`
    pub fn build(self) -> Record<'a> {
        self.record
    }
}
