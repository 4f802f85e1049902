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

use std::fmt::Arguments;

use jiff::Zoned;
use jiff::tz::TimeZone;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::Error;
use crate::Layout;
use crate::kv::fields_to_json;
use crate::layout::caller;
use crate::record::Record;

/// A JSON layout for formatting log records.
///
/// Output format:
///
/// ```json
/// {"ts":"2024-08-11T22:44:57.172+08:00","level":"ERROR","caller":"src/main.rs:51","msg":"Hello error!"}
/// {"ts":"2024-08-11T22:44:57.172+08:00","level":"INFO","caller":"src/main.rs:53","msg":"Hello info!","user":"alice"}
/// ```
///
/// # Examples
///
/// ```
/// use rotalog::layout::JsonLayout;
///
/// let json_layout = JsonLayout::default();
/// ```
#[derive(Default, Debug, Clone)]
pub struct JsonLayout {
    tz: Option<TimeZone>,
}

impl JsonLayout {
    /// Sets the timezone for timestamps.
    ///
    /// # Examples
    ///
    /// ```
    /// use jiff::tz::TimeZone;
    /// use rotalog::layout::JsonLayout;
    ///
    /// let json_layout = JsonLayout::default().timezone(TimeZone::UTC);
    /// ```
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

#[derive(Debug, Clone, Serialize)]
struct RecordLine<'a> {
    #[serde(serialize_with = "serialize_time_zone")]
    ts: Zoned,
    level: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caller: Option<String>,
    #[serde(serialize_with = "serialize_args")]
    msg: &'a Arguments<'a>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

fn serialize_time_zone<S>(timestamp: &Zoned, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&timestamp.strftime("%Y-%m-%dT%H:%M:%S%.3f%:z"))
}

fn serialize_args<S>(args: &Arguments, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(args)
}

impl Layout for JsonLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let tz = self.tz.clone().unwrap_or_else(TimeZone::system);
        let record_line = RecordLine {
            ts: record.time().to_zoned(tz),
            level: record.level().as_str(),
            caller: caller(record),
            msg: record.args(),
            fields: fields_to_json(record.fields()),
        };

        serde_json::to_vec(&record_line)
            .map_err(|err| Error::new("failed to serialize record").with_source(err))
    }
}
