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

use std::fmt::Write;

use jiff::tz::TimeZone;

use crate::Error;
use crate::Layout;
use crate::kv::fields_to_json;
use crate::layout::caller;
use crate::record::Record;

/// A layout that formats log records as tab separated console text.
///
/// Output format:
///
/// ```text
/// 2024-08-11T22:44:57.172+0800	ERROR	src/main.rs:51	Hello error!
/// 2024-08-11T22:44:57.172+0800	WARN	src/main.rs:52	Hello warn!
/// 2024-08-11T22:44:57.172+0800	INFO	src/main.rs:53	Hello info!	{"user":"alice","attempt":3}
/// ```
///
/// The caller column is omitted when the record carries no location. Fields, if any, are
/// appended as a JSON object.
///
/// # Examples
///
/// ```
/// use jiff::tz::TimeZone;
/// use rotalog::layout::TextLayout;
///
/// let text_layout = TextLayout::default().timezone(TimeZone::UTC);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextLayout {
    tz: Option<TimeZone>,
}

impl TextLayout {
    /// Sets the timezone for timestamps.
    ///
    /// Defaults to the system timezone.
    pub fn timezone(mut self, tz: TimeZone) -> Self {
        self.tz = Some(tz);
        self
    }
}

impl Layout for TextLayout {
    fn format(&self, record: &Record) -> Result<Vec<u8>, Error> {
        let tz = self.tz.clone().unwrap_or_else(TimeZone::system);
        let time = record
            .time()
            .to_zoned(tz)
            .strftime("%Y-%m-%dT%H:%M:%S%.3f%z");
        let level = record.level();
        let message = record.args();

        let mut text = String::new();
        match caller(record) {
            Some(caller) => write!(&mut text, "{time}\t{level}\t{caller}\t{message}"),
            None => write!(&mut text, "{time}\t{level}\t{message}"),
        }
        .map_err(Error::from_fmt_error)?;

        let fields = record.fields();
        if !fields.is_empty() {
            let fields = serde_json::Value::Object(fields_to_json(fields));
            write!(&mut text, "\t{fields}").map_err(Error::from_fmt_error)?;
        }

        Ok(text.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;
    use crate::Level;
    use crate::kv::Field;
    use crate::record::RecordBuilder;

    fn format(record: &Record) -> String {
        let bytes = TextLayout::default()
            .timezone(TimeZone::UTC)
            .format(record)
            .unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_format_with_caller() {
        let now: Timestamp = "2024-08-10T12:34:56.789Z".parse().unwrap();
        let record = RecordBuilder::default()
            .time(now)
            .level(Level::Warn)
            .file(Some("crates/app/src/main.rs"))
            .line(Some(12))
            .args(format_args!("disk almost full"))
            .build();
        assert_eq!(
            format(&record),
            "2024-08-10T12:34:56.789+0000\tWARN\tsrc/main.rs:12\tdisk almost full"
        );
    }

    #[test]
    fn test_format_without_caller_with_fields() {
        let now: Timestamp = "2024-08-10T00:00:00.789Z".parse().unwrap();
        let fields = [Field::new("just", "with"), Field::new("year", 2020)];
        let record = RecordBuilder::default()
            .time(now)
            .level(Level::Debug)
            .args(format_args!("just with debugf:2020"))
            .fields(&fields)
            .build();
        assert_eq!(
            format(&record),
            "2024-08-10T00:00:00.789+0000\tDEBUG\tjust with debugf:2020\t{\"just\":\"with\",\"year\":2020}"
        );
    }
}
