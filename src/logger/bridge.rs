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

use crate::Level;
use crate::Logger;
use crate::kv::Field;
use crate::kv::Value;
use crate::record::RecordBuilder;

impl Logger {
    /// Set up this handle as the global logger of the [`log`] crate, so that `log::info!` and
    /// friends go through the same appenders.
    ///
    /// `log` records at `Trace` are emitted as [`Level::Debug`]; their key-values are appended to
    /// the fields of this handle.
    ///
    /// # Errors
    ///
    /// An error is returned if the global logger has already been set.
    pub fn apply(&self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(self.level().to_log_filter());
        Ok(())
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        Logger::enabled(self, metadata.level().into())
    }

    fn log(&self, record: &log::Record) {
        let level = Level::from(record.level());
        if !Logger::enabled(self, level) {
            return;
        }

        struct KeyValueVisitor {
            fields: Vec<Field>,
        }

        impl<'kvs> log::kv::VisitSource<'kvs> for KeyValueVisitor {
            fn visit_pair(
                &mut self,
                key: log::kv::Key<'kvs>,
                value: log::kv::Value<'kvs>,
            ) -> Result<(), log::kv::Error> {
                self.fields
                    .push(Field::new(key.as_str().to_owned(), Value::display(value)));
                Ok(())
            }
        }

        let mut visitor = KeyValueVisitor {
            fields: self.fields().to_vec(),
        };
        // collecting into a vec never fails
        let _ = record.key_values().visit(&mut visitor);

        let dispatch = self.dispatch();
        let (file, line) = if dispatch.caller() {
            (record.file(), record.line())
        } else {
            (None, None)
        };
        let record = RecordBuilder::default()
            .level(level)
            .args(*record.args())
            .file(file)
            .line(line)
            .fields(&visitor.fields)
            .build();
        dispatch.log(&record);
    }

    fn flush(&self) {
        Logger::flush(self);
    }
}
