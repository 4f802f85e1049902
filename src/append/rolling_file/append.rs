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
use std::sync::Mutex;
use std::sync::MutexGuard;

use crate::Error;
use crate::Layout;
use crate::append::Append;
use crate::append::rolling_file::RollingFileWriter;
use crate::layout::TextLayout;
use crate::record::Record;

/// An appender that writes log records to a size rotated file.
///
/// Every record is written synchronously; concurrent callers are serialized on the writer.
#[derive(Debug)]
pub struct RollingFile {
    layout: Box<dyn Layout>,
    writer: Mutex<RollingFileWriter>,
}

impl RollingFile {
    /// Creates a new [`RollingFile`] appender.
    ///
    /// This appender by default uses [`TextLayout`] to format log records.
    pub fn new(writer: RollingFileWriter) -> Self {
        Self {
            layout: Box::new(TextLayout::default()),
            writer: Mutex::new(writer),
        }
    }

    /// Sets the layout used to format log records.
    pub fn with_layout(mut self, layout: impl Into<Box<dyn Layout>>) -> Self {
        self.layout = layout.into();
        self
    }

    fn writer(&self) -> MutexGuard<'_, RollingFileWriter> {
        // a panic while holding the lock leaves the file usable
        self.writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Append for RollingFile {
    fn append(&self, record: &Record) -> Result<(), Error> {
        let mut bytes = self.layout.format(record)?;
        bytes.push(b'\n');
        self.writer()
            .write_all(&bytes)
            .map_err(Error::from_io_error)?;
        Ok(())
    }

    fn flush(&self) -> Result<(), Error> {
        self.writer().flush().map_err(Error::from_io_error)
    }
}
