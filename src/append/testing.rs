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

use std::sync::Arc;
use std::sync::Mutex;

use crate::Error;
use crate::Layout;
use crate::append::Append;
use crate::layout::TextLayout;
use crate::record::Record;

/// An appender that keeps formatted log records in memory so tests can assert on them.
///
/// Clones share the same buffer: keep one clone and hand the other to the logger.
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
///     .level(Level::Info)
///     .append(captured.clone())
///     .build();
///
/// logger.info("hello");
/// assert!(captured.lines()[0].ends_with("hello"));
/// ```
#[derive(Debug, Clone)]
pub struct Testing {
    layout: Arc<dyn Layout>,
    lines: Arc<Mutex<Vec<String>>>,
}

impl Default for Testing {
    fn default() -> Self {
        Self {
            layout: Arc::new(TextLayout::default()),
            lines: Arc::default(),
        }
    }
}

impl Testing {
    /// Sets the layout for the [`Testing`] appender.
    pub fn with_layout(mut self, layout: impl Layout) -> Self {
        self.layout = Arc::new(layout);
        self
    }

    /// Returns every line captured so far.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Append for Testing {
    fn append(&self, record: &Record) -> Result<(), Error> {
        let bytes = self.layout.format(record)?;
        let line = String::from_utf8_lossy(&bytes).into_owned();
        let mut lines = self
            .lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        lines.push(line);
        Ok(())
    }
}
