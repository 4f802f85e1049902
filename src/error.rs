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

use std::fmt;
use std::io;

/// The error struct of rotalog.
///
/// Carries a message, `key: value` context pairs and the underlying causes.
pub struct Error {
    message: String,
    context: Vec<(&'static str, String)>,
    sources: Vec<anyhow::Error>,
}

impl Error {
    /// Create a new Error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: vec![],
            sources: vec![],
        }
    }

    /// Add one more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Add one more source in error.
    pub fn with_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        self.sources.push(src.into());
        self
    }

    /// The error message, without context and sources.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn from_io_error(err: io::Error) -> Error {
        Error::new("failed to perform io").with_source(err)
    }

    pub(crate) fn from_fmt_error(err: fmt::Error) -> Error {
        Error::new("failed to format record").with_source(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;

        for (i, (k, v)) in self.context.iter().enumerate() {
            let sep = if i == 0 { ", context: { " } else { ", " };
            write!(f, "{sep}{k}: {v}")?;
        }
        if !self.context.is_empty() {
            f.write_str(" }")?;
        }

        for (i, source) in self.sources.iter().enumerate() {
            let sep = if i == 0 { ", sources: [" } else { ", " };
            write!(f, "{sep}{source}")?;
        }
        if !self.sources.is_empty() {
            f.write_str("]")?;
        }

        Ok(())
    }
}

// Multi-line form, used by the stderr reports of failed appends.
impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.message)?;
        for (k, v) in &self.context {
            writeln!(f, "    {k}: {v}")?;
        }
        for source in &self.sources {
            writeln!(f, "    caused by: {source:#}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.sources.first().map(|v| v.as_ref())
    }
}
