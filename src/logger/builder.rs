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

use crate::Append;
use crate::Level;
use crate::Logger;
use crate::logger::dispatch::Dispatch;

/// A builder for configuring a [`Logger`]. See also [`Logger::builder`].
///
/// * `READY=false`: The initialized state. You can configure the level and the caller visibility,
///   and add [`Append`]s. Once at least one append is configured, the builder transits to
///   `READY=true`.
/// * `READY=true`: The builder can be [built][Builder::build] into a [`Logger`].
///
/// ## Examples
///
/// ```rust
/// use rotalog::Level;
/// use rotalog::Logger;
/// use rotalog::append;
///
/// let logger = Logger::builder()
///     // .build()  CANNOT COMPILE: a logger without Append
///     .level(Level::Warn)
///     .append(append::Stdout::default())
///     .build();
///
/// logger.warn("low disk space");
/// ```
#[must_use = "call `build` to construct the logger"]
#[derive(Debug)]
pub struct Builder<const READY: bool = true> {
    appends: Vec<Box<dyn Append>>,
    level: Level,
    caller: bool,
    development: bool,
}

impl Default for Builder<false> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<false> {
    /// Create a new empty [`Builder`] with level [`Level::Info`] and the caller visible.
    pub fn new() -> Self {
        Self {
            appends: vec![],
            level: Level::Info,
            caller: true,
            development: false,
        }
    }
}

impl<const READY: bool> Builder<READY> {
    /// Add an [`Append`]. Every record passing the level filter is sent to every append.
    pub fn append(mut self, append: impl Append) -> Builder<true> {
        self.appends.push(Box::new(append));

        Builder {
            appends: self.appends,
            level: self.level,
            caller: self.caller,
            development: self.development,
        }
    }

    /// Set the minimum level of emitted records.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set whether records carry the source location of the logging call.
    pub fn caller(mut self, caller: bool) -> Self {
        self.caller = caller;
        self
    }

    /// Set whether [`Logger::dpanic`] panics after logging.
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }
}

impl Builder<true> {
    /// Construct the root [`Logger`] handle.
    pub fn build(self) -> Logger {
        let dispatch = Dispatch::new(self.level, self.caller, self.development, self.appends);
        Logger::new(Arc::new(dispatch))
    }
}
