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

//! Appender for writing log records to a file rotated by size, with backups pruned by count and
//! age.
//!
//! The active file is always `{dir}/{filename}.log`. When a write would push it past the size
//! limit, it is renamed to `{filename}-{timestamp}.log` and a fresh file takes its place.
//!
//! # Example
//!
//!```
//! use rotalog::Level;
//! use rotalog::Logger;
//! use rotalog::append::rolling_file::RollingFile;
//! use rotalog::append::rolling_file::RollingFileWriter;
//!
//! # let dir = tempfile::tempdir().unwrap();
//! let rolling_writer = RollingFileWriter::builder()
//!     .filename("app")
//!     .max_file_size(10 * 1024 * 1024)
//!     .max_backups(5)
//!     .max_age_days(7)
//!     .build(dir.path())
//!     .unwrap();
//!
//! let logger = Logger::builder()
//!     .level(Level::Info)
//!     .append(RollingFile::new(rolling_writer))
//!     .build();
//!
//! logger.info("This log will be written to a rolling file.");
//! ```

pub use append::RollingFile;
pub use rolling::RollingFileWriter;
pub use rolling::RollingFileWriterBuilder;

mod append;
mod rolling;
