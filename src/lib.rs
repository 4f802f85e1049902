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

//! Rotalog is a leveled logging facade that writes every record both to a size rotated log file
//! and to stdout.
//!
//! # Overview
//!
//! A [`Config`] holds the settings (level, log directory, file name, rotation thresholds, caller
//! visibility), usually parsed from the command line. [`Config::build`] turns it into a root
//! [`Logger`] handle. Handles are passed to whatever needs to log; [`Logger::with`] derives a
//! handle carrying key-value fields.
//!
//! The log file is `{path}/{filename}.log`. With the default file name, it is derived from the
//! executable name plus a random suffix, so that several instances can share one directory.
//!
//! # Examples
//!
//! ```
//! use rotalog::Config;
//!
//! # let dir = tempfile::tempdir().unwrap();
//! let logger = Config::default()
//!     .level("debug")
//!     .path(dir.path())
//!     .filename("app")
//!     .build();
//!
//! logger.info("info");
//! logger.with_field("with", "field").debug("withfield debug");
//! rotalog::debug!(logger.with([("just", "with")]), "just with debugf:{}", 2020);
//! ```
//!
//! Records sent through the [`log`] crate can share the same appenders:
//!
//! ```
//! # let dir = tempfile::tempdir().unwrap();
//! let logger = rotalog::Config::default().path(dir.path()).build();
//! logger.apply().unwrap();
//!
//! log::info!("This is an info message.");
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod append;
pub mod filename;
pub mod layout;

mod config;
mod error;
mod kv;
mod level;
mod logger;
mod macros;
mod record;

pub use append::Append;
pub use config::Config;
pub use config::Format;
pub use error::Error;
pub use kv::Field;
pub use kv::Value;
pub use layout::Layout;
pub use level::Level;
pub use level::ParseLevelError;
pub use logger::Builder;
pub use logger::Logger;
pub use record::Record;
pub use record::RecordBuilder;
