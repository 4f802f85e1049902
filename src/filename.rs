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

//! Log file naming.

use rand::Rng;

/// The base filename meaning "derive the name from the running executable".
pub const DEFAULT_FILENAME: &str = "default";

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Derive the base name of the log file, without the `.log` extension.
///
/// If `filename` is [`DEFAULT_FILENAME`], the name is the last `/` separated segment of the first
/// argument (the invoking executable) followed by a [`random_suffix`], so that several instances
/// of one executable can share a log directory. Any other `filename` is returned verbatim.
///
/// With no argument at all, `filename` is returned unchanged.
///
/// # Examples
///
/// ```
/// use rotalog::filename::derive_filename;
///
/// assert_eq!(derive_filename(["/usr/bin/server"], "app"), "app");
///
/// let derived = derive_filename(["/usr/bin/server"], "default");
/// assert!(derived.starts_with("server_"));
/// assert_eq!(derived.len(), "server_".len() + 5);
/// ```
pub fn derive_filename<I, S>(args: I, filename: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if filename != DEFAULT_FILENAME {
        return filename.to_string();
    }

    let Some(program) = args.into_iter().next() else {
        return filename.to_string();
    };
    let program = program.as_ref();
    let name = program.rsplit('/').next().unwrap_or(program);
    format!("{name}{}", random_suffix())
}

/// An underscore followed by 5 random lowercase hexadecimal digits.
pub fn random_suffix() -> String {
    let mut rng = rand::rng();
    let mut suffix = String::with_capacity(6);
    suffix.push('_');
    for _ in 0..5 {
        suffix.push(char::from(HEX_DIGITS[rng.random_range(0..HEX_DIGITS.len())]));
    }
    suffix
}
