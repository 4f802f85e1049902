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

use std::fs;

use rotalog::Config;
use tempfile::TempDir;

#[test]
fn test_log_crate_records_reach_the_file() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let logger = Config::default()
        .level("debug")
        .path(temp_dir.path())
        .filename("bridge")
        .build()
        .with_field("service", "api");
    logger.apply().unwrap();

    log::trace!("trace becomes debug");
    log::info!(user = "alice"; "logged in");
    log::logger().flush();

    let content = fs::read_to_string(temp_dir.path().join("bridge.log")).unwrap();
    let lines = content.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2, "{content}");

    let columns = lines[0].split('\t').collect::<Vec<_>>();
    assert_eq!(columns[1], "DEBUG");
    assert!(columns[2].starts_with("tests/log_bridge.rs:"), "{}", lines[0]);
    assert_eq!(columns[3], "trace becomes debug");

    assert!(
        lines[1].ends_with("\tlogged in\t{\"service\":\"api\",\"user\":\"alice\"}"),
        "{}",
        lines[1]
    );

    // the global logger is set only once
    assert!(logger.apply().is_err());
}
