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
use std::io::Write;
use std::path::Path;

use rotalog::Level;
use rotalog::Logger;
use rotalog::append::RollingFile;
use rotalog::append::rolling_file::RollingFileWriter;
use tempfile::TempDir;

fn count_log_files(dir: &Path, prefix: &str) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let filename = entry.file_name().to_str()?.to_string();
            if filename.starts_with(prefix) {
                Some(filename)
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
}

#[test]
fn test_backup_count_limit() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let max_backups = 3;

    let mut writer = RollingFileWriter::builder()
        .filename("test_prefix")
        .max_backups(max_backups)
        .max_file_size(100)
        .build(temp_dir.path())
        .unwrap();

    for i in 0..50 {
        let data = format!("Log entry {i:02}: {}\n", "A".repeat(50));
        writer.write_all(data.as_bytes()).unwrap();
        writer.flush().unwrap();
    }

    let files = count_log_files(temp_dir.path(), "test_prefix");
    assert!(
        files.len() <= max_backups + 1,
        "Expected at most {} files, but found {}: {:?}",
        max_backups + 1,
        files.len(),
        files
    );
    assert!(files.contains(&"test_prefix.log".to_string()), "{files:?}");

    // the active file always holds the latest entry
    let active = fs::read_to_string(temp_dir.path().join("test_prefix.log")).unwrap();
    assert!(active.starts_with("Log entry 49: "), "{active}");
}

#[test]
fn test_logger_rotates_its_file() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let writer = RollingFileWriter::builder()
        .filename("app")
        .max_file_size(256)
        .max_backups(2)
        .build(temp_dir.path())
        .unwrap();
    let logger = Logger::builder()
        .level(Level::Info)
        .caller(false)
        .append(RollingFile::new(writer))
        .build();

    for i in 0..40 {
        rotalog::info!(logger, "message number {i}");
    }
    logger.flush();

    let files = count_log_files(temp_dir.path(), "app");
    assert_eq!(files.len(), 3, "{files:?}");
    for file in files {
        let size = fs::metadata(temp_dir.path().join(&file)).unwrap().len();
        assert!(size <= 256, "{file} has {size} bytes");
    }
}

#[test]
fn test_other_files_in_directory_are_kept() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    fs::write(temp_dir.path().join("unrelated.txt"), "keep me").unwrap();
    fs::write(temp_dir.path().join("app-notes.log"), "keep me too").unwrap();

    let mut writer = RollingFileWriter::builder()
        .filename("app")
        .max_file_size(10)
        .max_backups(1)
        .build(temp_dir.path())
        .unwrap();
    for _ in 0..20 {
        writer.write_all(b"0123456789").unwrap();
    }

    assert!(temp_dir.path().join("unrelated.txt").exists());
    assert!(temp_dir.path().join("app-notes.log").exists());
}
