//! Test helpers for the process-lifecycle suites

use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

use phantomiis::LogSink;

/// Install an executable `/bin/sh` script in `dir` and return its path.
pub fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.path().join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Log sink that records forwarded lines for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn forward(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}
