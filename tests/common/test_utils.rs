#![allow(dead_code)]

use rand::{Rng, distr::Alphanumeric};
use std::{fs, path::PathBuf};

/// Temporary key file that is removed when dropped
pub struct TestFile {
    path: PathBuf,
}

impl TestFile {
    /// Writes `lines` joined by newlines to a file named after the test
    pub fn with_lines(test_name: &str, lines: &[&str]) -> Self {
        Self::with_bytes(test_name, lines.join("\n").as_bytes())
    }

    pub fn with_bytes(test_name: &str, contents: &[u8]) -> Self {
        let path = std::env::temp_dir().join(format!(
            "bloomcheck_{}_{}.txt",
            test_name,
            std::process::id()
        ));
        fs::write(&path, contents).expect("Failed to write test file");
        Self { path }
    }

    pub fn path(&self) -> PathBuf {
        self.path.clone()
    }
}

impl Drop for TestFile {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

// Consistent, distinct keys sharing a prefix
pub fn generate_test_items(prefix: &str, count: usize) -> Vec<Vec<u8>> {
    (0..count)
        .map(|i| format!("{prefix}_{i:06}").into_bytes())
        .collect()
}

pub fn generate_random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
