//! Architectural Enforcement Integration Tests
//!
//! Source scans that keep the workspace honest:
//! - `tips-core` stays free of terminal UI crates
//! - no blocking sleeps in production code (timers go through tokio)
//! - no `unwrap()`/`expect()` outside test modules
//!
//! Each rule reports file and line so a failure points straight at the code.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A forbidden pattern found in production code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File containing the match
    pub path: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// The pattern that matched
    pub pattern: &'static str,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.path.display(), self.line, self.pattern)
    }
}

/// Workspace root, two levels above this crate
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// All `.rs` files under `dir`, sorted
#[must_use]
pub fn rust_sources(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| p.extension().is_some_and(|ext| ext == "rs"))
        .collect();
    files.sort();
    files
}

/// Lines before the first `#[cfg(test)]`, with 1-based numbers
///
/// Test modules sit at the bottom of each file, so everything above the
/// marker is production code.
#[must_use]
pub fn production_lines(source: &str) -> Vec<(usize, &str)> {
    source
        .lines()
        .enumerate()
        .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim_start().starts_with("//"))
        .collect()
}

/// Find `patterns` in the production part of every source file under `dir`
#[must_use]
pub fn scan(dir: &Path, patterns: &[&'static str]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for path in rust_sources(dir) {
        let Ok(source) = fs::read_to_string(&path) else {
            continue;
        };
        for (line, text) in production_lines(&source) {
            for pattern in patterns {
                if text.contains(pattern) {
                    violations.push(Violation {
                        path: path.clone(),
                        line,
                        pattern,
                    });
                }
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_stop_at_tests() {
        let source = "fn a() {}\n// note .unwrap()\nfn b() {}\n#[cfg(test)]\nmod tests {}\n";
        let lines = production_lines(source);

        assert_eq!(lines, vec![(1, "fn a() {}"), (3, "fn b() {}")]);
    }
}
