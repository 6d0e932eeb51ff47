//! Summaries over a tree of per-example result directories.
//!
//! Layout expected under the root:
//!
//! ```text
//! <root>/.../<domain>/<example_id>/result.txt
//! <root>/.../<domain>/<example_id>/debug/error.txt
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::episode::result::{DEBUG_DIR, ERROR_MARKER, RESULT_FILE};

/// Score read from one example directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleScore {
    pub domain: String,
    pub example_id: String,
    pub score: f64,
    pub path: PathBuf,
}

/// Aggregate figures for one domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainSummary {
    pub examples: usize,
    pub successes: usize,
    pub mean_score: f64,
}

/// Aggregate figures for a whole results tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsSummary {
    /// Examples with a readable `result.txt`.
    pub total: usize,
    /// Examples scoring above zero.
    pub successes: usize,
    /// Mean score over `total`; 0.0 when empty.
    pub mean_score: f64,
    /// Conversational runs whose result was withheld by an error marker.
    pub suppressed: usize,
    pub domains: BTreeMap<String, DomainSummary>,
    pub examples: Vec<ExampleScore>,
}

impl ResultsSummary {
    /// Success rate in percent.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.successes as f64 / self.total as f64 * 100.0
        }
    }
}

/// Walks `root` and summarizes every example directory found.
pub fn summarize_results(root: impl AsRef<Path>) -> std::io::Result<ResultsSummary> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("results directory {} does not exist", root.display()),
        ));
    }

    let mut summary = ResultsSummary::default();

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_dir())
    {
        let dir = entry.path();
        let result_path = dir.join(RESULT_FILE);

        if result_path.is_file() {
            match read_score(&result_path) {
                Some(score) => summary.examples.push(ExampleScore {
                    domain: domain_of(dir),
                    example_id: file_name(dir),
                    score,
                    path: dir.to_path_buf(),
                }),
                None => warn!("Skipping unreadable score in {}", result_path.display()),
            }
        } else if dir.join(DEBUG_DIR).join(ERROR_MARKER).is_file() {
            debug!("Result withheld for {}", dir.display());
            summary.suppressed += 1;
        }
    }

    for example in &summary.examples {
        let domain = summary.domains.entry(example.domain.clone()).or_default();
        domain.examples += 1;
        domain.mean_score += example.score;
        if example.score > 0.0 {
            domain.successes += 1;
        }
    }
    for domain in summary.domains.values_mut() {
        domain.mean_score /= domain.examples as f64;
    }

    summary.total = summary.examples.len();
    summary.successes = summary.examples.iter().filter(|e| e.score > 0.0).count();
    if summary.total > 0 {
        summary.mean_score =
            summary.examples.iter().map(|e| e.score).sum::<f64>() / summary.total as f64;
    }

    Ok(summary)
}

fn read_score(path: &Path) -> Option<f64> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn domain_of(example_dir: &Path) -> String {
    example_dir
        .parent()
        .map(file_name)
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_example(root: &Path, domain: &str, id: &str, content: &str) {
        let dir = root.join(domain).join(id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(RESULT_FILE), content).unwrap();
    }

    #[test]
    fn test_summarize_results() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write_example(root, "chrome", "a", "1.0\n");
        write_example(root, "chrome", "b", "0.0\n");
        write_example(root, "notepad", "c", "0.5\n");

        let summary = summarize_results(root).unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.successes, 2);
        assert!((summary.mean_score - 0.5).abs() < f64::EPSILON);
        assert_eq!(summary.domains["chrome"].examples, 2);
        assert_eq!(summary.domains["chrome"].successes, 1);
        assert!((summary.domains["notepad"].mean_score - 0.5).abs() < f64::EPSILON);
        assert!((summary.success_rate() - 200.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_counts_suppressed_and_skips_garbage() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        write_example(root, "vscode", "ok", "0.75\n");
        write_example(root, "vscode", "garbage", "not a number\n");

        let suppressed = root.join("vscode").join("failed").join(DEBUG_DIR);
        fs::create_dir_all(&suppressed).unwrap();
        fs::write(suppressed.join(ERROR_MARKER), "boom").unwrap();

        let summary = summarize_results(root).unwrap();
        assert_eq!(summary.total, 1);
        assert_eq!(summary.suppressed, 1);
        assert_eq!(summary.examples[0].example_id, "ok");
        assert_eq!(summary.examples[0].domain, "vscode");
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        assert!(summarize_results(temp.path().join("nope")).is_err());
    }

    #[test]
    fn test_empty_tree() {
        let temp = TempDir::new().unwrap();
        let summary = summarize_results(temp.path()).unwrap();
        assert_eq!(summary.total, 0);
        assert_eq!(summary.success_rate(), 0.0);
    }
}
