//! Episode outcomes and their on-disk form.
//!
//! Each example owns a result directory:
//!
//! ```text
//! <result_dir>/
//!   result.txt        "<score>\n"
//!   time_taken.txt    "<minutes> minutes\n"   (conversational runs)
//!   debug/error.txt   failure marker left by conversational agents
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use super::agent::ExecutionMode;

/// Score file name.
pub const RESULT_FILE: &str = "result.txt";
/// Elapsed-time file name.
pub const TIME_TAKEN_FILE: &str = "time_taken.txt";
/// Debug directory name under the result directory.
pub const DEBUG_DIR: &str = "debug";
/// Failure marker name under the debug directory.
pub const ERROR_MARKER: &str = "error.txt";

/// Summary of one finished episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeOutcome {
    /// Mode the episode ran in.
    pub mode: ExecutionMode,
    /// Evaluator score.
    pub score: f64,
    /// Wall-clock time from the episode start time to evaluation.
    pub elapsed: Duration,
    /// Outer-loop iterations consumed (stepwise mode only, else 0).
    pub steps: usize,
    /// Whether the environment reported completion (stepwise mode only).
    pub done: bool,
    /// Whether `result.txt` was written.
    pub result_persisted: bool,
}

/// Returns the debug directory for a result directory.
pub fn debug_path(result_dir: &Path) -> PathBuf {
    result_dir.join(DEBUG_DIR)
}

/// Returns true if a conversational agent left a failure marker.
pub async fn has_error_marker(debug_path: &Path) -> bool {
    fs::try_exists(debug_path.join(ERROR_MARKER))
        .await
        .unwrap_or(false)
}

/// Formats a score as its shortest round-trip decimal, keeping a trailing
/// `.0` for integral values.
pub fn format_score(score: f64) -> String {
    if score.is_nan() {
        "nan".to_string()
    } else if score == f64::INFINITY {
        "inf".to_string()
    } else if score == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:?}", score)
    }
}

/// Formats elapsed time as whole seconds converted to minutes.
pub fn format_minutes(elapsed: Duration) -> String {
    format!("{:.2} minutes", elapsed.as_secs() as f64 / 60.0)
}

/// Writes `result.txt`, replacing any previous score.
pub async fn write_result(result_dir: &Path, score: f64) -> std::io::Result<PathBuf> {
    fs::create_dir_all(result_dir).await?;
    let path = result_dir.join(RESULT_FILE);
    fs::write(&path, format!("{}\n", format_score(score))).await?;
    debug!("Saved result to {}", path.display());
    Ok(path)
}

/// Writes `time_taken.txt`.
pub async fn write_time_taken(result_dir: &Path, elapsed: Duration) -> std::io::Result<PathBuf> {
    fs::create_dir_all(result_dir).await?;
    let path = result_dir.join(TIME_TAKEN_FILE);
    fs::write(&path, format!("{}\n", format_minutes(elapsed))).await?;
    debug!("Saved time taken to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.75), "0.75");
        assert_eq!(format_score(1.0), "1.0");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_score(f64::NAN), "nan");
        assert_eq!(format_score(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_format_minutes_uses_whole_seconds() {
        assert_eq!(format_minutes(Duration::from_secs(90)), "1.50 minutes");
        assert_eq!(format_minutes(Duration::from_millis(59_999)), "0.98 minutes");
        assert_eq!(format_minutes(Duration::ZERO), "0.00 minutes");
    }

    #[tokio::test]
    async fn test_write_result() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("chrome").join("example-1");

        let path = write_result(&dir, 0.75).await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "0.75\n");

        write_result(&dir, 1.0).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.join(RESULT_FILE)).unwrap(),
            "1.0\n"
        );
    }

    #[tokio::test]
    async fn test_write_time_taken() {
        let temp = TempDir::new().unwrap();
        write_time_taken(temp.path(), Duration::from_secs(150))
            .await
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(temp.path().join(TIME_TAKEN_FILE)).unwrap(),
            "2.50 minutes\n"
        );
    }

    #[tokio::test]
    async fn test_error_marker_detection() {
        let temp = TempDir::new().unwrap();
        let debug = debug_path(temp.path());
        assert!(!has_error_marker(&debug).await);

        std::fs::create_dir_all(&debug).unwrap();
        std::fs::write(debug.join(ERROR_MARKER), "planner crashed").unwrap();
        assert!(has_error_marker(&debug).await);
    }
}
