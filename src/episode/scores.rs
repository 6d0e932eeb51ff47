//! Append-only score aggregation shared across episodes.

use std::sync::{Arc, Mutex, MutexGuard};

/// Destination for per-episode scores.
///
/// Implementations must tolerate appends from concurrently running
/// episodes. The controller appends exactly once per finished episode.
pub trait ScoreSink: Send + Sync {
    /// Records one episode score.
    fn append(&self, score: f64);
}

/// Thread-safe score list, cheap to clone between episodes.
#[derive(Debug, Clone, Default)]
pub struct SharedScores {
    inner: Arc<Mutex<Vec<f64>>>,
}

impl SharedScores {
    /// Creates an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<f64>> {
        // A panic elsewhere cannot leave a Vec<f64> half-written.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of scores recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if no score has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of all scores in append order.
    pub fn snapshot(&self) -> Vec<f64> {
        self.lock().clone()
    }

    /// Mean score, or `None` when empty.
    pub fn mean(&self) -> Option<f64> {
        let scores = self.lock();
        if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        }
    }
}

impl ScoreSink for SharedScores {
    fn append(&self, score: f64) {
        self.lock().push(score);
    }
}

impl ScoreSink for Mutex<Vec<f64>> {
    fn append(&self, score: f64) {
        self.lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_scores_append_and_mean() {
        let scores = SharedScores::new();
        assert!(scores.is_empty());
        assert_eq!(scores.mean(), None);

        scores.append(1.0);
        scores.append(0.0);
        scores.append(0.5);

        assert_eq!(scores.len(), 3);
        assert_eq!(scores.snapshot(), vec![1.0, 0.0, 0.5]);
        assert_eq!(scores.mean(), Some(0.5));
    }

    #[test]
    fn test_shared_scores_clones_share_storage() {
        let scores = SharedScores::new();
        let handle = scores.clone();
        handle.append(0.25);
        assert_eq!(scores.snapshot(), vec![0.25]);
    }

    #[test]
    fn test_concurrent_appends() {
        let scores = SharedScores::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let scores = scores.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        scores.append(1.0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(scores.len(), 800);
    }

    #[test]
    fn test_mutex_vec_sink() {
        let sink = Mutex::new(Vec::new());
        sink.append(0.75);
        assert_eq!(*sink.lock().unwrap(), vec![0.75]);
    }
}
