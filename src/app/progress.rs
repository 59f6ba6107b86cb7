//! Bounded in-memory record of optimizer progress reports.

use chrono::{DateTime, Utc};
use evoplat_net::ProgressUpdate;
use serde::Serialize;
use std::collections::VecDeque;

/// Reports kept before the oldest are dropped.
pub const DEFAULT_HISTORY_CAPACITY: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEntry {
    pub received_at: DateTime<Utc>,
    pub update: ProgressUpdate,
}

#[derive(Debug, Clone)]
pub struct ProgressHistory {
    entries: VecDeque<ProgressEntry>,
    capacity: usize,
}

impl Default for ProgressHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ProgressHistory {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity: capacity.max(1),
        }
    }

    pub fn record(&mut self, update: ProgressUpdate) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ProgressEntry {
            received_at: Utc::now(),
            update,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&ProgressEntry> {
        self.entries.back()
    }

    /// Highest `best_fitness` reported so far.
    #[must_use]
    pub fn best_fitness(&self) -> Option<f64> {
        self.entries
            .iter()
            .map(|e| e.update.best_fitness)
            .reduce(f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProgressEntry> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn update(generation: u64, best_fitness: f64) -> ProgressUpdate {
        ProgressUpdate {
            generation,
            best_fitness,
            best_solution: Value::Null,
            average_fitness: None,
            population_diversity: None,
            task_id: None,
            status: None,
        }
    }

    #[test]
    fn test_history_is_bounded() {
        let mut history = ProgressHistory::with_capacity(3);
        for g in 0..5 {
            history.record(update(g, g as f64));
        }
        assert_eq!(history.len(), 3);
        let generations: Vec<u64> = history.iter().map(|e| e.update.generation).collect();
        assert_eq!(generations, vec![2, 3, 4]);
        assert_eq!(history.latest().map(|e| e.update.generation), Some(4));
    }

    #[test]
    fn test_best_fitness() {
        let mut history = ProgressHistory::default();
        assert_eq!(history.best_fitness(), None);
        history.record(update(0, 10.0));
        history.record(update(1, 30.0));
        history.record(update(2, 20.0));
        assert_eq!(history.best_fitness(), Some(30.0));
    }
}
