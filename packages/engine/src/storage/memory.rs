//! In-process model store for callers that do not need durability

use interval_net_algo::Exemplar;
use parking_lot::RwLock;

use crate::storage::{ModelStore, StorageResult};

#[derive(Debug, Default)]
struct Inner {
    weights: Vec<f64>,
    /// Oldest first
    cases: Vec<Exemplar>,
    weight_saves: u64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with weights and cases (cases oldest first)
    pub fn with_state(weights: Vec<f64>, cases: Vec<Exemplar>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                weights,
                cases,
                weight_saves: 0,
            }),
        }
    }

    /// Number of `save_weights` calls so far
    pub fn weight_saves(&self) -> u64 {
        self.inner.read().weight_saves
    }
}

impl ModelStore for MemoryStore {
    fn load_weights(&self) -> StorageResult<Vec<f64>> {
        Ok(self.inner.read().weights.clone())
    }

    fn save_weights(&self, weights: &[f64]) -> StorageResult<()> {
        let mut inner = self.inner.write();
        inner.weights = weights.to_vec();
        inner.weight_saves += 1;
        Ok(())
    }

    fn load_recent_cases(&self, limit: usize) -> StorageResult<Vec<Exemplar>> {
        Ok(self.inner.read().cases.iter().rev().take(limit).copied().collect())
    }

    fn append_case(&self, case: &Exemplar) -> StorageResult<()> {
        self.inner.write().cases.push(*case);
        Ok(())
    }

    fn case_count(&self) -> StorageResult<u64> {
        Ok(self.inner.read().cases.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_cases_newest_first() {
        let store = MemoryStore::new();
        for i in 0..4 {
            let x = i as f64 / 10.0;
            store
                .append_case(&Exemplar::new([x, x, x, x], 0.5))
                .expect("append");
        }

        let cases = store.load_recent_cases(2).expect("load");
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].grade, 0.3);
        assert_eq!(cases[1].grade, 0.2);
    }

    #[test]
    fn test_weight_saves_are_counted() {
        let store = MemoryStore::new();
        store.save_weights(&[0.5; 3]).expect("save");
        store.save_weights(&[0.25; 3]).expect("save");

        assert_eq!(store.weight_saves(), 2);
        assert_eq!(store.load_weights().expect("load"), vec![0.25; 3]);
    }
}
