//! Bounded case history used as the online training set
//!
//! Cold start reads persisted exemplars newest first, caps them at the
//! history limit and merges records with bit-identical inputs by averaging
//! their targets. During normal operation the window only slides: append
//! the newest exemplar and, once over the limit, evict the oldest. Appends
//! never deduplicate.
//!
//! Cases are held oldest first, so index 0 is always the next to go.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::types::{Exemplar, HISTORY_LIMIT};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaseHistory {
    cases: VecDeque<Exemplar>,
    limit: usize,
}

impl Default for CaseHistory {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

impl CaseHistory {
    /// Empty history holding at most `limit` cases (at least one)
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            cases: VecDeque::with_capacity(limit + 1),
            limit,
        }
    }

    /// Builds the history from persisted records ordered newest first
    ///
    /// Only the first `limit` records are read. A record whose inputs match
    /// an already kept case folds into it as `(kept + record) / 2`.
    pub fn from_newest_first<I>(records: I, limit: usize) -> Self
    where
        I: IntoIterator<Item = Exemplar>,
    {
        let mut history = Self::new(limit);
        let mut newest_first: Vec<Exemplar> = Vec::with_capacity(history.limit);

        for record in records.into_iter().take(history.limit) {
            match newest_first.iter_mut().find(|kept| kept.same_inputs(&record)) {
                Some(kept) => {
                    kept.target_interval = (kept.target_interval + record.target_interval) / 2.0;
                }
                None => newest_first.push(record),
            }
        }

        history.cases.extend(newest_first.into_iter().rev());
        history
    }

    /// Appends the newest case, returning the evicted oldest one if the
    /// history grew past its limit
    pub fn push(&mut self, exemplar: Exemplar) -> Option<Exemplar> {
        self.cases.push_back(exemplar);
        if self.cases.len() > self.limit {
            self.cases.pop_front()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn get(&self, index: usize) -> Option<&Exemplar> {
        self.cases.get(index)
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Exemplar> {
        self.cases.iter()
    }

    pub fn newest(&self) -> Option<&Exemplar> {
        self.cases.back()
    }
}
