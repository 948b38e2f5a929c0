// dqi-core/src/infrastructure/adapters/memory.rs

use std::sync::{Arc, RwLock};

use crate::domain::Snapshot;
use crate::domain::chart::ChartSeriesPoint;
use crate::domain::quality::TestResult;
use crate::error::DqiError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::store::RecordStore;

/// Process-local store. The lock only guards the pointer swap: readers clone
/// the `Arc` and release it before doing any work.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    current: RwLock<Arc<Snapshot>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    fn poisoned() -> DqiError {
        DqiError::Infrastructure(InfrastructureError::StoreUnavailable(
            "in-memory store lock poisoned".into(),
        ))
    }

    fn swap(&self, build: impl FnOnce(&Snapshot) -> Snapshot) -> Result<(), DqiError> {
        let mut guard = self.current.write().map_err(|_| Self::poisoned())?;
        let next = build(&guard);
        *guard = Arc::new(next);
        Ok(())
    }
}

impl RecordStore for InMemoryStore {
    fn load_snapshot(&self) -> Result<Arc<Snapshot>, DqiError> {
        let guard = self.current.read().map_err(|_| Self::poisoned())?;
        Ok(Arc::clone(&guard))
    }

    fn replace_test_results(&self, records: Vec<TestResult>) -> Result<(), DqiError> {
        self.swap(|current| current.with_test_results(records))
    }

    fn replace_chart_points(&self, points: Vec<ChartSeriesPoint>) -> Result<(), DqiError> {
        self.swap(|current| current.with_chart_points(points))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::thread;

    #[test]
    fn test_old_snapshot_survives_replace() -> Result<()> {
        let store = InMemoryStore::new();
        store.replace_test_results(vec![TestResult::new("a", "pass")])?;
        let before = store.load_snapshot()?;

        store.replace_test_results(vec![
            TestResult::new("b", "fail"),
            TestResult::new("c", "fail"),
        ])?;

        assert_eq!(before.test_results.len(), 1);
        assert_eq!(store.get_all_records()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_readers_never_see_a_mix() -> Result<()> {
        let store = Arc::new(InMemoryStore::new());
        let small: Vec<TestResult> = (0..3).map(|i| TestResult::new(format!("s{i}"), "pass")).collect();
        let large: Vec<TestResult> = (0..50).map(|i| TestResult::new(format!("l{i}"), "fail")).collect();
        store.replace_test_results(small.clone())?;

        let writer = {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..100 {
                    let batch = if i % 2 == 0 { large.clone() } else { small.clone() };
                    store.replace_test_results(batch).unwrap();
                }
            })
        };

        for _ in 0..200 {
            let snapshot = store.load_snapshot()?;
            let len = snapshot.test_results.len();
            assert!(len == 3 || len == 50, "torn snapshot of {len} rows");
            let all_same = snapshot
                .test_results
                .iter()
                .all(|r| r.status == snapshot.test_results[0].status);
            assert!(all_same);
        }
        writer.join().unwrap();
        Ok(())
    }
}
