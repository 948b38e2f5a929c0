// dqi-core/src/domain/snapshot.rs

use std::sync::Arc;

use super::chart::ChartSeriesPoint;
use super::quality::TestResult;

/// An immutable view of the stored data. Every query reads one snapshot from
/// start to finish; imports build a new one and swap it in whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub test_results: Vec<TestResult>,
    pub chart_points: Vec<ChartSeriesPoint>,
}

impl Snapshot {
    pub fn new(test_results: Vec<TestResult>, chart_points: Vec<ChartSeriesPoint>) -> Self {
        Self {
            test_results,
            chart_points,
        }
    }

    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Same chart data, new test results.
    pub fn with_test_results(&self, test_results: Vec<TestResult>) -> Self {
        Self {
            test_results,
            chart_points: self.chart_points.clone(),
        }
    }

    pub fn with_chart_points(&self, chart_points: Vec<ChartSeriesPoint>) -> Self {
        Self {
            test_results: self.test_results.clone(),
            chart_points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.test_results.is_empty() && self.chart_points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replacing_one_table_keeps_the_other() {
        let base = Snapshot::new(
            vec![TestResult::new("a", "pass")],
            vec![ChartSeriesPoint {
                graph_name: "g".into(),
                ..Default::default()
            }],
        );
        let next = base.with_test_results(vec![]);
        assert!(next.test_results.is_empty());
        assert_eq!(next.chart_points, base.chart_points);
        assert_eq!(base.test_results.len(), 1);

        let cleared = next.with_chart_points(vec![]);
        assert!(cleared.is_empty());
        assert!(Snapshot::empty().is_empty());
    }
}
