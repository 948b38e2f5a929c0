// dqi-core/src/domain/quality/mart_status.rs
//
// Mart usability. Severity 1 is a global kill-switch: when any critical test
// fails, every mart is unusable whatever its flags say. Severity 2 and 3 are
// scoped to the marts a failing test is flagged for. Severity 4 and 5 never
// reach this module's verdicts.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use super::mart::Mart;
use super::record::TestResult;
use super::severity::SeverityLevel;
use super::summary::passing_percentage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MartStatus {
    Usable,
    Caution,
    NotUsable,
}

impl MartStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Usable => "usable",
            Self::Caution => "caution",
            Self::NotUsable => "not_usable",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Usable => "Usable",
            Self::Caution => "Use with Caution",
            Self::NotUsable => "Not Usable",
        }
    }

    /// Badge color understood by the dashboard's stylesheet.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Usable => "success",
            Self::Caution => "warning",
            Self::NotUsable => "danger",
        }
    }
}

impl fmt::Display for MartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure counts per severity level, over graded non-passing records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts([usize; 5]);

impl SeverityCounts {
    pub fn get(&self, level: SeverityLevel) -> usize {
        self.0[level.index()]
    }

    fn record(&mut self, level: SeverityLevel) {
        self.0[level.index()] += 1;
    }
}

/// Counts over the records flagged for one mart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MartCounts {
    pub total: usize,
    pub passing: usize,
    pub failures: SeverityCounts,
}

/// Everything the resolver and the summary table need, gathered in one pass.
#[derive(Debug, Clone, Default)]
pub struct MartTally {
    global_failures: SeverityCounts,
    per_mart: [MartCounts; Mart::COUNT],
}

impl MartTally {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a TestResult>,
    {
        let mut tally = Self::default();
        for record in records {
            let failing = record.failing_severity();
            if let Some(level) = failing {
                tally.global_failures.record(level);
            }
            for mart in record.mart_flags.iter() {
                let counts = &mut tally.per_mart[mart as usize];
                counts.total += 1;
                if record.passed() {
                    counts.passing += 1;
                }
                if let Some(level) = failing {
                    counts.failures.record(level);
                }
            }
        }
        tally
    }

    pub fn global_critical_failures(&self) -> usize {
        self.global_failures.get(SeverityLevel::Critical)
    }

    pub fn counts(&self, mart: Mart) -> &MartCounts {
        &self.per_mart[mart as usize]
    }

    /// Precedence: global sev1, then this mart's sev2, then its sev3.
    /// Once a rule fires the lesser ones are not consulted.
    pub fn status(&self, mart: Mart) -> MartStatus {
        if self.global_critical_failures() > 0 {
            return MartStatus::NotUsable;
        }
        let failures = &self.counts(mart).failures;
        if failures.get(SeverityLevel::High) > 0 {
            return MartStatus::NotUsable;
        }
        if failures.get(SeverityLevel::Moderate) > 0 {
            return MartStatus::Caution;
        }
        MartStatus::Usable
    }
}

/// Usability verdict for each of the nine marts. Empty input: all usable.
pub fn compute_mart_statuses<'a, I>(records: I) -> BTreeMap<Mart, MartStatus>
where
    I: IntoIterator<Item = &'a TestResult>,
{
    let tally = MartTally::from_records(records);
    Mart::ALL
        .into_iter()
        .map(|mart| (mart, tally.status(mart)))
        .collect()
}

/// One row of the mart reporting table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MartSummaryRow {
    pub mart: Mart,
    pub display_name: &'static str,
    pub total_tests: usize,
    pub passing_tests: usize,
    pub passing_percentage: f64,
    pub sev1_fails: usize,
    pub sev2_fails: usize,
    pub sev3_fails: usize,
    pub sev4_fails: usize,
    pub sev5_fails: usize,
    pub status: MartStatus,
    pub status_label: &'static str,
    pub status_color: &'static str,
}

/// Per-mart counts alongside the verdict. Severity columns are counted through
/// each mart's own flag; the status column applies the same global severity-1
/// override as `compute_mart_statuses`, so the table and the badges always agree.
pub fn mart_test_summary<'a, I>(records: I) -> Vec<MartSummaryRow>
where
    I: IntoIterator<Item = &'a TestResult>,
{
    let tally = MartTally::from_records(records);
    Mart::ALL
        .into_iter()
        .map(|mart| {
            let counts = tally.counts(mart);
            let status = tally.status(mart);
            MartSummaryRow {
                mart,
                display_name: mart.display_name(),
                total_tests: counts.total,
                passing_tests: counts.passing,
                passing_percentage: passing_percentage(counts.passing, counts.total),
                sev1_fails: counts.failures.get(SeverityLevel::Critical),
                sev2_fails: counts.failures.get(SeverityLevel::High),
                sev3_fails: counts.failures.get(SeverityLevel::Moderate),
                sev4_fails: counts.failures.get(SeverityLevel::Low),
                sev5_fails: counts.failures.get(SeverityLevel::Informational),
                status,
                status_label: status.label(),
                status_color: status.color(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing(id: &str, level: SeverityLevel, marts: &[Mart]) -> TestResult {
        TestResult::new(id, "fail").with_severity(level).with_marts(marts)
    }

    fn all(statuses: &BTreeMap<Mart, MartStatus>, expected: MartStatus) -> bool {
        statuses.len() == Mart::COUNT && statuses.values().all(|s| *s == expected)
    }

    #[test]
    fn test_empty_set_all_usable() {
        let statuses = compute_mart_statuses(&[] as &[TestResult]);
        assert!(all(&statuses, MartStatus::Usable));
    }

    #[test]
    fn test_unflagged_critical_failure_kills_every_mart() {
        let statuses = compute_mart_statuses(&[failing("c", SeverityLevel::Critical, &[])]);
        assert!(all(&statuses, MartStatus::NotUsable));
    }

    #[test]
    fn test_high_failure_is_scoped_to_its_mart() {
        let records = vec![
            failing("h", SeverityLevel::High, &[Mart::CmsChronicConditions]),
            failing("m", SeverityLevel::Moderate, &[Mart::CmsHccs]),
        ];
        let statuses = compute_mart_statuses(&records);
        assert_eq!(statuses[&Mart::CmsChronicConditions], MartStatus::NotUsable);
        assert_eq!(statuses[&Mart::CmsHccs], MartStatus::Caution);
        for mart in Mart::ALL {
            if mart != Mart::CmsChronicConditions && mart != Mart::CmsHccs {
                assert_eq!(statuses[&mart], MartStatus::Usable, "{mart}");
            }
        }
    }

    #[test]
    fn test_high_wins_over_moderate_on_same_mart() {
        let records = vec![
            failing("h", SeverityLevel::High, &[Mart::Ccsr]),
            failing("m", SeverityLevel::Moderate, &[Mart::Ccsr]),
        ];
        assert_eq!(compute_mart_statuses(&records)[&Mart::Ccsr], MartStatus::NotUsable);
    }

    #[test]
    fn test_low_and_informational_never_touch_marts() {
        let records = vec![
            failing("l", SeverityLevel::Low, &Mart::ALL),
            failing("i", SeverityLevel::Informational, &Mart::ALL),
        ];
        assert!(all(&compute_mart_statuses(&records), MartStatus::Usable));
    }

    #[test]
    fn test_passing_and_ungraded_flagged_records_are_ignored() {
        let records = vec![
            TestResult::new("p", "pass")
                .with_severity(SeverityLevel::Critical)
                .with_marts(&Mart::ALL),
            TestResult::new("u", "fail").with_marts(&Mart::ALL),
        ];
        assert!(all(&compute_mart_statuses(&records), MartStatus::Usable));
    }

    #[test]
    fn test_summary_counts_through_own_flag() {
        let records = vec![
            failing("h", SeverityLevel::High, &[Mart::Ccsr, Mart::Readmission]),
            failing("l", SeverityLevel::Low, &[Mart::Ccsr]),
            TestResult::new("p1", "pass")
                .with_severity(SeverityLevel::High)
                .with_marts(&[Mart::Ccsr]),
            TestResult::new("u", "error").with_marts(&[Mart::Ccsr]),
        ];
        let rows = mart_test_summary(&records);
        assert_eq!(rows.len(), Mart::COUNT);

        let ccsr = &rows[Mart::Ccsr as usize];
        assert_eq!(ccsr.mart, Mart::Ccsr);
        assert_eq!(ccsr.total_tests, 4);
        assert_eq!(ccsr.passing_tests, 1);
        assert_eq!(ccsr.passing_percentage, 25.0);
        assert_eq!(ccsr.sev2_fails, 1);
        assert_eq!(ccsr.sev4_fails, 1);
        assert_eq!(ccsr.status, MartStatus::NotUsable);
        assert_eq!(ccsr.status_label, "Not Usable");
        assert_eq!(ccsr.status_color, "danger");

        let hccs = &rows[Mart::CmsHccs as usize];
        assert_eq!(hccs.total_tests, 0);
        assert_eq!(hccs.passing_percentage, 0.0);
        assert_eq!(hccs.status, MartStatus::Usable);
    }

    #[test]
    fn test_summary_status_applies_global_override() {
        // The critical failure is only flagged for CCSR, yet every row must
        // agree with the resolver.
        let records = vec![failing("c", SeverityLevel::Critical, &[Mart::Ccsr])];
        let rows = mart_test_summary(&records);
        let statuses = compute_mart_statuses(&records);
        for row in &rows {
            assert_eq!(row.status, statuses[&row.mart]);
            assert_eq!(row.status, MartStatus::NotUsable);
        }
        assert_eq!(rows[Mart::Ccsr as usize].sev1_fails, 1);
        assert_eq!(rows[Mart::Readmission as usize].sev1_fails, 0);
    }
}
