// dqi-core/src/domain/quality/summary.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::record::TestResult;
use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    TestCategory,
    QualityDimension,
}

impl GroupKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TestCategory => "test_category",
            Self::QualityDimension => "quality_dimension",
        }
    }

    fn value_of<'a>(&self, record: &'a TestResult) -> Option<&'a str> {
        let value = match self {
            Self::TestCategory => record.test_category.as_deref(),
            Self::QualityDimension => record.quality_dimension.as_deref(),
        };
        value.filter(|v| !v.is_empty())
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GroupKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "test_category" | "category" => Ok(Self::TestCategory),
            "quality_dimension" | "dimension" => Ok(Self::QualityDimension),
            _ => Err(DomainError::UnknownGroupKey(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group_value: String,
    pub total_tests: usize,
    pub passing_tests: usize,
    pub failing_tests: usize,
    pub passing_percentage: f64,
}

/// `passing / total * 100` rounded to one decimal; 0 for an empty group.
///
/// Rounds the exact binary value through the formatter (ties to even), so
/// 1/16 gives 6.2 and 289/2000 gives 14.4. Scaling by 1000 first would not.
pub fn passing_percentage(passing: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = passing as f64 / total as f64 * 100.0;
    format!("{pct:.1}").parse().unwrap_or(pct)
}

/// Pass/fail counts per group value, ordered by value.
///
/// Unlike grading this counts every record carrying a non-empty key, graded or
/// not: a category's pass rate is about executed tests, not about severities.
pub fn summarize_by<'a, I>(records: I, key: GroupKey) -> Vec<GroupSummary>
where
    I: IntoIterator<Item = &'a TestResult>,
{
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in records {
        if let Some(value) = key.value_of(record) {
            let (total, passing) = groups.entry(value).or_default();
            *total += 1;
            if record.passed() {
                *passing += 1;
            }
        }
    }

    groups
        .into_iter()
        .map(|(value, (total, passing))| GroupSummary {
            group_value: value.to_string(),
            total_tests: total,
            passing_tests: passing,
            failing_tests: total - passing,
            passing_percentage: passing_percentage(passing, total),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn categorized(id: &str, status: &str, category: Option<&str>) -> TestResult {
        let mut record = TestResult::new(id, status);
        record.test_category = category.map(str::to_string);
        record
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(passing_percentage(0, 0), 0.0);
        assert_eq!(passing_percentage(2, 3), 66.7);
        assert_eq!(passing_percentage(1, 3), 33.3);
        assert_eq!(passing_percentage(3, 3), 100.0);
        assert_eq!(passing_percentage(1, 8), 12.5);
    }

    #[test]
    fn test_percentage_ties_round_to_even() {
        assert_eq!(passing_percentage(1, 16), 6.2);
        assert_eq!(passing_percentage(5, 16), 31.2);
        assert_eq!(passing_percentage(289, 2000), 14.4);
        assert_eq!(passing_percentage(3, 16), 18.8);
    }

    #[test]
    fn test_groups_are_sorted_and_skip_empty_keys() {
        let records = vec![
            categorized("1", "pass", Some("uniqueness")),
            categorized("2", "fail", Some("completeness")),
            categorized("3", "pass", Some("completeness")),
            categorized("4", "pass", Some("completeness")),
            categorized("5", "fail", Some("")),
            categorized("6", "fail", None),
        ];
        let summary = summarize_by(&records, GroupKey::TestCategory);
        assert_eq!(
            summary,
            vec![
                GroupSummary {
                    group_value: "completeness".into(),
                    total_tests: 3,
                    passing_tests: 2,
                    failing_tests: 1,
                    passing_percentage: 66.7,
                },
                GroupSummary {
                    group_value: "uniqueness".into(),
                    total_tests: 1,
                    passing_tests: 1,
                    failing_tests: 0,
                    passing_percentage: 100.0,
                },
            ]
        );
    }

    #[test]
    fn test_ungraded_records_still_counted() {
        let mut record = TestResult::new("u", "fail");
        record.quality_dimension = Some("validity".into());
        let summary = summarize_by(&[record], GroupKey::QualityDimension);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].failing_tests, 1);
        assert!(summarize_by(&[] as &[TestResult], GroupKey::TestCategory).is_empty());
    }

    #[test]
    fn test_group_key_parsing() -> anyhow::Result<()> {
        assert_eq!(GroupKey::from_str("category")?, GroupKey::TestCategory);
        assert_eq!(GroupKey::from_str("QUALITY-DIMENSION")?, GroupKey::QualityDimension);
        assert!(GroupKey::from_str("table").is_err());
        Ok(())
    }
}
