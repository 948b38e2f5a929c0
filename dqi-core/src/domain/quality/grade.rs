// dqi-core/src/domain/quality/grade.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use super::record::TestResult;
use super::severity::SeverityLevel;
use crate::domain::error::DomainError;

// Declaration order gives F < D < C < B < A, so "worse" is simply "less than".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    F,
    D,
    C,
    B,
    A,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::A => "Excellent - No severity level 1-4 issues detected. All data marts are usable.",
            Self::B => "Good - Has severity level 4 issues. All data marts are usable.",
            Self::C => "Fair - Has severity level 3 issues. Some data marts may have warnings.",
            Self::D => "Poor - Has severity level 2 issues. Some data marts may not be usable.",
            Self::F => "Critical - Has severity level 1 issues. Most data marts are not usable.",
        }
    }

    /// Grade earned when the most severe outstanding failure has this level.
    fn for_worst_failure(level: Option<SeverityLevel>) -> Self {
        match level {
            Some(SeverityLevel::Critical) => Self::F,
            Some(SeverityLevel::High) => Self::D,
            Some(SeverityLevel::Moderate) => Self::C,
            Some(SeverityLevel::Low) => Self::B,
            // Informational failures are reported, never graded.
            Some(SeverityLevel::Informational) | None => Self::A,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Grade {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "F" => Ok(Self::F),
            _ => Err(DomainError::UnknownGrade(s.to_string())),
        }
    }
}

/// Most severe failure wins: one severity-1 failure outweighs any number of
/// lesser ones. Ungraded records are ignored; an empty set grades `A`.
pub fn compute_grade<'a, I>(records: I) -> Grade
where
    I: IntoIterator<Item = &'a TestResult>,
{
    let worst = records
        .into_iter()
        .filter_map(TestResult::failing_severity)
        .min();
    Grade::for_worst_failure(worst)
}
