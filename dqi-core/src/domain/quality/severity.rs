// dqi-core/src/domain/quality/severity.rs

use serde::{Deserialize, Serialize};
use std::fmt;

// Discriminants follow the warehouse convention: 1 is the most critical level.
// Ord therefore ranks Critical < Informational, which is exactly the
// "most severe first" order used by every listing.

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityLevel {
    Critical = 1,
    High = 2,
    Moderate = 3,
    Low = 4,
    Informational = 5,
}

impl SeverityLevel {
    pub const ALL: [SeverityLevel; 5] = [
        Self::Critical,
        Self::High,
        Self::Moderate,
        Self::Low,
        Self::Informational,
    ];

    pub fn from_level(level: i64) -> Option<Self> {
        match level {
            1 => Some(Self::Critical),
            2 => Some(Self::High),
            3 => Some(Self::Moderate),
            4 => Some(Self::Low),
            5 => Some(Self::Informational),
            _ => None,
        }
    }

    pub fn level(&self) -> u8 {
        *self as u8
    }

    /// Zero-based slot, used to index per-severity counters.
    pub(crate) fn index(&self) -> usize {
        *self as usize - 1
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Moderate => "moderate",
            Self::Low => "low",
            Self::Informational => "informational",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// A loosely typed cell as it arrives from an upload (CSV text, JSON number, bool...).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RawField {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawField {
    pub fn as_text(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }

    /// Integer value, accepting integral floats ("2.0") and their string forms.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Bool(_) => None,
            Self::Int(i) => Some(*i),
            Self::Float(f) => integral(*f),
            Self::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
        }
    }

    /// Mart flags behave like `FLAG = 1`: only a truthy one counts.
    pub fn as_flag(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Text(s) if s.trim().eq_ignore_ascii_case("true") => true,
            other => other.as_integer() == Some(1),
        }
    }
}

fn integral(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

/// The single place where a raw severity cell becomes a grading level.
/// `None` means the record is ungraded.
pub fn parse_severity(raw: Option<&RawField>) -> Option<SeverityLevel> {
    raw.and_then(RawField::as_integer)
        .and_then(SeverityLevel::from_level)
}
