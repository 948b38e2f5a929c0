// dqi-core/src/domain/quality/mart.rs

use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use crate::domain::error::DomainError;

/// The closed set of downstream data marts. Adding one means adding a variant
/// here; the flag column and display name follow from the match arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mart {
    ServiceCategories,
    Ccsr,
    CmsChronicConditions,
    TuvaChronicConditions,
    CmsHccs,
    EdClassification,
    FinancialPmpm,
    QualityMeasures,
    Readmission,
}

impl Mart {
    pub const COUNT: usize = 9;

    pub const ALL: [Mart; Mart::COUNT] = [
        Self::ServiceCategories,
        Self::Ccsr,
        Self::CmsChronicConditions,
        Self::TuvaChronicConditions,
        Self::CmsHccs,
        Self::EdClassification,
        Self::FinancialPmpm,
        Self::QualityMeasures,
        Self::Readmission,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceCategories => "SERVICE_CATEGORIES",
            Self::Ccsr => "CCSR",
            Self::CmsChronicConditions => "CMS_CHRONIC_CONDITIONS",
            Self::TuvaChronicConditions => "TUVA_CHRONIC_CONDITIONS",
            Self::CmsHccs => "CMS_HCCS",
            Self::EdClassification => "ED_CLASSIFICATION",
            Self::FinancialPmpm => "FINANCIAL_PMPM",
            Self::QualityMeasures => "QUALITY_MEASURES",
            Self::Readmission => "READMISSION",
        }
    }

    /// Column holding this mart's relevance flag in the tabular exports.
    pub fn flag_column(&self) -> &'static str {
        match self {
            Self::ServiceCategories => "FLAG_SERVICE_CATEGORIES",
            Self::Ccsr => "FLAG_CCSR",
            Self::CmsChronicConditions => "FLAG_CMS_CHRONIC_CONDITIONS",
            Self::TuvaChronicConditions => "FLAG_TUVA_CHRONIC_CONDITIONS",
            Self::CmsHccs => "FLAG_CMS_HCCS",
            Self::EdClassification => "FLAG_ED_CLASSIFICATION",
            Self::FinancialPmpm => "FLAG_FINANCIAL_PMPM",
            Self::QualityMeasures => "FLAG_QUALITY_MEASURES",
            Self::Readmission => "FLAG_READMISSION",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::ServiceCategories => "Service Categories",
            Self::Ccsr => "CCSR",
            Self::CmsChronicConditions => "CMS Chronic Conditions",
            Self::TuvaChronicConditions => "TUVA Chronic Conditions",
            Self::CmsHccs => "CMS HCCs",
            Self::EdClassification => "ED Classification",
            Self::FinancialPmpm => "Financial PMPM",
            Self::QualityMeasures => "Quality Measures",
            Self::Readmission => "Readmission",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Mart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mart {
    type Err = DomainError;

    /// Accepts `CCSR`, `ccsr`, `FLAG_CCSR`, `cms-hccs`, `Financial PMPM`...
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        let name = normalized.strip_prefix("FLAG_").unwrap_or(&normalized);
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| DomainError::UnknownMart(s.to_string()))
    }
}

/// Which marts a test result is relevant to, indexed by `Mart`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MartFlags([bool; Mart::COUNT]);

impl MartFlags {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(marts: &[Mart]) -> Self {
        let mut flags = Self::default();
        for mart in marts {
            flags.set(*mart, true);
        }
        flags
    }

    pub fn get(&self, mart: Mart) -> bool {
        self.0[mart.index()]
    }

    pub fn set(&mut self, mart: Mart, value: bool) {
        self.0[mart.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = Mart> + '_ {
        Mart::ALL.into_iter().filter(|m| self.get(*m))
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|f| *f)
    }
}

// Serialized as the list of flagged marts, e.g. ["CCSR", "CMS_HCCS"].
impl Serialize for MartFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let marts: Vec<Mart> = self.iter().collect();
        let mut seq = serializer.serialize_seq(Some(marts.len()))?;
        for mart in marts {
            seq.serialize_element(&mart)?;
        }
        seq.end()
    }
}
