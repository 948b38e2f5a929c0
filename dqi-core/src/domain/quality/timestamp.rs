// dqi-core/src/domain/quality/timestamp.rs

use chrono::{DateTime, NaiveDateTime};

use super::record::TestResult;

pub const NO_DATA_LABEL: &str = "No data available";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

/// Latest `generated_at` across the records, as originally written.
///
/// Parsable timestamps compare chronologically and rank above unparsable ones;
/// the rest fall back to string order.
pub fn last_run_time<'a, I>(records: I) -> Option<String>
where
    I: IntoIterator<Item = &'a TestResult>,
{
    records
        .into_iter()
        .filter_map(|r| r.generated_at.as_deref())
        .max_by_key(|raw| (parse_timestamp(raw), *raw))
        .map(str::to_string)
}
