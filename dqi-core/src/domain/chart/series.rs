// dqi-core/src/domain/chart/series.rs

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::quality::normalize::{NormalizedBatch, RawBatch, RejectionReason, RowRejection};
use crate::domain::quality::severity::RawField;

/// One labeled observation of a reporting chart (e.g. claim counts per month).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeriesPoint {
    pub data_quality_category: Option<String>,
    pub graph_name: String,
    pub level_of_detail: Option<String>,
    pub y_axis_description: Option<String>,
    pub x_axis_description: Option<String>,
    pub filter_description: Option<String>,
    pub sum_description: Option<String>,
    pub y_axis: Option<String>,
    pub x_axis: Option<String>,
    pub chart_filter: Option<String>,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct RawChartPoint {
    pub data_quality_category: Option<String>,
    pub graph_name: Option<String>,
    pub level_of_detail: Option<String>,
    pub y_axis_description: Option<String>,
    pub x_axis_description: Option<String>,
    pub filter_description: Option<String>,
    pub sum_description: Option<String>,
    pub y_axis: Option<RawField>,
    pub x_axis: Option<RawField>,
    pub chart_filter: Option<RawField>,
    pub value: Option<RawField>,
}

/// Distinct chart, as listed in the chart picker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ChartDescriptor {
    pub data_quality_category: Option<String>,
    pub graph_name: String,
    pub y_axis_description: Option<String>,
    pub x_axis_description: Option<String>,
    pub filter_description: Option<String>,
    pub sum_description: Option<String>,
    pub level_of_detail: Option<String>,
}

fn text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn field_text(value: Option<RawField>) -> Option<String> {
    text(value.map(|v| v.as_text()))
}

fn parse_value(value: Option<RawField>) -> Result<Option<f64>, RejectionReason> {
    match value {
        None => Ok(None),
        Some(RawField::Int(i)) => Ok(Some(i as f64)),
        Some(RawField::Float(f)) => Ok(Some(f)),
        Some(RawField::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawField::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| RejectionReason::InvalidValue(s)),
        Some(RawField::Bool(b)) => Err(RejectionReason::InvalidValue(b.to_string())),
    }
}

pub fn normalize_chart_points(batch: RawBatch<RawChartPoint>) -> NormalizedBatch<ChartSeriesPoint> {
    let mut points = Vec::with_capacity(batch.rows.len());
    let mut rejections = batch.rejections;

    for (row, raw) in batch.rows {
        let Some(graph_name) = text(raw.graph_name) else {
            rejections.push(RowRejection {
                row,
                unique_id: None,
                reason: RejectionReason::MissingKey("graph_name"),
            });
            continue;
        };
        let value = match parse_value(raw.value) {
            Ok(v) => v,
            Err(reason) => {
                rejections.push(RowRejection {
                    row,
                    unique_id: Some(graph_name),
                    reason,
                });
                continue;
            }
        };
        points.push(ChartSeriesPoint {
            data_quality_category: text(raw.data_quality_category),
            graph_name,
            level_of_detail: text(raw.level_of_detail),
            y_axis_description: text(raw.y_axis_description),
            x_axis_description: text(raw.x_axis_description),
            filter_description: text(raw.filter_description),
            sum_description: text(raw.sum_description),
            y_axis: field_text(raw.y_axis),
            x_axis: field_text(raw.x_axis),
            chart_filter: field_text(raw.chart_filter),
            value,
        });
    }

    rejections.sort_by_key(|r| r.row);
    NormalizedBatch {
        records: points,
        rejections,
        ungraded: 0,
    }
}

/// Distinct charts ordered by category then graph name.
pub fn available_charts(points: &[ChartSeriesPoint]) -> Vec<ChartDescriptor> {
    points
        .iter()
        .map(|p| ChartDescriptor {
            data_quality_category: p.data_quality_category.clone(),
            graph_name: p.graph_name.clone(),
            y_axis_description: p.y_axis_description.clone(),
            x_axis_description: p.x_axis_description.clone(),
            filter_description: p.filter_description.clone(),
            sum_description: p.sum_description.clone(),
            level_of_detail: p.level_of_detail.clone(),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn chart_points<'a>(
    points: &'a [ChartSeriesPoint],
    graph_name: &str,
    chart_filter: Option<&str>,
) -> Vec<&'a ChartSeriesPoint> {
    points
        .iter()
        .filter(|p| p.graph_name == graph_name)
        .filter(|p| chart_filter.is_none_or(|f| p.chart_filter.as_deref() == Some(f)))
        .collect()
}

pub fn chart_filter_values(points: &[ChartSeriesPoint], graph_name: &str) -> Vec<String> {
    points
        .iter()
        .filter(|p| p.graph_name == graph_name)
        .filter_map(|p| p.chart_filter.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Point counts per data-quality category (uncategorized points are skipped).
pub fn points_per_category(points: &[ChartSeriesPoint]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for category in points.iter().filter_map(|p| p.data_quality_category.as_ref()) {
        *counts.entry(category.clone()).or_insert(0) += 1;
    }
    counts
}
