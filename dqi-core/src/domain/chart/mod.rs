// dqi-core/src/domain/chart/mod.rs

pub mod series;

pub use series::{
    ChartDescriptor, ChartSeriesPoint, RawChartPoint, available_charts, chart_filter_values,
    chart_points, normalize_chart_points, points_per_category,
};
