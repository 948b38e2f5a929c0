// dqi/src/commands/charts.rs
//
// USE CASE: Browse the imported chart data.

use comfy_table::Cell;

use super::{Workspace, or_dash, table};

pub fn execute(ws: &Workspace, graph: Option<String>, filter: Option<String>) -> anyhow::Result<()> {
    let Some(graph) = graph else {
        let charts = ws.engine.available_charts()?;
        if charts.is_empty() {
            println!("No chart data loaded.");
            return Ok(());
        }
        let mut out = table(&["Category", "Graph", "Y axis", "X axis", "Filter"]);
        for c in &charts {
            out.add_row(vec![
                or_dash(c.data_quality_category.as_deref()),
                Cell::new(&c.graph_name),
                or_dash(c.y_axis_description.as_deref()),
                or_dash(c.x_axis_description.as_deref()),
                or_dash(c.filter_description.as_deref()),
            ]);
        }
        println!("{out}");
        return Ok(());
    };

    let points = ws.engine.chart_points(&graph, filter.as_deref())?;
    if points.is_empty() {
        println!("No points for graph '{graph}'.");
        return Ok(());
    }

    let filters = ws.engine.chart_filter_values(&graph)?;
    if !filters.is_empty() {
        println!("Filters: {}", filters.join(", "));
    }
    let mut out = table(&["X", "Y", "Filter", "Value"]);
    for p in &points {
        out.add_row(vec![
            or_dash(p.x_axis.as_deref()),
            or_dash(p.y_axis.as_deref()),
            or_dash(p.chart_filter.as_deref()),
            or_dash(p.value.map(|v| v.to_string()).as_deref()),
        ]);
    }
    println!("{out}");
    Ok(())
}
