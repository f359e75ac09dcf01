//! Chart translator: normalizes source chart subtypes and payloads.

use deck_core::geometry::scale_frame;
use deck_core::model::{ChartElement, ChartKind, ChartOptions, ChartValues, Placement};
use deck_core::new_id;
use deck_core::source::{ChartData, ChartSource, Frame};
use std::collections::BTreeMap;

use crate::converter::ConvertContext;

pub(crate) fn translate_chart(frame: &Frame, chart: &ChartSource, ctx: &ConvertContext) -> ChartElement {
    let (chart_type, stack) = chart_kind(chart);

    ChartElement {
        id: new_id(),
        placement: Placement {
            rotate: 0.0,
            ..scale_frame(frame, ctx.ratio)
        },
        chart_type,
        data: chart_values(chart),
        options: ChartOptions { stack },
        theme_colors: if chart.colors.is_empty() {
            ctx.theme.theme_colors.clone()
        } else {
            chart.colors.clone()
        },
        text_color: ctx.theme.font_color.clone(),
    }
}

/// Normalized kind and stacking flag for a source chart.
fn chart_kind(chart: &ChartSource) -> (ChartKind, bool) {
    let stacked = matches!(
        chart.grouping.as_deref(),
        Some("stacked") | Some("percentStacked")
    );

    match chart.chart_type.as_str() {
        "barChart" | "bar3DChart" => {
            let kind = if chart.bar_dir.as_deref() == Some("bar") {
                ChartKind::Column
            } else {
                ChartKind::Bar
            };
            (kind, stacked)
        }
        "lineChart" | "line3DChart" => (ChartKind::Line, stacked),
        "areaChart" | "area3DChart" => (ChartKind::Area, stacked),
        "scatterChart" | "bubbleChart" => (ChartKind::Scatter, false),
        "pieChart" | "pie3DChart" | "ofPieChart" => (ChartKind::Pie, false),
        "radarChart" => (ChartKind::Radar, false),
        "doughnutChart" => (ChartKind::Ring, false),
        other => {
            log::warn!("Unknown chart type '{}', rendering as bar", other);
            (ChartKind::Bar, stacked)
        }
    }
}

fn is_coordinate_chart(chart_type: &str) -> bool {
    matches!(chart_type, "scatterChart" | "bubbleChart")
}

fn chart_values(chart: &ChartSource) -> ChartValues {
    match &chart.data {
        ChartData::Matrix(rows) => coordinate_values(rows.clone()),
        ChartData::Series(series) if is_coordinate_chart(&chart.chart_type) => {
            // Some parsers emit scatter data as series of points.
            let xs = series
                .first()
                .map(|s| s.values.iter().map(|p| p.x).collect())
                .unwrap_or_default();
            let ys = series
                .first()
                .map(|s| s.values.iter().map(|p| p.y).collect())
                .unwrap_or_default();
            coordinate_values(vec![xs, ys])
        }
        ChartData::Series(series) => ChartValues {
            labels: series
                .first()
                .map(|s| ordered_labels(&s.xlabels))
                .unwrap_or_default(),
            legends: series.iter().map(|s| s.key.clone()).collect(),
            series: series
                .iter()
                .map(|s| s.values.iter().map(|p| p.y).collect())
                .collect(),
        },
    }
}

/// Category labels ordered by their numeric index key.
fn ordered_labels(xlabels: &BTreeMap<String, String>) -> Vec<String> {
    let mut entries: Vec<(&String, &String)> = xlabels.iter().collect();
    entries.sort_by_key(|(key, _)| key.parse::<usize>().unwrap_or(usize::MAX));
    entries.into_iter().map(|(_, label)| label.clone()).collect()
}

fn coordinate_values(rows: Vec<Vec<f64>>) -> ChartValues {
    let count = rows.first().map_or(0, Vec::len);
    ChartValues {
        labels: (1..=count).map(|idx| format!("Point {}", idx)).collect(),
        legends: vec!["X".to_string(), "Y".to_string()],
        series: rows,
    }
}
