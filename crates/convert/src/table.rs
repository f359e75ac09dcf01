//! Table translator.

use deck_core::geometry::{round1, scale_frame, scale_stroke};
use deck_core::markup::{first_paragraph_align, first_run_style, plain_text};
use deck_core::model::{Outline, Placement, TableCell, TableCellStyle, TableElement};
use deck_core::new_id;
use deck_core::source::{Frame, SourceBorder, SourceCell, TableSource};

use crate::converter::ConvertContext;

/// Minimum cell height when the source has no row heights.
const DEFAULT_CELL_MIN_HEIGHT: f64 = 36.0;

/// Border width, in source units, used when no border defines one.
const DEFAULT_BORDER_WIDTH: f64 = 2.0;

const DEFAULT_BORDER_COLOR: &str = "#eeece1";

pub(crate) fn translate_table(frame: &Frame, table: &TableSource, ctx: &ConvertContext) -> TableElement {
    let data = table
        .data
        .iter()
        .map(|row| row.iter().map(|cell| translate_cell(cell, ctx)).collect())
        .collect();

    let border = table_border(table);
    let outline = Outline {
        width: scale_stroke(
            border.and_then(|b| b.border_width).unwrap_or(DEFAULT_BORDER_WIDTH),
            ctx.ratio,
        ),
        color: border
            .and_then(|b| b.border_color.clone())
            .unwrap_or_else(|| DEFAULT_BORDER_COLOR.to_string()),
        style: border
            .and_then(|b| b.border_type.clone())
            .unwrap_or_else(|| "solid".to_string()),
    };

    TableElement {
        id: new_id(),
        placement: Placement {
            rotate: 0.0,
            ..scale_frame(frame, ctx.ratio)
        },
        col_widths: column_fractions(&table.col_widths, table.data.first().map_or(0, Vec::len)),
        cell_min_height: table
            .row_heights
            .first()
            .filter(|height| **height > 0.0)
            .map_or(DEFAULT_CELL_MIN_HEIGHT, |height| height * ctx.ratio),
        data,
        outline,
    }
}

fn translate_cell(cell: &SourceCell, ctx: &ConvertContext) -> TableCell {
    let run = first_run_style(&cell.text);

    TableCell {
        id: new_id(),
        colspan: cell.col_span.unwrap_or(1).max(1),
        rowspan: cell.row_span.unwrap_or(1).max(1),
        text: plain_text(&cell.text),
        style: TableCellStyle {
            bold: cell.font_bold,
            color: run
                .color
                .or_else(|| cell.font_color.clone())
                .or_else(|| Some(ctx.theme.font_color.clone())),
            backcolor: cell.fill_color.clone(),
            align: first_paragraph_align(&cell.text).unwrap_or_else(|| "left".to_string()),
            fontsize: run
                .font_size
                .map(|size| format!("{:.1}px", round1(size.trunc() * ctx.ratio))),
            fontname: run.font_family.unwrap_or_else(|| ctx.theme.font_name.clone()),
        },
    }
}

/// Column widths as fractions of the total width.
///
/// Falls back to equal columns when widths are missing or degenerate.
fn column_fractions(widths: &[f64], column_count: usize) -> Vec<f64> {
    let total: f64 = widths.iter().sum();
    if !widths.is_empty() && total > 0.0 {
        return widths.iter().map(|width| width / total).collect();
    }

    let count = column_count.max(widths.len()).max(1);
    vec![1.0 / count as f64; count]
}

/// First defined border, checking cell sides before table sides.
fn table_border(table: &TableSource) -> Option<&SourceBorder> {
    let cell = table.data.first().and_then(|row| row.first());
    let cell_borders = cell.map(|cell| &cell.borders);
    let table_borders = &table.borders;

    [
        cell_borders.and_then(|b| b.top.as_ref()),
        cell_borders.and_then(|b| b.bottom.as_ref()),
        table_borders.top.as_ref(),
        table_borders.bottom.as_ref(),
        cell_borders.and_then(|b| b.left.as_ref()),
        cell_borders.and_then(|b| b.right.as_ref()),
        table_borders.left.as_ref(),
        table_borders.right.as_ref(),
    ]
    .into_iter()
    .flatten()
    .find(|border| {
        border.border_width.is_some() || border.border_color.is_some() || border.border_type.is_some()
    })
}
