//! SVG charts rendered with plotters.
//!
//! Categorical axes are drawn on an `f64` range with one unit per category
//! and a label formatter that maps integer positions back to names.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use hospital_eda_core::write_atomic;

use crate::errors::AnalyzeError;
use crate::model::ChartSize;
use crate::stats::{BoxStats, Histogram, box_stats};
use crate::tables::{CorrelationMatrix, Crosstab};

pub const AGE_DISTRIBUTION_FILE_NAME: &str = "age_distribution.svg";
pub const GENDER_DISTRIBUTION_FILE_NAME: &str = "gender_distribution.svg";
pub const TOP_DISEASES_FILE_NAME: &str = "top_diseases.svg";
pub const STAY_BY_DEPARTMENT_FILE_NAME: &str = "length_of_stay_by_department.svg";
pub const COST_BY_OUTCOME_FILE_NAME: &str = "treatment_cost_by_outcome.svg";
pub const CROSSTAB_CHART_FILE_NAME: &str = "admission_type_vs_outcome.svg";
pub const CORRELATION_HEATMAP_FILE_NAME: &str = "correlation_heatmap.svg";

const CAPTION_FONT: (&str, f64) = ("sans-serif", 26.0);
const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);
const KDE_COLOR: RGBColor = RGBColor(221, 132, 82);
const BOX_HALF_WIDTH: f64 = 0.3;

type Canvas<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Render into an in-memory SVG document, then replace `path` atomically.
fn render_svg<F>(path: &Path, size: ChartSize, draw: F) -> Result<(), AnalyzeError>
where
    F: FnOnce(&Canvas<'_>) -> Result<(), AnalyzeError>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (size.width, size.height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }
    write_atomic(path, |file: &mut File| {
        file.write_all(svg.as_bytes())?;
        Ok(())
    })
}

fn category_label(labels: &[String], position: f64) -> String {
    let index = position.round();
    if (position - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    labels.get(index as usize).cloned().unwrap_or_default()
}

fn category_range(count: usize) -> std::ops::Range<f64> {
    -0.5..count as f64 - 0.5
}

/// Histogram bars with an optional density curve already scaled to counts.
pub fn histogram_chart(
    path: &Path,
    size: ChartSize,
    title: &str,
    x_desc: &str,
    histogram: &Histogram,
    density: Option<&[(f64, f64)]>,
) -> Result<(), AnalyzeError> {
    let (Some(&x_min), Some(&x_max)) = (histogram.edges.first(), histogram.edges.last()) else {
        return Err(AnalyzeError::Chart("histogram has no bins".to_string()));
    };
    let max_count = histogram.counts.iter().copied().max().unwrap_or(0) as f64;
    let max_density = density
        .map(|curve| curve.iter().map(|(_, y)| *y).fold(0.0, f64::max))
        .unwrap_or(0.0);
    let y_max = max_count.max(max_density).max(1.0) * 1.1;

    render_svg(path, size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;
        chart
            .configure_mesh()
            .x_desc(x_desc)
            .y_desc("Count")
            .y_label_formatter(&|y: &f64| format!("{y:.0}"))
            .draw()?;

        chart.draw_series(histogram.counts.iter().enumerate().map(|(i, count)| {
            Rectangle::new(
                [
                    (histogram.edges[i], 0.0),
                    (histogram.edges[i + 1], *count as f64),
                ],
                BAR_COLOR.mix(0.75).filled(),
            )
        }))?;
        if let Some(curve) = density {
            chart.draw_series(LineSeries::new(
                curve.iter().copied(),
                KDE_COLOR.stroke_width(3),
            ))?;
        }
        Ok(())
    })
}

/// One vertical bar per category, in the given order.
pub fn bar_chart(
    path: &Path,
    size: ChartSize,
    title: &str,
    x_desc: &str,
    counts: &[(String, u64)],
) -> Result<(), AnalyzeError> {
    if counts.is_empty() {
        return Err(AnalyzeError::EmptyColumn("bar chart categories"));
    }
    let labels: Vec<String> = counts.iter().map(|(label, _)| label.clone()).collect();
    let y_max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1) as f64 * 1.1;
    let formatter = |x: &f64| category_label(&labels, *x);

    render_svg(path, size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(category_range(labels.len()), 0.0..y_max)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&formatter)
            .y_label_formatter(&|y: &f64| format!("{y:.0}"))
            .x_desc(x_desc)
            .y_desc("Count")
            .draw()?;

        chart.draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
            let x = i as f64;
            Rectangle::new(
                [(x - 0.4, 0.0), (x + 0.4, *count as f64)],
                Palette99::pick(i).mix(0.85).filled(),
            )
        }))?;
        Ok(())
    })
}

/// Side-by-side boxplots, one per group, ordered by group name.
pub fn boxplot_chart(
    path: &Path,
    size: ChartSize,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    groups: &BTreeMap<String, Vec<f64>>,
) -> Result<(), AnalyzeError> {
    let boxes: Vec<(String, BoxStats)> = groups
        .iter()
        .filter_map(|(label, values)| Some((label.clone(), box_stats(values)?)))
        .collect();
    if boxes.is_empty() {
        return Err(AnalyzeError::EmptyColumn("boxplot groups"));
    }

    let low = boxes
        .iter()
        .flat_map(|(_, b)| std::iter::once(b.lower_whisker).chain(b.outliers.iter().copied()))
        .fold(f64::INFINITY, f64::min);
    let high = boxes
        .iter()
        .flat_map(|(_, b)| std::iter::once(b.upper_whisker).chain(b.outliers.iter().copied()))
        .fold(f64::NEG_INFINITY, f64::max);
    let pad = ((high - low) * 0.05).max(0.5);
    let labels: Vec<String> = boxes.iter().map(|(label, _)| label.clone()).collect();
    let formatter = |x: &f64| category_label(&labels, *x);

    render_svg(path, size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(category_range(labels.len()), (low - pad)..(high + pad))?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&formatter)
            .x_desc(x_desc)
            .y_desc(y_desc)
            .draw()?;

        for (i, (_, stats)) in boxes.iter().enumerate() {
            let x = i as f64;
            let (left, right) = (x - BOX_HALF_WIDTH, x + BOX_HALF_WIDTH);
            let color = Palette99::pick(i);

            chart.draw_series(std::iter::once(Rectangle::new(
                [(left, stats.q1), (right, stats.q3)],
                color.mix(0.7).filled(),
            )))?;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(left, stats.q1), (right, stats.q3)],
                BLACK.stroke_width(1),
            )))?;

            let cap = BOX_HALF_WIDTH / 2.0;
            let segments = [
                vec![(left, stats.median), (right, stats.median)],
                vec![(x, stats.q3), (x, stats.upper_whisker)],
                vec![(x, stats.q1), (x, stats.lower_whisker)],
                vec![(x - cap, stats.upper_whisker), (x + cap, stats.upper_whisker)],
                vec![(x - cap, stats.lower_whisker), (x + cap, stats.lower_whisker)],
            ];
            chart.draw_series(
                segments
                    .into_iter()
                    .map(|points| PathElement::new(points, BLACK.stroke_width(2))),
            )?;
            chart.draw_series(
                stats
                    .outliers
                    .iter()
                    .map(|value| Circle::new((x, *value), 3, BLACK.stroke_width(1))),
            )?;
        }
        Ok(())
    })
}

/// Stacked proportions per crosstab row, with a legend for the columns.
pub fn stacked_bar_chart(
    path: &Path,
    size: ChartSize,
    title: &str,
    x_desc: &str,
    table: &Crosstab,
) -> Result<(), AnalyzeError> {
    if table.row_labels.is_empty() {
        return Err(AnalyzeError::EmptyColumn("crosstab rows"));
    }
    let formatter = |x: &f64| category_label(&table.row_labels, *x);

    render_svg(path, size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(60)
            .build_cartesian_2d(category_range(table.row_labels.len()), 0.0..1.0)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(table.row_labels.len())
            .x_label_formatter(&formatter)
            .x_desc(x_desc)
            .y_desc("Proportion")
            .draw()?;

        let mut base = vec![0.0; table.row_labels.len()];
        for (j, column) in table.column_labels.iter().enumerate() {
            let color = Palette99::pick(j).to_rgba();
            let bars: Vec<Rectangle<(f64, f64)>> = table
                .proportions
                .iter()
                .enumerate()
                .map(|(i, cells)| {
                    let x = i as f64;
                    let bottom = base[i];
                    base[i] += cells[j];
                    Rectangle::new([(x - 0.4, bottom), (x + 0.4, base[i])], color.filled())
                })
                .collect();
            chart
                .draw_series(bars)?
                .label(column.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(&WHITE.mix(0.85))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    })
}

/// Diverging blue-to-red scale over [-1, 1]; undefined cells are grey.
fn coolwarm(value: f64) -> RGBColor {
    const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
    const MID: (f64, f64, f64) = (221.0, 221.0, 221.0);
    const WARM: (f64, f64, f64) = (180.0, 4.0, 38.0);

    if value.is_nan() {
        return RGBColor(170, 170, 170);
    }
    let t = value.clamp(-1.0, 1.0);
    let (from, to, weight) = if t < 0.0 { (MID, COLD, -t) } else { (MID, WARM, t) };
    let lerp = |a: f64, b: f64| (a + (b - a) * weight).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

/// Annotated correlation heatmap; the first matrix row is drawn at the top.
pub fn correlation_heatmap(
    path: &Path,
    size: ChartSize,
    title: &str,
    matrix: &CorrelationMatrix,
) -> Result<(), AnalyzeError> {
    let n = matrix.columns.len();
    if n == 0 {
        return Err(AnalyzeError::EmptyColumn("correlation columns"));
    }
    let x_formatter = |x: &f64| category_label(&matrix.columns, *x);
    let y_formatter = |y: &f64| {
        let flipped = (n - 1) as f64 - *y;
        category_label(&matrix.columns, flipped)
    };

    render_svg(path, size, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, CAPTION_FONT)
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(130)
            .build_cartesian_2d(category_range(n), category_range(n))?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(n)
            .y_labels(n)
            .x_label_formatter(&x_formatter)
            .y_label_formatter(&y_formatter)
            .draw()?;

        let cells: Vec<(f64, f64, f64)> = matrix
            .values
            .iter()
            .enumerate()
            .flat_map(|(i, row)| {
                let y = (n - 1 - i) as f64;
                row.iter().enumerate().map(move |(j, value)| (j as f64, y, *value))
            })
            .collect();

        chart.draw_series(cells.iter().map(|(x, y, value)| {
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                coolwarm(*value).filled(),
            )
        }))?;
        chart.draw_series(cells.iter().map(|(x, y, value)| {
            let text = if value.is_nan() {
                "NaN".to_string()
            } else {
                format!("{value:.2}")
            };
            let ink = if value.abs() > 0.6 { WHITE } else { BLACK };
            Text::new(
                text,
                (*x, *y),
                ("sans-serif", 22.0)
                    .into_font()
                    .color(&ink)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            )
        }))?;
        Ok(())
    })
}
