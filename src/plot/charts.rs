//! Chart primitives drawn with plotters on SVG backends

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::algorithm::contingency::ContingencyTable;
use crate::models::AppointmentStatus;

pub type ChartResult = Result<(), Box<dyn Error>>;

/// Pale green
pub const SHOWED_COLOR: RGBColor = RGBColor(152, 251, 152);
/// Pink
pub const NO_SHOW_COLOR: RGBColor = RGBColor(255, 192, 203);
pub const CHART_SIZE: (u32, u32) = (1024, 640);

const FONT: &str = "sans-serif";
const MAX_CATEGORY_LABELS: usize = 24;

#[must_use]
pub const fn status_color(status: AppointmentStatus) -> RGBColor {
    match status {
        AppointmentStatus::Showed => SHOWED_COLOR,
        AppointmentStatus::NoShow => NO_SHOW_COLOR,
    }
}

fn segment_label(value: &SegmentValue<u32>, labels: &[String]) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
        _ => String::new(),
    }
}

fn upper_bound(max: f64) -> f64 {
    if max > 0.0 { max * 1.1 } else { 1.0 }
}

/// One bar per category
///
/// # Arguments
/// * `path` - Output SVG file
/// * `title` - Chart caption
/// * `labels` - Category labels, left to right
/// * `values` - Bar heights, same order as `labels`
/// * `y_desc` - Y axis description
/// * `color` - Bar fill
pub fn category_bars(
    path: &Path,
    title: &str,
    labels: &[String],
    values: &[f64],
    y_desc: &str,
    color: RGBColor,
) -> ChartResult {
    let n = u32::try_from(labels.len())?;
    let y_max = upper_bound(values.iter().copied().fold(0.0, f64::max));

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..n).into_segmented(), 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc(y_desc)
        .x_labels(labels.len().min(MAX_CATEGORY_LABELS))
        .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(v, labels))
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(color.filled())
            .margin(8)
            .data((0u32..).zip(values.iter().copied())),
    )?;

    root.present()?;
    Ok(())
}

/// Row-normalized stacked bars of a contingency table
///
/// The no-show share sits on top of the showed share so every bar reaches 1.
pub fn stacked_proportions(path: &Path, title: &str, table: &ContingencyTable) -> ChartResult {
    let labels: Vec<String> = table.rows.iter().map(|r| r.label.clone()).collect();
    let n = u32::try_from(labels.len())?;
    let shares = table.row_proportions();

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..n).into_segmented(), 0.0f64..1.0f64)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(table.variable.as_str())
        .y_desc("share of appointments")
        .x_labels(labels.len().min(MAX_CATEGORY_LABELS))
        .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(v, &labels))
        .draw()?;

    // Full-height no-show bars, then the showed share drawn over them
    let no_show_total: Vec<f64> = shares
        .iter()
        .map(|s| if s[0] + s[1] > 0.0 { 1.0 } else { 0.0 })
        .collect();
    for (status, heights) in [
        (AppointmentStatus::NoShow, no_show_total),
        (AppointmentStatus::Showed, shares.iter().map(|s| s[0]).collect()),
    ] {
        let color = status_color(status);
        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(color.filled())
                    .margin(2)
                    .data((0u32..).zip(heights)),
            )?
            .label(status.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Overlaid histograms of a numeric column per status
///
/// # Arguments
/// * `showed` / `no_show` - Values of each group
/// * `bin_width` - Width of a histogram bin in column units
pub fn overlaid_histogram(
    path: &Path,
    title: &str,
    x_desc: &str,
    showed: &[f64],
    no_show: &[f64],
    bin_width: f64,
) -> ChartResult {
    let all = showed.iter().chain(no_show);
    let x_min = all.clone().copied().fold(f64::INFINITY, f64::min);
    let x_max = all.copied().fold(f64::NEG_INFINITY, f64::max);
    if !x_min.is_finite() || !x_max.is_finite() {
        return Err("no values to plot".into());
    }
    let start = (x_min / bin_width).floor() * bin_width;

    let bins = |values: &[f64]| -> Vec<(f64, f64)> {
        let mut counts: std::collections::BTreeMap<i64, f64> = std::collections::BTreeMap::new();
        for v in values {
            #[allow(clippy::cast_possible_truncation)]
            let bin = ((v - start) / bin_width).floor() as i64;
            *counts.entry(bin).or_insert(0.0) += 1.0;
        }
        counts
            .into_iter()
            .map(|(bin, count)| (start + bin as f64 * bin_width, count))
            .collect()
    };
    let series = [
        (AppointmentStatus::Showed, bins(showed)),
        (AppointmentStatus::NoShow, bins(no_show)),
    ];
    let y_max = upper_bound(
        series
            .iter()
            .flat_map(|(_, b)| b.iter().map(|(_, c)| *c))
            .fold(0.0, f64::max),
    );

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(start..(x_max + bin_width), 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("appointments")
        .draw()?;

    for (status, counts) in series {
        let color = status_color(status);
        chart
            .draw_series(counts.into_iter().map(|(x0, count)| {
                Rectangle::new([(x0, 0.0), (x0 + bin_width, count)], color.mix(0.6).filled())
            }))?
            .label(status.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Showed and no-show counts per category as two lines
pub fn status_lines(path: &Path, title: &str, table: &ContingencyTable) -> ChartResult {
    let labels: Vec<String> = table.rows.iter().map(|r| r.label.clone()).collect();
    let n = u32::try_from(labels.len())?;
    let y_max = upper_bound(
        table
            .rows
            .iter()
            .map(|r| r.showed.max(r.no_show) as f64)
            .fold(0.0, f64::max),
    );

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..n).into_segmented(), 0.0..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(table.variable.as_str())
        .y_desc("appointments")
        .x_labels(labels.len().min(MAX_CATEGORY_LABELS))
        .x_label_formatter(&|v: &SegmentValue<u32>| segment_label(v, &labels))
        .draw()?;

    for status in AppointmentStatus::ALL {
        let legend_color = status_color(status);
        let color = legend_color.stroke_width(3);
        let points: Vec<(SegmentValue<u32>, f64)> = (0u32..)
            .zip(&table.rows)
            .map(|(i, row)| (SegmentValue::CenterOf(i), row.counts()[status.index()] as f64))
            .collect();
        chart
            .draw_series(LineSeries::new(points, color))?
            .label(status.label())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], legend_color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Side-by-side bars of showed and no-show counts at integer x positions
pub fn grouped_counts(
    path: &Path,
    title: &str,
    x_desc: &str,
    points: &[(i64, [u64; 2])],
) -> ChartResult {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err("no values to plot".into());
    };
    let x_range = (first.0 as f64 - 1.0)..(last.0 as f64 + 1.0);
    let y_max = upper_bound(
        points
            .iter()
            .map(|(_, c)| c[0].max(c[1]) as f64)
            .fold(0.0, f64::max),
    );

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc("appointments")
        .draw()?;

    for status in AppointmentStatus::ALL {
        let color = status_color(status);
        let offset = if status.is_no_show() { 0.0 } else { -0.45 };
        chart
            .draw_series(points.iter().map(|(x, counts)| {
                let x0 = *x as f64 + offset;
                Rectangle::new(
                    [(x0, 0.0), (x0 + 0.45, counts[status.index()] as f64)],
                    color.filled(),
                )
            }))?
            .label(status.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
