//! Chart construction helpers for the catalog report.
//!
//! Native xlsx charts read their series from worksheet cells, so every chart
//! is backed by a labelled data region written into a hidden column pair.

use rust_xlsxwriter::{
    Chart, ChartFormat, ChartLegendPosition, ChartLine, ChartMarker, ChartMarkerType,
    ChartSeries, ChartSolidFill, ChartType, Worksheet, XlsxError,
};

/// Series fill for the price galleries.
pub const SERIES_FILL: &str = "#15A9AB";
/// Series fill for the per-category histogram.
pub const HISTOGRAM_FILL: &str = "#1290A6";
/// Line color for the line charts.
pub const LINE_COLOR: &str = "#000000";

/// A labelled numeric series written into a worksheet data region.
#[derive(Debug, Clone)]
pub struct Series {
    pub name: String,
    pub sheet: String,
    pub first_row: u32,
    pub labels_col: u16,
    pub values_col: u16,
    pub len: u32,
}

impl Series {
    fn last_row(&self) -> u32 {
        self.first_row + self.len.saturating_sub(1)
    }
}

/// Write `points` as a label/value column pair starting at `first_row`,
/// returning the range description charts anchor to.
pub fn write_series(
    ws: &mut Worksheet,
    sheet: &str,
    name: &str,
    first_row: u32,
    labels_col: u16,
    points: &[(String, f64)],
) -> Result<Series, XlsxError> {
    for (i, (label, value)) in points.iter().enumerate() {
        let row = first_row + i as u32;
        ws.write_string(row, labels_col, label)?;
        ws.write_number(row, labels_col + 1, *value)?;
    }
    Ok(Series {
        name: name.to_string(),
        sheet: sheet.to_string(),
        first_row,
        labels_col,
        values_col: labels_col + 1,
        len: points.len() as u32,
    })
}

fn attach_series<'a>(chart: &'a mut Chart, series: &Series) -> &'a mut ChartSeries {
    chart
        .add_series()
        .set_name(series.name.as_str())
        .set_categories((
            series.sheet.as_str(),
            series.first_row,
            series.labels_col,
            series.last_row(),
            series.labels_col,
        ))
        .set_values((
            series.sheet.as_str(),
            series.first_row,
            series.values_col,
            series.last_row(),
            series.values_col,
        ))
}

/// Vertical bar chart over the series.
pub fn bar(series: &Series, title: &str, x_title: &str, y_title: &str) -> Chart {
    let mut chart = Chart::new(ChartType::Column);
    attach_series(&mut chart, series).set_format(
        ChartFormat::new().set_solid_fill(ChartSolidFill::new().set_color(SERIES_FILL)),
    );
    chart.title().set_name(title);
    chart.x_axis().set_name(x_title);
    chart.y_axis().set_name(y_title);
    chart.legend().set_position(ChartLegendPosition::Right);
    chart
}

/// Line chart with point markers over the series.
pub fn line(series: &Series, title: &str, x_title: &str, y_title: &str) -> Chart {
    let mut chart = Chart::new(ChartType::Line);
    attach_series(&mut chart, series)
        .set_marker(ChartMarker::new().set_type(ChartMarkerType::Circle))
        .set_format(ChartFormat::new().set_line(ChartLine::new().set_color(LINE_COLOR)));
    chart.title().set_name(title);
    chart.x_axis().set_name(x_title);
    chart.y_axis().set_name(y_title);
    chart.legend().set_position(ChartLegendPosition::Right);
    chart
}

/// Pie chart over the series.
pub fn pie(series: &Series, title: &str) -> Chart {
    let mut chart = Chart::new(ChartType::Pie);
    attach_series(&mut chart, series);
    chart.title().set_name(title);
    chart.legend().set_position(ChartLegendPosition::Right);
    chart
}

/// Histogram-style column chart (one bin per category).
pub fn histogram(series: &Series, title: &str, x_title: &str, y_title: &str) -> Chart {
    let mut chart = Chart::new(ChartType::Column);
    attach_series(&mut chart, series).set_format(
        ChartFormat::new().set_solid_fill(ChartSolidFill::new().set_color(HISTOGRAM_FILL)),
    );
    chart.title().set_name(title);
    chart.x_axis().set_name(x_title);
    chart.y_axis().set_name(y_title);
    chart.legend().set_hidden();
    chart
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> Vec<(String, f64)> {
        vec![
            ("Alpha".to_string(), 10.0),
            ("Beta".to_string(), 20.5),
            ("Gamma".to_string(), 30.0),
        ]
    }

    #[test]
    fn write_series_reports_range() {
        let mut ws = Worksheet::new();
        let series =
            write_series(&mut ws, "Statistics", "Price", 0, 51, &points()).expect("write series");
        assert_eq!(series.len, 3);
        assert_eq!(series.values_col, 52);
        assert_eq!(series.last_row(), 2);
    }

    #[test]
    fn chart_builders_accept_series() {
        let mut ws = Worksheet::new();
        let series =
            write_series(&mut ws, "Statistics", "Price", 0, 51, &points()).expect("write series");
        // Construction must not panic; insertion is covered by the report test.
        let _ = bar(&series, "t", "x", "y");
        let _ = line(&series, "t", "x", "y");
        let _ = pie(&series, "t");
        let _ = histogram(&series, "t", "x", "y");
    }
}
