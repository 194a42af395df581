//! Inline SVG rendering of the readings chart.
//!
//! Temperature is scaled against the left axis, humidity against the right
//! one. Missing values break a line into separate polylines.

use swissairdry_app::view::{Axis, ChartView, Series};

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 240.0;
const PAD_X: f64 = 48.0;
const PAD_TOP: f64 = 16.0;
const PAD_BOTTOM: f64 = 32.0;
const MAX_TICKS: usize = 5;

/// Pre-computed geometry, every coordinate already formatted for the template.
#[derive(Debug, Clone)]
pub struct SvgChart {
    pub width: u32,
    pub height: u32,
    pub series: Vec<SvgSeries>,
    pub ticks: Vec<TickLabel>,
}

#[derive(Debug, Clone)]
pub struct SvgSeries {
    pub label: &'static str,
    pub color: &'static str,
    /// One `points` attribute per unbroken run of values.
    pub segments: Vec<String>,
    pub markers: Vec<Marker>,
    pub axis: AxisLabels,
}

#[derive(Debug, Clone)]
pub struct Marker {
    pub x: String,
    pub y: String,
}

/// Min/max labels drawn beside the plot area.
#[derive(Debug, Clone)]
pub struct AxisLabels {
    pub x: String,
    pub anchor: &'static str,
    pub top_y: String,
    pub top: String,
    pub bottom_y: String,
    pub bottom: String,
}

#[derive(Debug, Clone)]
pub struct TickLabel {
    pub x: String,
    pub y: String,
    pub text: String,
}

impl SvgChart {
    #[must_use]
    pub fn from_view(view: &ChartView) -> Self {
        let count = view.labels.len();
        let series = [&view.temperature, &view.humidity]
            .into_iter()
            .map(|series| plot(series, count))
            .collect();

        let step = count.div_ceil(MAX_TICKS).max(1);
        let ticks = view
            .labels
            .iter()
            .enumerate()
            .step_by(step)
            .map(|(index, label)| TickLabel {
                x: coord(x_at(index, count)),
                y: coord(HEIGHT - PAD_BOTTOM / 3.0),
                text: label.rsplit(' ').next().unwrap_or(label).to_string(),
            })
            .collect();

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (width, height) = (WIDTH as u32, HEIGHT as u32);
        Self {
            width,
            height,
            series,
            ticks,
        }
    }
}

fn coord(value: f64) -> String {
    format!("{value:.1}")
}

#[allow(clippy::cast_precision_loss)]
fn x_at(index: usize, count: usize) -> f64 {
    let plot_width = WIDTH - 2.0 * PAD_X;
    if count <= 1 {
        return PAD_X + plot_width / 2.0;
    }
    PAD_X + plot_width * index as f64 / (count - 1) as f64
}

fn bounds(points: &[Option<f64>]) -> Option<(f64, f64)> {
    let mut values = points.iter().flatten().copied().filter(|v| v.is_finite());
    let first = values.next()?;
    let (min, max) = values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if (max - min).abs() < f64::EPSILON {
        Some((min - 1.0, max + 1.0))
    } else {
        Some((min, max))
    }
}

fn plot(series: &Series, count: usize) -> SvgSeries {
    let (color, label_x, anchor) = match series.axis {
        Axis::Primary => ("#e4572e", PAD_X - 6.0, "end"),
        Axis::Secondary => ("#2e86de", WIDTH - PAD_X + 6.0, "start"),
    };
    let plot_height = HEIGHT - PAD_TOP - PAD_BOTTOM;

    let mut segments = Vec::new();
    let mut markers = Vec::new();
    let mut run: Vec<String> = Vec::new();
    let (min, max) = bounds(&series.points).unwrap_or((0.0, 1.0));

    for (index, point) in series.points.iter().enumerate() {
        match point.filter(|v| v.is_finite()) {
            Some(value) => {
                let x = coord(x_at(index, count));
                let y = coord(PAD_TOP + (max - value) / (max - min) * plot_height);
                run.push(format!("{x},{y}"));
                markers.push(Marker { x, y });
            }
            None if !run.is_empty() => segments.push(std::mem::take(&mut run).join(" ")),
            None => {}
        }
    }
    if !run.is_empty() {
        segments.push(run.join(" "));
    }

    SvgSeries {
        label: series.label,
        color,
        segments,
        markers,
        axis: AxisLabels {
            x: coord(label_x),
            anchor,
            top_y: coord(PAD_TOP + 4.0),
            top: format!("{max:.1}"),
            bottom_y: coord(HEIGHT - PAD_BOTTOM),
            bottom: format!("{min:.1}"),
        },
    }
}
