//! Text and bar chart rendering of query results
//!
//! Text rendering is cheap and runs inline. Chart layout runs on its own
//! [`Worker`] (see [`chart_worker`]) so a large result never stalls input
//! handling; a new request for a different width or new data simply replaces
//! one that has not been started yet.

use crate::error::Result;
use crate::latest::Worker;
use crate::query::Sample;
use serde::{Deserialize, Serialize};

/// Shade ramp from the lowest to the highest value
const SHADES: [char; 4] = ['░', '▒', '▓', '█'];

/// Separator between the label column and the bars
const AXIS: &str = " │";

/// Render samples as text, one per line, sorted lexicographically
pub fn render_text(samples: &[Sample]) -> Vec<String> {
    let mut lines: Vec<String> = samples.iter().map(|s| s.to_string()).collect();
    lines.sort();
    lines
}

/// Order of the bars in a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartSort {
    /// Alphabetical by metric
    #[default]
    Label,
    /// Largest value first
    Value,
}

/// Input to the chart renderer
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest {
    pub samples: Vec<Sample>,
    /// Total width in columns
    pub width: usize,
    pub sort: ChartSort,
}

/// A laid-out chart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartFrame {
    pub lines: Vec<String>,
    /// Width the frame was laid out for
    pub width: usize,
}

impl ChartFrame {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Lay out a horizontal bar chart.
///
/// Bar length is proportional to the absolute value relative to the largest
/// absolute value; the shade reflects where the value sits between the
/// minimum and maximum.
pub fn render_chart(request: &ChartRequest) -> ChartFrame {
    if request.samples.is_empty() {
        return ChartFrame {
            lines: Vec::new(),
            width: request.width,
        };
    }

    let mut samples: Vec<&Sample> = request.samples.iter().collect();
    match request.sort {
        ChartSort::Label => samples.sort_by(|a, b| a.metric.cmp(&b.metric)),
        ChartSort::Value => samples.sort_by(|a, b| b.value.total_cmp(&a.value)),
    }

    let finite = || samples.iter().map(|s| s.value).filter(|v| v.is_finite());
    let min = finite().fold(f64::INFINITY, f64::min);
    let max = finite().fold(f64::NEG_INFINITY, f64::max);
    let max_abs = finite().map(f64::abs).fold(0.0, f64::max);

    let values: Vec<String> = samples.iter().map(|s| s.value.to_string()).collect();
    let label_width = samples
        .iter()
        .map(|s| s.metric.chars().count())
        .max()
        .unwrap_or(0);
    let value_width = values.iter().map(|v| v.chars().count()).max().unwrap_or(0);
    let bar_width = request
        .width
        .saturating_sub(label_width + AXIS.chars().count() + value_width + 1)
        .max(1);

    let lines = samples
        .iter()
        .zip(&values)
        .map(|(sample, value)| {
            let (len, fill) = if sample.value.is_finite() {
                (bar_len(sample.value, max_abs, bar_width), shade(sample.value, min, max))
            } else {
                (0, SHADES[0])
            };
            let bar: String = std::iter::repeat(fill).take(len).collect();
            format!(
                "{:<label_width$}{}{}{} {:>value_width$}",
                sample.metric,
                AXIS,
                bar,
                " ".repeat(bar_width - len),
                value,
            )
        })
        .collect();

    ChartFrame {
        lines,
        width: request.width,
    }
}

fn bar_len(value: f64, max_abs: f64, bar_width: usize) -> usize {
    if max_abs <= 0.0 {
        return 0;
    }
    let len = (value.abs() / max_abs * bar_width as f64).round() as usize;
    len.min(bar_width)
}

fn shade(value: f64, min: f64, max: f64) -> char {
    if max <= min {
        return SHADES[SHADES.len() - 1];
    }
    let t = (value - min) / (max - min);
    let idx = (t * (SHADES.len() - 1) as f64).round() as usize;
    SHADES[idx.min(SHADES.len() - 1)]
}

/// Spawn the chart layout worker
pub fn chart_worker() -> Result<Worker<ChartRequest, ChartFrame>> {
    Worker::with_name("chart-renderer", |request: ChartRequest| {
        let frame = render_chart(&request);
        tracing::trace!(bars = frame.lines.len(), width = frame.width, "Chart laid out");
        frame
    })
}
