use itertools::Itertools;

use crate::cumulative::CumulativeSample;

/// Expand a sparse cumulative record into drawable vertices.
///
/// The count holds until the next sample, so each sample contributes a
/// horizontal run at the old count followed by a vertical rise. Samples that
/// share a timestamp collapse into one vertical jump.
pub fn step_points(series: &[CumulativeSample]) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(series.len() * 2);
    let Some(first) = series.first() else {
        return points;
    };
    points.push((first.time_secs, first.responses as f64));

    for (prev, next) in series.iter().tuple_windows() {
        if next.responses != prev.responses {
            points.push((next.time_secs, prev.responses as f64));
        }
        points.push((next.time_secs, next.responses as f64));
    }

    points.dedup();
    points
}

/// X (seconds) and Y (responses) bounds for the results chart.
///
/// The y ceiling is fixed so records compare across sessions, but grows when
/// a record would otherwise run off the top.
pub fn compute_chart_params(
    series: &[CumulativeSample],
    duration_secs: f64,
    y_ceiling: u32,
) -> (f64, f64) {
    let highest = series.iter().map(|s| s.responses).max().unwrap_or(0);
    let x_max = duration_secs.max(1.0);
    let y_max = highest.max(y_ceiling).max(1);
    (x_max, y_max as f64)
}

/// Axis labels at start, middle and end.
pub fn axis_labels(max: f64) -> Vec<String> {
    vec![
        format_label(0.0),
        format_label(max / 2.0),
        format_label(max),
    ]
}

/// Seconds labels for the x axis: one every 5 s when they divide the range
/// evenly and fit in `width` columns, otherwise start/middle/end.
pub fn time_axis_labels(x_max: f64, width: u16) -> Vec<String> {
    const STEP_SECS: f64 = 5.0;
    const COLUMNS_PER_LABEL: usize = 5;

    let steps = (x_max / STEP_SECS).round();
    let even = steps >= 2.0 && (steps * STEP_SECS - x_max).abs() < f64::EPSILON;
    let count = steps as usize + 1;
    if !even || count * COLUMNS_PER_LABEL > width as usize {
        return axis_labels(x_max);
    }
    (0..count).map(|i| format_label(i as f64 * STEP_SECS)).collect()
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.1}")
    }
}
