//! Horizontal bar charts drawn with plain HTML.
//!
//! The backend sends already aggregated rows, so the charts only scale
//! them: [proportional_widths] against the largest value and
//! [share_percentages] against the total.

use maud::{Markup, html};

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    /// The text to the left of the bar, e.g. a date.
    pub label: String,
    /// The value the bar length is computed from.
    pub value: f64,
    /// The text to the right of the bar, e.g. "12 bookings".
    pub caption: String,
}

/// The width of each bar as a percentage of the largest value.
///
/// If the largest value is not positive every width is zero.
pub fn proportional_widths(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max.is_nan() || max <= 0.0 {
        return vec![0.0; values.len()];
    }

    values
        .iter()
        .map(|value| (value / max * 100.0).clamp(0.0, 100.0))
        .collect()
}

/// Each value as a percentage of the sum of the values.
///
/// If the sum is not positive every share is zero.
pub fn share_percentages(values: &[f64]) -> Vec<f64> {
    let total: f64 = values.iter().sum();

    if total.is_nan() || total <= 0.0 {
        return vec![0.0; values.len()];
    }

    values.iter().map(|value| value / total * 100.0).collect()
}

fn bar_row(label: &str, width: f64, caption: &str, fill_style: &str) -> Markup {
    html! {
        div class="grid grid-cols-[8rem_1fr_7rem] items-center gap-3 text-sm" data-chart-bar
        {
            span class="truncate" title=(label) { (label) }

            div
                class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-3"
                role="progressbar"
                aria-valuenow=(format!("{width:.1}"))
                aria-valuemin="0"
                aria-valuemax="100"
            {
                div class=(fill_style) style=(format!("width: {width:.1}%")) {}
            }

            span class="text-right text-gray-600 dark:text-gray-400" { (caption) }
        }
    }
}

fn chart_frame(title: &str, bars: Markup) -> Markup {
    html! {
        div class="space-y-2" data-chart
        {
            h4 class="font-semibold mb-2" { (title) }
            (bars)
        }
    }
}

/// A chart where the longest bar is the largest value.
pub fn bar_chart(title: &str, bars: &[ChartBar]) -> Markup {
    let values: Vec<f64> = bars.iter().map(|bar| bar.value).collect();
    let widths = proportional_widths(&values);

    chart_frame(
        title,
        html! {
            @for (bar, width) in bars.iter().zip(widths) {
                (bar_row(&bar.label, width, &bar.caption, "bg-blue-600 dark:bg-blue-500 h-3 rounded-full"))
            }
        },
    )
}

/// A chart of each value's share of the total, captioned with the
/// percentage, e.g. "42.5%".
pub fn share_chart(title: &str, slices: &[(String, f64)]) -> Markup {
    let values: Vec<f64> = slices.iter().map(|(_, value)| *value).collect();
    let shares = share_percentages(&values);

    chart_frame(
        title,
        html! {
            @for ((label, _), share) in slices.iter().zip(shares) {
                (bar_row(label, share, &format!("{share:.1}%"), "bg-cyan-600 dark:bg-cyan-500 h-3 rounded-full"))
            }
        },
    )
}
