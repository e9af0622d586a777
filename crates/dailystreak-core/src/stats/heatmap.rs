//! Terminal rendering of the completion heatmap.
//!
//! Days are laid out seven to a row, oldest first, matching the weekly
//! growth chunks of the report.

use super::aggregate::{AggregateReport, DayCount};

/// Heat intensity of a day relative to the busiest day in the window (0.0-1.0).
pub fn heat_intensity(count: usize, max_count: usize) -> f64 {
    if max_count == 0 {
        return 0.0;
    }
    (count as f64 / max_count as f64).min(1.0)
}

/// Shade character for a day.
pub fn heat_char(count: usize, max_count: usize) -> char {
    if count == 0 {
        return '·';
    }
    let intensity = heat_intensity(count, max_count);
    if intensity <= 0.25 {
        '░'
    } else if intensity <= 0.5 {
        '▒'
    } else if intensity <= 0.75 {
        '▓'
    } else {
        '█'
    }
}

/// Render the heatmap of `report` as text.
pub fn render_ascii(report: &AggregateReport) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\nDaily Completion Heatmap (last {} days)\n",
        report.window_days
    ));
    output.push_str(&"=".repeat(40));
    output.push('\n');

    let total = report.heatmap_total();
    if total == 0 {
        output.push_str("No completions in this window.\n");
        return output;
    }

    output.push_str(&format!("Total completions: {total}\n\n"));

    let max_count = report.max_day_count();
    for row in report.heatmap.chunks(7) {
        if let Some(first) = row.first() {
            output.push_str(&format!("{} ", first.date.short_label()));
        }
        for day in row {
            output.push(heat_char(day.count, max_count));
            output.push(' ');
        }
        output.push('\n');
    }

    output.push('\n');
    output.push_str("Legend: · none  ░ low  ▒ medium  ▓ high  █ peak\n");

    let busiest = busiest_days(&report.heatmap, 3);
    if !busiest.is_empty() {
        output.push_str("\nBusiest days:\n");
        for day in busiest {
            output.push_str(&format!("  {} - {} task(s)\n", day.date, day.count));
        }
    }

    output
}

/// Days with at least one completion, busiest first; ties keep window order.
pub fn busiest_days(heatmap: &[DayCount], limit: usize) -> Vec<&DayCount> {
    let mut days: Vec<&DayCount> = heatmap.iter().filter(|d| d.count > 0).collect();
    days.sort_by(|a, b| b.count.cmp(&a.count));
    days.truncate(limit);
    days
}
