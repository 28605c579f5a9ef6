use std::fmt::Write;

use crate::filter::{Filters, ALL};
use crate::models::{View, ViewItem};

/// Paired-series tables in the markdown report stop after this many records.
const SERIES_ROW_CAP: usize = 20;

/// Renders all six views as one markdown report.
pub fn build_report(filters: &Filters, record_count: usize, views: &[View]) -> String {
    let mut output = String::new();
    let region = filters.region.as_deref().unwrap_or(ALL);
    let persona = filters.persona.as_deref().unwrap_or(ALL);

    let _ = writeln!(output, "# Mission App Internal Dashboard");
    let _ = writeln!(
        output,
        "Region: {region} | Persona: {persona} | Records: {record_count}"
    );

    for view in views {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", view.title);
        write_items(&mut output, view);
    }

    output
}

fn write_items(output: &mut String, view: &View) {
    for item in &view.items {
        match item {
            ViewItem::Metric { label, value } => {
                let _ = writeln!(output, "- {label}: {value}");
            }
            ViewItem::BarChart { title, bars } => {
                let _ = writeln!(output);
                let _ = writeln!(output, "### {title}");
                if bars.is_empty() {
                    let _ = writeln!(output, "No records in this selection.");
                }
                for (label, count) in bars {
                    let _ = writeln!(output, "- {label}: {count}");
                }
            }
            ViewItem::TimeSeries { title, points } => {
                let _ = writeln!(output);
                let _ = writeln!(output, "### {title}");
                if points.is_empty() {
                    let _ = writeln!(output, "No records in this selection.");
                }
                for (month, count) in points {
                    let _ = writeln!(output, "- {month}: {count}");
                }
            }
            ViewItem::SeriesChart { title, series } => {
                let _ = writeln!(output);
                let _ = writeln!(output, "### {title}");
                let rows = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
                if rows == 0 {
                    let _ = writeln!(output, "No records in this selection.");
                    continue;
                }

                let _ = write!(output, "| # |");
                for s in series {
                    let _ = write!(output, " {} |", s.name);
                }
                let _ = writeln!(output);
                let _ = writeln!(output, "|---|{}", "---|".repeat(series.len()));

                for row in 0..rows.min(SERIES_ROW_CAP) {
                    let _ = write!(output, "| {} |", row + 1);
                    for s in series {
                        match s.values.get(row) {
                            Some(value) => {
                                let _ = write!(output, " {value:.2} |");
                            }
                            None => {
                                let _ = write!(output, " |");
                            }
                        }
                    }
                    let _ = writeln!(output);
                }
                if rows > SERIES_ROW_CAP {
                    let _ = writeln!(output, "... and {} more records", rows - SERIES_ROW_CAP);
                }
            }
            ViewItem::Table {
                title,
                headers,
                rows,
            } => {
                let _ = writeln!(output);
                let _ = writeln!(output, "### {title}");
                if rows.is_empty() {
                    let _ = writeln!(output, "No records in this selection.");
                    continue;
                }

                let _ = writeln!(output, "| {} |", headers.join(" | "));
                let _ = writeln!(output, "|{}", "---|".repeat(headers.len()));
                for row in rows {
                    let _ = writeln!(output, "| {} |", row.join(" | "));
                }
            }
        }
    }
}

/// Plain-text rendering of a single view, for the `summary` subcommand.
pub fn render_view_text(view: &View) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "{}", view.title);

    for item in &view.items {
        match item {
            ViewItem::Metric { label, value } => {
                let _ = writeln!(output, "  {label}: {value}");
            }
            ViewItem::BarChart { title, bars } => {
                let _ = writeln!(output, "  {title}:");
                if bars.is_empty() {
                    let _ = writeln!(output, "    (no records)");
                }
                for (label, count) in bars {
                    let _ = writeln!(output, "    {label}: {count}");
                }
            }
            ViewItem::TimeSeries { title, points } => {
                let _ = writeln!(output, "  {title}:");
                if points.is_empty() {
                    let _ = writeln!(output, "    (no records)");
                }
                for (month, count) in points {
                    let _ = writeln!(output, "    {month}: {count}");
                }
            }
            ViewItem::SeriesChart { title, series } => {
                let _ = writeln!(output, "  {title}:");
                for s in series {
                    let rendered: Vec<String> =
                        s.values.iter().map(|v| format!("{v:.2}")).collect();
                    let _ = writeln!(output, "    {}: [{}]", s.name, rendered.join(", "));
                }
            }
            ViewItem::Table {
                title,
                headers,
                rows,
            } => {
                let _ = writeln!(output, "  {title}:");
                let _ = writeln!(output, "    {}", headers.join(" / "));
                if rows.is_empty() {
                    let _ = writeln!(output, "    (no records)");
                }
                for row in rows {
                    let _ = writeln!(output, "    {}", row.join(" / "));
                }
            }
        }
    }

    output
}
