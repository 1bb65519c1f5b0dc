// Report generation from crawl rows

use crate::aggregate::CrawlRow;
use chrono::{NaiveDateTime, TimeDelta};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Html,
    Json,
}

const HEADERS: [&str; 5] = ["modified", "age", "kind", "name", "url"];

pub fn render(
    format: ReportFormat,
    rows: &[CrawlRow],
    now: NaiveDateTime,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(render_text(rows, now)),
        ReportFormat::Html => Ok(render_html(rows, now)),
        ReportFormat::Json => render_json(rows),
    }
}

fn kind_label(row: &CrawlRow) -> &'static str {
    if row.is_file { "file" } else { "dir" }
}

fn cells(row: &CrawlRow, now: NaiveDateTime) -> [String; 5] {
    [
        row.modified_display(),
        row.age(now).map(format_age).unwrap_or_else(|| "-".to_string()),
        kind_label(row).to_string(),
        row.name.clone(),
        row.url.clone(),
    ]
}

/// Plain aligned table, one row per line.
pub fn render_text(rows: &[CrawlRow], now: NaiveDateTime) -> String {
    if rows.is_empty() {
        return "(no entries)\n".to_string();
    }

    let table: Vec<[String; 5]> = rows.iter().map(|r| cells(r, now)).collect();
    let mut widths = HEADERS.map(|h| h.chars().count());
    for line in &table {
        for (width, cell) in widths.iter_mut().zip(line.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut report = String::new();
    push_text_line(&mut report, &HEADERS.map(str::to_string), &widths);
    push_text_line(&mut report, &widths.map(|w| "-".repeat(w)), &widths);
    for line in &table {
        push_text_line(&mut report, line, &widths);
    }
    report
}

fn push_text_line(report: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let last = cells.len() - 1;
    for (i, (cell, width)) in cells.iter().zip(widths.iter()).enumerate() {
        if i == last {
            report.push_str(cell);
        } else {
            let pad = width.saturating_sub(cell.chars().count());
            report.push_str(cell);
            report.push_str(&" ".repeat(pad + 2));
        }
    }
    report.push('\n');
}

/// A standalone `<table>` with the URL column rendered as links.
pub fn render_html(rows: &[CrawlRow], now: NaiveDateTime) -> String {
    let mut report = String::new();
    report.push_str("<table class=\"dirwatch\">\n  <thead>\n    <tr>");
    for header in HEADERS {
        report.push_str(&format!("<th>{}</th>", header));
    }
    report.push_str("</tr>\n  </thead>\n  <tbody>\n");

    for row in rows {
        let [modified, age, kind, name, url] = cells(row, now);
        report.push_str(&format!(
            "    <tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href=\"{}\">{}</a></td></tr>\n",
            kind,
            encode_text(&modified),
            encode_text(&age),
            kind,
            encode_text(&name),
            encode_double_quoted_attribute(&url),
            encode_text(&url),
        ));
    }

    report.push_str("  </tbody>\n</table>\n");
    report
}

pub fn render_json(rows: &[CrawlRow]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(rows)
}

/// Compact age: `3d 04h`, `5h 12m`, `42m`, `just now`.
pub fn format_age(age: TimeDelta) -> String {
    if age < TimeDelta::zero() {
        return "in the future".to_string();
    }

    let days = age.num_days();
    let hours = age.num_hours() % 24;
    let minutes = age.num_minutes() % 60;

    if days > 0 {
        format!("{}d {:02}h", days, hours)
    } else if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        "just now".to_string()
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
