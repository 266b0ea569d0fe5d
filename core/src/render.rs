//! Text and JSON rendering of screen reports.

use crate::{
    error::DashResult,
    screens::{ScreenReport, Section, Table},
};
use std::fmt::Write;

/// Fixed-point with `decimals` places. Never prints a negative zero.
pub fn fmt_fixed(value: f64, decimals: usize) -> String {
    let s = format!("{value:.decimals$}");
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        s[1..].to_string()
    } else {
        s
    }
}

pub fn fmt_pct(value: f64, decimals: usize) -> String {
    format!("{}%", fmt_fixed(value, decimals))
}

/// Whole currency units with thousands separators, e.g. `$1,234,568`.
pub fn fmt_money(value: f64) -> String {
    let rounded = fmt_fixed(value, 0);
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}${grouped}")
}

pub fn render_json(report: &ScreenReport) -> DashResult<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_text(report: &ScreenReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} ===", report.title.to_uppercase());
    let _ = writeln!(out, "{}", report.subtitle);

    for section in &report.sections {
        out.push('\n');
        match section {
            Section::Kpis { tiles } => {
                let width = tiles.iter().map(|t| t.title.chars().count()).max().unwrap_or(0);
                for t in tiles {
                    let pad = width - t.title.chars().count();
                    let _ = writeln!(
                        out,
                        "  {}:{} {:>12}   ({})",
                        t.title.to_uppercase(),
                        " ".repeat(pad),
                        t.value,
                        t.detail
                    );
                }
            }
            Section::Table { heading, table } => {
                let _ = writeln!(out, "### {heading}");
                render_table(&mut out, table);
            }
            Section::Notice { heading, message } => {
                if let Some(h) = heading {
                    let _ = writeln!(out, "### {h}");
                }
                let _ = writeln!(out, "  [!] {message}");
            }
            Section::Notes { heading, items } => {
                let _ = writeln!(out, "{heading}:");
                for item in items {
                    let _ = writeln!(out, "  - {item}");
                }
            }
        }
    }
    out
}

fn render_table(out: &mut String, table: &Table) {
    if table.rows.is_empty() {
        let _ = writeln!(out, "  (no rows)");
        return;
    }
    let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
    for row in &table.rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        let mut s = String::from(" ");
        for (cell, w) in cells.iter().zip(&widths) {
            let pad = w - cell.chars().count();
            let _ = write!(s, " {cell}{} |", " ".repeat(pad));
        }
        s.pop();
        s.trim_end().to_string()
    };

    let _ = writeln!(out, "{}", line(&table.columns));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", line(&rule));
    for row in &table.rows {
        let _ = writeln!(out, "{}", line(row));
    }
    let _ = writeln!(out, "  ({} rows)", table.rows.len());
}
