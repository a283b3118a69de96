//! `summary`: what was loaded for each watershed.

use std::io::Write;
use wsd_db::models::SourceStatus;

use crate::Session;

fn status_line(status: &SourceStatus) -> String {
    let path = status.path.as_deref().unwrap_or("-");
    match (&status.path, status.loaded) {
        (None, _) => format!("  {:<10} not configured", status.kind.as_str()),
        (Some(_), true) => format!(
            "  {:<10} loaded  {:>7} rows  {}",
            status.kind.as_str(),
            status.rows,
            path
        ),
        (Some(_), false) => format!(
            "  {:<10} FAILED  {}: {}",
            status.kind.as_str(),
            path,
            status.message.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        return "(none)".to_string();
    }
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn write_summary(session: &Session, out: &mut impl Write) -> anyhow::Result<()> {
    let statuses = session.db.source_statuses()?;
    for options in &session.catalog.watersheds {
        writeln!(out, "{}", options.name)?;
        for status in statuses.iter().filter(|s| s.watershed == options.name) {
            writeln!(out, "{}", status_line(status))?;
        }
        writeln!(out, "  years: {}", join(&options.years))?;
        writeln!(out, "  color fields: {}", join(&options.color_fields))?;
    }
    let failed = statuses.iter().filter(|s| s.path.is_some() && !s.loaded).count();
    if failed > 0 {
        log::warn!("{} data file(s) failed to load", failed);
    }
    Ok(())
}
