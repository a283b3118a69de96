//! `export`: save a download for the target selection into a directory.

use anyhow::Context;
use std::io::Write;
use std::path::Path;
use wsd_data::{ExportKind, View};

use crate::{Session, Target};

pub fn run_export(
    session: &Session,
    kind: ExportKind,
    target: &Target,
    dir: &Path,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(sel) = session.selection(target) else {
        writeln!(out, "Unknown watershed")?;
        return Ok(());
    };
    match kind.build(&session.db, &sel) {
        View::Ready(download) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let path = dir.join(&download.filename);
            std::fs::write(&path, &download.bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("export: wrote {} bytes", download.bytes.len());
            writeln!(out, "{}", path.display())?;
        }
        View::Placeholder(p) => writeln!(out, "{}", p.message)?,
    }
    Ok(())
}
