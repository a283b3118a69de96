//! `view`: one derived view as pretty JSON.

use serde::Serialize;
use std::io::Write;
use wsd_data::views::{discharge_chart, et_chart, et_table, watershed_map};

use crate::{Session, Target, ViewKind};

fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_view(
    session: &Session,
    kind: ViewKind,
    target: &Target,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let Some(sel) = session.selection(target) else {
        writeln!(out, "Unknown watershed")?;
        return Ok(());
    };
    let db = &session.db;
    match kind {
        ViewKind::EtChart => write_json(out, &et_chart(db, &sel)),
        ViewKind::DischargeChart => write_json(out, &discharge_chart(db, &sel)),
        ViewKind::Table => write_json(out, &et_table(db, &sel, session.config.preview_rows)),
        ViewKind::Map => write_json(out, &watershed_map(db, &sel)),
    }
}
