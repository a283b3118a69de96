//! Command implementations for the watershed dashboard CLI.
//!
//! Every command loads the configured watersheds into a fresh registry,
//! builds the selection catalog and then answers from the same view and
//! export functions the web dashboard uses.

use anyhow::Context;
use clap::{Args, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use wsd_core::DashboardConfig;
use wsd_data::{ExportKind, SelectionCatalog, SelectionEvent, SelectionState};
use wsd_db::Database;

pub mod export;
pub mod summary;
pub mod view;

#[derive(Subcommand)]
pub enum Command {
    /// List watersheds, the load status of each data file, and available years
    Summary,

    /// Print one derived view as JSON
    View {
        #[arg(value_enum)]
        view: ViewKind,

        #[command(flatten)]
        target: Target,
    },

    /// Write a CSV or ZIP download for a watershed and year
    Export {
        #[arg(value_enum)]
        kind: ExportArg,

        #[command(flatten)]
        target: Target,

        /// Directory the file is written into
        #[arg(short = 'o', long, default_value = ".")]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewKind {
    EtChart,
    DischargeChart,
    Table,
    Map,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportArg {
    Et,
    Discharge,
    All,
}

impl From<ExportArg> for ExportKind {
    fn from(arg: ExportArg) -> Self {
        match arg {
            ExportArg::Et => ExportKind::Et,
            ExportArg::Discharge => ExportKind::Discharge,
            ExportArg::All => ExportKind::All,
        }
    }
}

/// Which watershed, year and colour field a command looks at.
#[derive(Debug, Clone, Default, Args)]
pub struct Target {
    /// Watershed name (defaults to the first configured)
    #[arg(short = 'w', long)]
    pub watershed: Option<String>,

    /// Year (defaults to the watershed's earliest ET year)
    #[arg(short = 'y', long)]
    pub year: Option<i32>,

    /// Map colour field (defaults to the preferred field, else the first attribute)
    #[arg(short = 'f', long)]
    pub field: Option<String>,
}

/// A loaded registry with its catalog and settings.
pub struct Session {
    pub config: DashboardConfig,
    pub db: Database,
    pub catalog: SelectionCatalog,
}

impl Session {
    /// Load every watershed named in the config file at `path`.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let config = DashboardConfig::from_path(path)?;
        Self::from_config(config)
    }

    pub fn from_config(config: DashboardConfig) -> anyhow::Result<Self> {
        let db = Database::new().context("failed to create registry")?;
        db.load_watersheds(&config)?;
        let catalog = SelectionCatalog::from_database(&db, &config.preferred_color_field)?;
        Ok(Self {
            config,
            db,
            catalog,
        })
    }

    /// Selection for `target`, or `None` when the watershed is not registered.
    ///
    /// Omitted values take the cascade defaults; given ones are used as-is.
    pub fn selection(&self, target: &Target) -> Option<SelectionState> {
        let mut sel = SelectionState::initial(&self.catalog);
        if let Some(name) = &target.watershed {
            self.catalog.get(name)?;
            sel = sel.apply(&self.catalog, SelectionEvent::WatershedChanged(name.clone()));
        }
        sel.watershed.as_ref()?;
        if let Some(year) = target.year {
            sel.year = Some(year);
        }
        if let Some(field) = &target.field {
            sel.color_field = Some(field.clone());
        }
        Some(sel)
    }
}

pub fn run(config: &Path, command: Command) -> anyhow::Result<()> {
    let session = Session::open(config)?;
    let mut stdout = std::io::stdout().lock();
    match command {
        Command::Summary => summary::write_summary(&session, &mut stdout),
        Command::View { view, target } => view::write_view(&session, view, &target, &mut stdout),
        Command::Export { kind, target, out } => {
            export::run_export(&session, kind.into(), &target, &out, &mut stdout)
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Session;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Config plus data files in a temp dir; Yackanookany has no discharge file.
    pub fn session() -> (TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            "yac/et.csv",
            "Date,Model_aclculated_ET,MODIS_ET,Noah_LSM_ET\n\
             2015-03-01,1.5,1.25,1.75\n\
             2015-03-02,2.5,,2.75\n\
             2016-07-01,4.5,4.25,4.75\n",
        );
        write(
            root,
            "yac/cells.geojson",
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","properties":{"cell_id":1,"mgmt_field_id":"A"},
                 "geometry":{"type":"Point","coordinates":[-89.5,32.1]}}]}"#,
        );
        write(
            root,
            "pearl/runoff.csv",
            "Date,USGS_Runoff_cms\n2016-01-02,40.0\n2016-01-01,42.5\n",
        );
        write(
            root,
            "watersheds.json",
            r#"{"watersheds":[
                {"name":"Yackanookany","et":"yac/et.csv","discharge":"yac/missing.csv",
                 "geometry":"yac/cells.geojson"},
                {"name":"Pearl River","discharge":"pearl/runoff.csv"}]}"#,
        );
        let session = Session::open(&root.join("watersheds.json")).unwrap();
        (dir, session)
    }

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::session;

    #[test]
    fn target_defaults_follow_the_cascade() {
        let (_dir, session) = session();
        let sel = session.selection(&Target::default()).unwrap();
        assert_eq!(sel.watershed.as_deref(), Some("Yackanookany"));
        assert_eq!(sel.year, Some(2015));
        assert_eq!(sel.color_field.as_deref(), Some("mgmt_field_id"));
    }

    #[test]
    fn explicit_year_is_kept_even_when_not_offered() {
        let (_dir, session) = session();
        let target = Target {
            year: Some(2020),
            ..Default::default()
        };
        assert_eq!(session.selection(&target).unwrap().year, Some(2020));
    }

    #[test]
    fn unknown_watershed_has_no_selection() {
        let (_dir, session) = session();
        let target = Target {
            watershed: Some("Nowhere".into()),
            ..Default::default()
        };
        assert!(session.selection(&target).is_none());
    }

    #[test]
    fn bundled_fixtures_load_cleanly() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../fixtures/watersheds.json");
        let session = Session::open(&path).unwrap();
        let statuses = session.db.source_statuses().unwrap();
        assert_eq!(statuses.len(), 6);
        assert!(statuses.iter().all(|s| s.loaded), "{:?}", statuses);

        let yac = session.catalog.get("Yackanookany").unwrap();
        assert_eq!(yac.years, vec![2015, 2016, 2017, 2018]);
        let pearl = session.catalog.get("Pearl River at Burnside").unwrap();
        assert_eq!(pearl.years, vec![2003, 2004, 2005, 2006]);

        // UTM 16N cells land in central Mississippi once reprojected
        let extent = session.db.cell_bounds("Yackanookany").unwrap().unwrap();
        assert!(extent.bounds.min_lon > -90.0 && extent.bounds.max_lon < -89.0);
        assert!(extent.bounds.min_lat > 32.5 && extent.bounds.max_lat < 33.5);
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Session::open(&dir.path().join("absent.json")).is_err());
    }
}
