//! Core types, input parsers and configuration for watershed ET dashboard data.
//!
//! Every watershed is described by up to three independent sources:
//! a daily evapotranspiration (ET) CSV, a daily discharge/runoff CSV and a
//! GeoJSON layer of watershed cells. This crate knows how to read each of
//! them into plain Rust values; storing and querying them is `wsd-db`'s job.

pub mod columns;
pub mod config;
pub mod discharge;
pub mod et;
pub mod geometry;
pub mod projection;
pub mod source;

pub use columns::{DischargeColumn, EtColumn, SourceKind, DATE_COLUMN};
pub use config::{DashboardConfig, WatershedConfig};
pub use discharge::{DischargeRecord, DischargeTable};
pub use et::{EtField, EtRecord, EtTable};
pub use geometry::{Cell, CellLayer};
pub use projection::{Crs, GeoBoundingBox, GeometryError};
pub use source::{FsReader, MemoryReader, SourceReader};
