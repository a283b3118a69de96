//! Column vocabulary shared by the parsers, the registry and the exports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the calendar date column in both CSV inputs.
pub const DATE_COLUMN: &str = "Date";

/// Misspelling found in some ET exports; renamed to [`EtColumn::ModelCalculated`] on load.
pub const MISSPELLED_MODEL_ET: &str = "Model_aclculated_ET";

/// The three ET estimates plotted for every watershed (mm/day).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EtColumn {
    /// Process-model ET (AnnAGNPS).
    ModelCalculated,
    /// Satellite-derived MODIS ET.
    Modis,
    /// Noah land-surface-model ET.
    NoahLsm,
}

impl EtColumn {
    pub const ALL: [EtColumn; 3] = [EtColumn::ModelCalculated, EtColumn::Modis, EtColumn::NoahLsm];

    /// CSV header used on input and export.
    pub fn header(&self) -> &'static str {
        match self {
            EtColumn::ModelCalculated => "Model_calculated_ET",
            EtColumn::Modis => "MODIS_ET",
            EtColumn::NoahLsm => "Noah_LSM_ET",
        }
    }

    /// Column name in the registry's `et_series` table.
    pub fn sql_column(&self) -> &'static str {
        match self {
            EtColumn::ModelCalculated => "model_et",
            EtColumn::Modis => "modis_et",
            EtColumn::NoahLsm => "noah_et",
        }
    }

    /// Resolve a (trimmed) CSV header, accepting the known misspelling.
    pub fn from_header(header: &str) -> Option<Self> {
        if header == MISSPELLED_MODEL_ET {
            return Some(EtColumn::ModelCalculated);
        }
        EtColumn::ALL.into_iter().find(|c| c.header() == header)
    }

    pub fn index(&self) -> usize {
        match self {
            EtColumn::ModelCalculated => 0,
            EtColumn::Modis => 1,
            EtColumn::NoahLsm => 2,
        }
    }
}

impl fmt::Display for EtColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Candidate discharge series (m³/s). Which of these a watershed carries is data-dependent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DischargeColumn {
    /// Observed USGS gauge runoff.
    UsgsObserved,
    /// Model runoff without an ET forcing.
    NoEt,
    /// Model runoff forced with MODIS ET.
    ModisEt,
    /// Model runoff forced with Noah LSM ET.
    NoahEt,
}

impl DischargeColumn {
    pub const ALL: [DischargeColumn; 4] = [
        DischargeColumn::UsgsObserved,
        DischargeColumn::NoEt,
        DischargeColumn::ModisEt,
        DischargeColumn::NoahEt,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            DischargeColumn::UsgsObserved => "USGS_Runoff_cms",
            DischargeColumn::NoEt => "Runoff_No_ET_cms",
            DischargeColumn::ModisEt => "Runoff_MODIS_ET_cms",
            DischargeColumn::NoahEt => "Runoff_NOAH_ET_cms",
        }
    }

    pub fn sql_column(&self) -> &'static str {
        match self {
            DischargeColumn::UsgsObserved => "usgs_runoff_cms",
            DischargeColumn::NoEt => "runoff_no_et_cms",
            DischargeColumn::ModisEt => "runoff_modis_et_cms",
            DischargeColumn::NoahEt => "runoff_noah_et_cms",
        }
    }

    pub fn from_header(header: &str) -> Option<Self> {
        DischargeColumn::ALL.into_iter().find(|c| c.header() == header)
    }

    pub fn index(&self) -> usize {
        match self {
            DischargeColumn::UsgsObserved => 0,
            DischargeColumn::NoEt => 1,
            DischargeColumn::ModisEt => 2,
            DischargeColumn::NoahEt => 3,
        }
    }
}

impl fmt::Display for DischargeColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// The three independently loaded sub-tables of a watershed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Et,
    Discharge,
    Geometry,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Et, SourceKind::Discharge, SourceKind::Geometry];

    /// Stable key stored in the registry's `sources` table.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Et => "et",
            SourceKind::Discharge => "discharge",
            SourceKind::Geometry => "geometry",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        SourceKind::ALL.into_iter().find(|k| k.as_str() == s)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn et_header_accepts_misspelling() {
        assert_eq!(
            EtColumn::from_header("Model_aclculated_ET"),
            Some(EtColumn::ModelCalculated)
        );
        assert_eq!(
            EtColumn::from_header("Model_calculated_ET"),
            Some(EtColumn::ModelCalculated)
        );
        assert_eq!(EtColumn::from_header("MODIS_ET"), Some(EtColumn::Modis));
        assert_eq!(EtColumn::from_header("ET"), None);
    }

    #[test]
    fn indices_match_declaration_order() {
        for (i, c) in EtColumn::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
        for (i, c) in DischargeColumn::ALL.iter().enumerate() {
            assert_eq!(c.index(), i);
            assert_eq!(DischargeColumn::from_header(c.header()), Some(*c));
        }
    }

    #[test]
    fn source_kind_round_trips_through_key() {
        for kind in SourceKind::ALL {
            assert_eq!(SourceKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(SourceKind::parse("nope"), None);
    }
}
