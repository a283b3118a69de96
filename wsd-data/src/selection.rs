//! Selection state and the cascading option rules.
//!
//! The watershed selector drives two dependent selectors: the year (options
//! taken from the watershed's ET series) and the map colour field (options
//! taken from its cell attributes). Both are recomputed together whenever
//! the watershed changes, so no view can see a year or field left over from
//! the previous watershed.

use serde::Serialize;
use wsd_db::Database;

/// Option sets of one registered watershed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatershedOptions {
    pub name: String,
    /// Distinct ET years, ascending. Empty when the ET series is absent.
    pub years: Vec<i32>,
    /// Cell attribute columns. Empty when the geometry is absent.
    pub color_fields: Vec<String>,
}

/// Immutable snapshot of every watershed's option sets, built once after loading.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SelectionCatalog {
    pub watersheds: Vec<WatershedOptions>,
    pub preferred_color_field: String,
}

impl SelectionCatalog {
    pub fn from_database(db: &Database, preferred_color_field: &str) -> anyhow::Result<Self> {
        let mut watersheds = Vec::new();
        for name in db.watershed_names()? {
            let years = db.et_years(&name)?;
            let color_fields = db.cell_columns(&name)?;
            watersheds.push(WatershedOptions {
                name,
                years,
                color_fields,
            });
        }
        log::info!("selection: catalog built for {} watersheds", watersheds.len());
        Ok(Self {
            watersheds,
            preferred_color_field: preferred_color_field.to_string(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.watersheds.iter().map(|w| w.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&WatershedOptions> {
        self.watersheds.iter().find(|w| w.name == name)
    }
}

/// Everything that changes together when the watershed changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cascade {
    pub year_options: Vec<i32>,
    pub year: Option<i32>,
    pub color_field_options: Vec<String>,
    pub color_field: Option<String>,
}

/// Dependent options and defaults for `watershed`.
///
/// Year defaults to the earliest; the colour field to the catalog's preferred
/// field when present, else the first column.
pub fn cascade(catalog: &SelectionCatalog, watershed: &str) -> Cascade {
    let Some(options) = catalog.get(watershed) else {
        return Cascade {
            year_options: Vec::new(),
            year: None,
            color_field_options: Vec::new(),
            color_field: None,
        };
    };
    let color_field = options
        .color_fields
        .iter()
        .find(|f| **f == catalog.preferred_color_field)
        .or_else(|| options.color_fields.first())
        .cloned();
    Cascade {
        year_options: options.years.clone(),
        year: options.years.first().copied(),
        color_field_options: options.color_fields.clone(),
        color_field,
    }
}

/// A user action on one of the three selectors.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    WatershedChanged(String),
    YearChanged(i32),
    ColorFieldChanged(String),
}

/// Current selector values and the options each selector offers.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SelectionState {
    pub watershed: Option<String>,
    pub year: Option<i32>,
    pub color_field: Option<String>,
    pub year_options: Vec<i32>,
    pub color_field_options: Vec<String>,
}

impl SelectionState {
    /// Start on the first registered watershed.
    pub fn initial(catalog: &SelectionCatalog) -> Self {
        match catalog.names().next() {
            Some(first) => Self::for_watershed(catalog, first),
            None => Self::default(),
        }
    }

    fn for_watershed(catalog: &SelectionCatalog, watershed: &str) -> Self {
        let c = cascade(catalog, watershed);
        Self {
            watershed: Some(watershed.to_string()),
            year: c.year,
            color_field: c.color_field,
            year_options: c.year_options,
            color_field_options: c.color_field_options,
        }
    }

    /// Pure reducer: the state after `event`.
    ///
    /// Values outside the current option set leave the state unchanged.
    pub fn apply(&self, catalog: &SelectionCatalog, event: SelectionEvent) -> Self {
        match event {
            SelectionEvent::WatershedChanged(name) => {
                if catalog.get(&name).is_none() {
                    log::warn!("selection: ignoring unknown watershed '{}'", name);
                    return self.clone();
                }
                Self::for_watershed(catalog, &name)
            }
            SelectionEvent::YearChanged(year) => {
                if !self.year_options.contains(&year) {
                    log::warn!("selection: year {} is not offered, ignoring", year);
                    return self.clone();
                }
                Self {
                    year: Some(year),
                    ..self.clone()
                }
            }
            SelectionEvent::ColorFieldChanged(field) => {
                if !self.color_field_options.contains(&field) {
                    log::warn!("selection: field '{}' is not offered, ignoring", field);
                    return self.clone();
                }
                Self {
                    color_field: Some(field),
                    ..self.clone()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SelectionCatalog {
        SelectionCatalog {
            watersheds: vec![
                WatershedOptions {
                    name: "Yackanookany".into(),
                    years: vec![2015, 2016, 2017, 2018],
                    color_fields: vec!["cell_id".into(), "mgmt_field_id".into()],
                },
                WatershedOptions {
                    name: "Pearl River at Burnside".into(),
                    years: vec![2003, 2004],
                    color_fields: vec!["cell_id".into(), "soil".into()],
                },
                WatershedOptions {
                    name: "Bare".into(),
                    years: vec![],
                    color_fields: vec![],
                },
            ],
            preferred_color_field: "mgmt_field_id".into(),
        }
    }

    #[test]
    fn initial_state_uses_first_watershed_defaults() {
        let state = SelectionState::initial(&catalog());
        assert_eq!(state.watershed.as_deref(), Some("Yackanookany"));
        assert_eq!(state.year, Some(2015));
        assert_eq!(state.color_field.as_deref(), Some("mgmt_field_id"));
    }

    #[test]
    fn empty_catalog_selects_nothing() {
        let state = SelectionState::initial(&SelectionCatalog::default());
        assert_eq!(state, SelectionState::default());
    }

    #[test]
    fn watershed_change_resets_dependent_selectors() {
        let cat = catalog();
        let state = SelectionState::initial(&cat)
            .apply(&cat, SelectionEvent::YearChanged(2017))
            .apply(&cat, SelectionEvent::ColorFieldChanged("cell_id".into()));
        assert_eq!(state.year, Some(2017));

        let state = state.apply(
            &cat,
            SelectionEvent::WatershedChanged("Pearl River at Burnside".into()),
        );
        assert_eq!(state.year_options, vec![2003, 2004]);
        assert_eq!(state.year, Some(2003));
        // Preferred field absent, first column wins
        assert_eq!(state.color_field.as_deref(), Some("cell_id"));

        let state = state.apply(&cat, SelectionEvent::WatershedChanged("Yackanookany".into()));
        assert_eq!(state.year, Some(2015));
        assert_eq!(state.color_field.as_deref(), Some("mgmt_field_id"));
    }

    #[test]
    fn watershed_without_sources_clears_selection() {
        let cat = catalog();
        let state = SelectionState::initial(&cat)
            .apply(&cat, SelectionEvent::WatershedChanged("Bare".into()));
        assert_eq!(state.watershed.as_deref(), Some("Bare"));
        assert_eq!(state.year, None);
        assert!(state.year_options.is_empty());
        assert_eq!(state.color_field, None);
    }

    #[test]
    fn stale_or_unknown_values_are_ignored() {
        let cat = catalog();
        let state = SelectionState::initial(&cat);
        // 2003 belongs to Pearl River, not the current watershed
        assert_eq!(state.apply(&cat, SelectionEvent::YearChanged(2003)), state);
        assert_eq!(
            state.apply(&cat, SelectionEvent::ColorFieldChanged("soil".into())),
            state
        );
        assert_eq!(
            state.apply(&cat, SelectionEvent::WatershedChanged("Nowhere".into())),
            state
        );
    }

    #[test]
    fn cascade_is_atomic_for_every_watershed() {
        let cat = catalog();
        for ws in &cat.watersheds {
            let c = cascade(&cat, &ws.name);
            assert_eq!(c.year_options, ws.years);
            assert_eq!(c.year, ws.years.iter().min().copied());
            if let Some(field) = &c.color_field {
                assert!(c.color_field_options.contains(field));
            }
        }
    }
}
