//! Country selection: maps clicked boundary feature names onto catalog
//! countries and tracks the current selection.

use std::collections::HashMap;
use std::fmt;

use catalog::{Catalog, CountryEntry};
use foundation::{CountryKey, NameMatching};
use tracing::debug;

pub mod aliases;
pub mod coverage;
pub mod event;
pub mod state;

pub use aliases::*;
pub use coverage::*;
pub use event::*;
pub use state::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    UnknownCountry { name: String },
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::UnknownCountry { name } => write!(f, "unknown country {name:?}"),
        }
    }
}

impl std::error::Error for SelectionError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// Two catalog keys become equal under the chosen name matching.
    AmbiguousKeys { first: String, second: String },
    Alias(AliasError),
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::AmbiguousKeys { first, second } => {
                write!(f, "catalog countries {first:?} and {second:?} are indistinguishable")
            }
            SelectorError::Alias(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SelectorError {}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MatchKind {
    Direct,
    Alias,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorOptions {
    pub matching: NameMatching,
    /// Text prepended to polygon tooltips, e.g. `"Click to explore "`.
    pub tooltip_prefix: Option<String>,
}

/// Resolves interaction names against a validated catalog and alias table.
///
/// Lookup order:
/// 1. exact catalog key (after normalization, if any),
/// 2. alias table entry, then its target,
/// 3. otherwise [`SelectionError::UnknownCountry`].
#[derive(Debug, Clone)]
pub struct CountrySelector {
    catalog: Catalog,
    aliases: AliasTable,
    options: SelectorOptions,
    keys: HashMap<String, CountryKey>,
    alias_index: HashMap<String, CountryKey>,
}

impl CountrySelector {
    pub fn new(
        catalog: Catalog,
        aliases: AliasTable,
        options: SelectorOptions,
    ) -> Result<Self, SelectorError> {
        let matching = options.matching;
        let keys = key_index(&catalog, matching)
            .map_err(|(first, second)| SelectorError::AmbiguousKeys { first, second })?;

        let mut alias_index: HashMap<String, CountryKey> = HashMap::with_capacity(aliases.len());
        for entry in aliases.entries() {
            if !catalog.contains(entry.target.as_str()) {
                return Err(SelectorError::Alias(AliasError::UnknownTarget {
                    alias: entry.alias.clone(),
                    target: entry.target.as_str().to_string(),
                }));
            }
            let normalized = matching.normalize(&entry.alias).into_owned();
            if keys
                .get(&normalized)
                .is_some_and(|existing| existing != &entry.target)
            {
                return Err(SelectorError::Alias(AliasError::ShadowsCatalogKey {
                    alias: entry.alias.clone(),
                    target: entry.target.as_str().to_string(),
                }));
            }
            if alias_index
                .insert(normalized, entry.target.clone())
                .is_some()
            {
                return Err(SelectorError::Alias(AliasError::DuplicateAlias {
                    alias: entry.alias.clone(),
                }));
            }
        }

        Ok(Self {
            catalog,
            aliases,
            options,
            keys,
            alias_index,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    pub fn options(&self) -> &SelectorOptions {
        &self.options
    }

    /// Side-effect free name lookup.
    pub fn lookup(&self, raw_name: &str) -> Option<(&CountryKey, MatchKind)> {
        let name = self.options.matching.normalize(raw_name);
        if let Some(key) = self.keys.get(name.as_ref()) {
            return Some((key, MatchKind::Direct));
        }
        self.alias_index
            .get(name.as_ref())
            .map(|key| (key, MatchKind::Alias))
    }

    /// Resolves `raw_name` and records it as the current selection.
    ///
    /// On failure the state is left untouched.
    pub fn resolve(
        &self,
        state: &mut SelectionState,
        raw_name: &str,
    ) -> Result<&CountryEntry, SelectionError> {
        let entry = self
            .lookup(raw_name)
            .and_then(|(key, _)| self.catalog.get(key.as_str()));
        let Some(entry) = entry else {
            debug!(name = raw_name, "click did not match a catalog country");
            return Err(SelectionError::UnknownCountry {
                name: raw_name.to_string(),
            });
        };
        state.select(entry.key.clone());
        debug!(name = raw_name, country = %entry.key, "country selected");
        Ok(entry)
    }

    /// Current selection resolved against the catalog; a stale key reads as none.
    pub fn current_selection(&self, state: &SelectionState) -> Option<&CountryEntry> {
        state
            .selected()
            .and_then(|key| self.catalog.get(key.as_str()))
    }

    /// Applies one interaction event as a single state transition.
    pub fn handle(&self, state: &mut SelectionState, event: &InteractionEvent) -> SelectionOutcome {
        let name = match event {
            InteractionEvent::FeatureClicked { name } => name.as_str(),
            InteractionEvent::TooltipClicked { text } => self.strip_tooltip(text),
            InteractionEvent::CountryPicked { key } => key.as_str(),
            InteractionEvent::Cleared => {
                return if state.clear() {
                    SelectionOutcome::Cleared
                } else {
                    SelectionOutcome::Unchanged
                };
            }
        };

        match self.resolve(state, name) {
            Ok(entry) => SelectionOutcome::Selected(entry.key.clone()),
            Err(SelectionError::UnknownCountry { .. }) => SelectionOutcome::Unchanged,
        }
    }

    pub fn strip_tooltip<'a>(&self, text: &'a str) -> &'a str {
        match self.options.tooltip_prefix.as_deref() {
            Some(prefix) => text.strip_prefix(prefix).unwrap_or(text),
            None => text,
        }
    }

    /// Tooltip shown on a boundary polygon; [`Self::strip_tooltip`] inverts it.
    pub fn tooltip_for(&self, feature_name: &str) -> String {
        match self.options.tooltip_prefix.as_deref() {
            Some(prefix) => format!("{prefix}{feature_name}"),
            None => feature_name.to_string(),
        }
    }
}

/// Normalized catalog key -> canonical key.
///
/// Fails with the first pair of keys that collide under `matching`.
pub(crate) fn key_index(
    catalog: &Catalog,
    matching: NameMatching,
) -> Result<HashMap<String, CountryKey>, (String, String)> {
    let mut index: HashMap<String, CountryKey> = HashMap::with_capacity(catalog.len());
    for key in catalog.keys() {
        let normalized = matching.normalize(key.as_str()).into_owned();
        if let Some(previous) = index.insert(normalized, key.clone()) {
            return Err((previous.into_string(), key.as_str().to_string()));
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog::{CatalogDocument, CountryDocument, SpeciesDocument};
    use pretty_assertions::assert_eq;

    fn species(name: &str, coords: [f64; 2]) -> SpeciesDocument {
        SpeciesDocument {
            common_name: name.to_string(),
            scientific_name: format!("{name} sp."),
            blooming_conditions: "spring".to_string(),
            image_url: String::new(),
            coords,
        }
    }

    fn country(id: &str, species: Vec<SpeciesDocument>) -> CountryDocument {
        CountryDocument {
            id: id.to_string(),
            name: None,
            center: [0.0, 0.0],
            zoom: 4,
            flag_url: None,
            species,
        }
    }

    fn peru_only() -> Catalog {
        Catalog::from_document(CatalogDocument {
            countries: vec![country(
                "Peru",
                vec![
                    species("Cantuta", [-13.5, -71.9]),
                    species("Amancaes", [-12.0, -77.0]),
                ],
            )],
        })
        .unwrap()
    }

    fn demo_selector(options: SelectorOptions) -> CountrySelector {
        let catalog = Catalog::demo().unwrap();
        let aliases = AliasTable::from_pairs(
            [("United States of America", "United States")],
            &catalog,
            options.matching,
        )
        .unwrap();
        CountrySelector::new(catalog, aliases, options).unwrap()
    }

    #[test]
    fn every_catalog_key_resolves_to_itself() {
        let sel = demo_selector(SelectorOptions::default());
        let keys: Vec<CountryKey> = sel.catalog().keys().cloned().collect();
        for key in keys {
            let mut state = SelectionState::new();
            let entry = sel.resolve(&mut state, key.as_str()).unwrap();
            assert_eq!(entry.key, key);
            assert_eq!(state.selected(), Some(&key));
        }
    }

    #[test]
    fn every_alias_resolves_like_its_target() {
        let sel = demo_selector(SelectorOptions::default());
        for alias in sel.aliases().entries() {
            let mut a = SelectionState::new();
            let mut b = SelectionState::new();
            let via_alias = sel.resolve(&mut a, &alias.alias).unwrap();
            let direct = sel.resolve(&mut b, alias.target.as_str()).unwrap();
            assert_eq!(via_alias, direct);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn united_states_of_america_alias() {
        let sel = demo_selector(SelectorOptions::default());
        let mut state = SelectionState::new();
        let entry = sel.resolve(&mut state, "United States of America").unwrap();
        assert_eq!(entry.key.as_str(), "United States");
        assert_eq!(
            sel.lookup("United States of America").map(|(_, kind)| kind),
            Some(MatchKind::Alias)
        );
    }

    #[test]
    fn peru_scenario_without_aliases() {
        let sel =
            CountrySelector::new(peru_only(), AliasTable::new(), SelectorOptions::default()).unwrap();
        let mut state = SelectionState::new();

        let entry = sel.resolve(&mut state, "Peru").unwrap();
        assert_eq!(entry.species.len(), 2);

        let before = state.clone();
        assert_eq!(
            sel.resolve(&mut state, "Perú"),
            Err(SelectionError::UnknownCountry {
                name: "Perú".to_string()
            })
        );
        assert_eq!(state, before);
        assert_eq!(
            sel.current_selection(&state).map(|e| e.key.as_str()),
            Some("Peru")
        );
    }

    #[test]
    fn unknown_names_leave_state_unchanged() {
        let sel = demo_selector(SelectorOptions::default());
        let mut state = SelectionState::new();
        for name in ["", "Chile", "peru", " Peru", "Peru ", "United States of america"] {
            assert!(sel.resolve(&mut state, name).is_err(), "{name:?}");
            assert!(state.is_empty());
            assert!(sel.current_selection(&state).is_none());
        }

        sel.resolve(&mut state, "Brazil").unwrap();
        assert!(sel.resolve(&mut state, "Atlantis").is_err());
        assert_eq!(
            sel.current_selection(&state).map(|e| e.key.as_str()),
            Some("Brazil")
        );
    }

    #[test]
    fn later_resolve_overwrites_selection() {
        let sel = demo_selector(SelectorOptions::default());
        let mut state = SelectionState::new();
        sel.resolve(&mut state, "Peru").unwrap();
        sel.resolve(&mut state, "Colombia").unwrap();
        assert_eq!(
            sel.current_selection(&state).map(|e| e.key.as_str()),
            Some("Colombia")
        );
    }

    #[test]
    fn stale_selection_reads_as_none() {
        let sel = demo_selector(SelectorOptions::default());
        let mut state = SelectionState::new();
        state.select(CountryKey::from("Atlantis"));
        assert!(sel.current_selection(&state).is_none());
    }

    #[test]
    fn empty_species_list_resolves() {
        let catalog = Catalog::from_document(CatalogDocument {
            countries: vec![country("Chile", Vec::new())],
        })
        .unwrap();
        let sel = CountrySelector::new(catalog, AliasTable::new(), SelectorOptions::default())
            .unwrap();
        let mut state = SelectionState::new();
        let entry = sel.resolve(&mut state, "Chile").unwrap();
        assert!(entry.species.is_empty());
    }

    #[test]
    fn folded_matching_applies_everywhere() {
        let sel = demo_selector(SelectorOptions {
            matching: NameMatching::Folded,
            tooltip_prefix: None,
        });
        let mut state = SelectionState::new();
        assert_eq!(sel.resolve(&mut state, "  peru ").unwrap().key.as_str(), "Peru");
        assert_eq!(
            sel.resolve(&mut state, "UNITED STATES OF AMERICA")
                .unwrap()
                .key
                .as_str(),
            "United States"
        );
        assert!(sel.resolve(&mut state, "Perú").is_err());
    }

    #[test]
    fn folded_key_collision_is_config_error() {
        let catalog = Catalog::from_document(CatalogDocument {
            countries: vec![country("Peru", Vec::new()), country("PERU", Vec::new())],
        })
        .unwrap();

        assert!(
            CountrySelector::new(catalog.clone(), AliasTable::new(), SelectorOptions::default())
                .is_ok()
        );
        let err = CountrySelector::new(
            catalog,
            AliasTable::new(),
            SelectorOptions {
                matching: NameMatching::Folded,
                tooltip_prefix: None,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            SelectorError::AmbiguousKeys {
                first: "Peru".to_string(),
                second: "PERU".to_string()
            }
        );
    }

    #[test]
    fn alias_table_built_exact_collides_when_selector_folds() {
        let catalog = Catalog::demo().unwrap();
        let aliases = AliasTable::from_pairs(
            [("USA", "United States"), ("usa", "United States")],
            &catalog,
            NameMatching::Exact,
        )
        .unwrap();
        let err = CountrySelector::new(
            catalog,
            aliases,
            SelectorOptions {
                matching: NameMatching::Folded,
                tooltip_prefix: None,
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SelectorError::Alias(AliasError::DuplicateAlias { .. })
        ));
    }

    #[test]
    fn alias_shadowed_by_folded_catalog_key_is_rejected() {
        let catalog = Catalog::demo().unwrap();
        let aliases =
            AliasTable::from_pairs([("peru", "Brazil")], &catalog, NameMatching::Exact).unwrap();

        assert!(
            CountrySelector::new(catalog.clone(), aliases.clone(), SelectorOptions::default())
                .is_ok()
        );
        let err = CountrySelector::new(
            catalog,
            aliases,
            SelectorOptions {
                matching: NameMatching::Folded,
                tooltip_prefix: None,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            SelectorError::Alias(AliasError::ShadowsCatalogKey {
                alias: "peru".to_string(),
                target: "Brazil".to_string()
            })
        );
    }

    #[test]
    fn handle_applies_each_event_kind() {
        let sel = demo_selector(SelectorOptions {
            matching: NameMatching::Exact,
            tooltip_prefix: Some("Click to explore ".to_string()),
        });
        let mut state = SelectionState::new();

        assert_eq!(
            sel.handle(
                &mut state,
                &InteractionEvent::TooltipClicked {
                    text: "Click to explore Peru".to_string()
                }
            ),
            SelectionOutcome::Selected(CountryKey::from("Peru"))
        );
        assert_eq!(
            sel.handle(
                &mut state,
                &InteractionEvent::FeatureClicked {
                    name: "Antarctica".to_string()
                }
            ),
            SelectionOutcome::Unchanged
        );
        assert_eq!(state.selected().map(|k| k.as_str()), Some("Peru"));

        assert_eq!(
            sel.handle(
                &mut state,
                &InteractionEvent::CountryPicked {
                    key: "Brazil".to_string()
                }
            ),
            SelectionOutcome::Selected(CountryKey::from("Brazil"))
        );
        assert_eq!(
            sel.handle(&mut state, &InteractionEvent::Cleared),
            SelectionOutcome::Cleared
        );
        assert!(sel.current_selection(&state).is_none());
        assert_eq!(
            sel.handle(&mut state, &InteractionEvent::Cleared),
            SelectionOutcome::Unchanged
        );
    }

    #[test]
    fn tooltip_prefix_round_trips() {
        let sel = demo_selector(SelectorOptions {
            matching: NameMatching::Exact,
            tooltip_prefix: Some("Click to explore ".to_string()),
        });
        let tooltip = sel.tooltip_for("United States of America");
        assert_eq!(tooltip, "Click to explore United States of America");
        assert_eq!(sel.strip_tooltip(&tooltip), "United States of America");
        assert_eq!(sel.strip_tooltip("Peru"), "Peru");
    }
}
