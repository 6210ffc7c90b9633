use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use catalog::Catalog;
use foundation::{CountryKey, NameMatching};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

use crate::key_index;

/// One mapping from a boundary dataset's spelling to a catalog key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasEntry {
    pub alias: String,
    pub target: CountryKey,
}

/// Validated alias table.
///
/// Every target is a catalog key. No alias appears twice and no alias
/// names a different catalog country than the one it points to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    entries: Vec<AliasEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasError {
    DuplicateAlias { alias: String },
    UnknownTarget { alias: String, target: String },
    /// Two catalog keys become equal under the chosen name matching.
    AmbiguousKeys { first: String, second: String },
    /// The alias itself is a catalog key for a different country, so it could never apply.
    ShadowsCatalogKey { alias: String, target: String },
    Parse(String),
    Io(String),
}

impl fmt::Display for AliasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AliasError::DuplicateAlias { alias } => write!(f, "alias {alias:?} registered twice"),
            AliasError::UnknownTarget { alias, target } => {
                write!(f, "alias {alias:?} points at unknown country {target:?}")
            }
            AliasError::AmbiguousKeys { first, second } => {
                write!(f, "catalog countries {first:?} and {second:?} are indistinguishable")
            }
            AliasError::ShadowsCatalogKey { alias, target } => write!(
                f,
                "alias {alias:?} is itself a catalog country and cannot point at {target:?}"
            ),
            AliasError::Parse(msg) => write!(f, "alias table parse error: {msg}"),
            AliasError::Io(msg) => write!(f, "alias table read error: {msg}"),
        }
    }
}

impl std::error::Error for AliasError {}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, A, T>(
        pairs: I,
        catalog: &Catalog,
        matching: NameMatching,
    ) -> Result<Self, AliasError>
    where
        I: IntoIterator<Item = (A, T)>,
        A: Into<String>,
        T: AsRef<str>,
    {
        let keys = key_index(catalog, matching)
            .map_err(|(first, second)| AliasError::AmbiguousKeys { first, second })?;
        let mut seen: HashSet<String> = HashSet::new();
        let mut entries = Vec::new();

        for (alias, target) in pairs {
            let alias: String = alias.into();
            let target = target.as_ref();

            let Some(target_key) = keys.get(matching.normalize(target).as_ref()).cloned() else {
                return Err(AliasError::UnknownTarget {
                    alias,
                    target: target.to_string(),
                });
            };

            let normalized = matching.normalize(&alias).into_owned();
            if keys
                .get(&normalized)
                .is_some_and(|existing| existing != &target_key)
            {
                return Err(AliasError::ShadowsCatalogKey {
                    alias,
                    target: target_key.into_string(),
                });
            }
            if !seen.insert(normalized) {
                return Err(AliasError::DuplicateAlias { alias });
            }

            entries.push(AliasEntry {
                alias,
                target: target_key,
            });
        }

        Ok(Self { entries })
    }

    /// Parses a JSON object of `{"feature name": "catalog key"}`.
    ///
    /// Repeated keys in the object are reported rather than collapsed.
    pub fn from_json_str(
        payload: &str,
        catalog: &Catalog,
        matching: NameMatching,
    ) -> Result<Self, AliasError> {
        let pairs = serde_json::from_str::<AliasPairs>(payload)
            .map_err(|e| AliasError::Parse(e.to_string()))?;
        Self::from_pairs(pairs.0, catalog, matching)
    }

    pub fn from_path(
        path: impl AsRef<Path>,
        catalog: &Catalog,
        matching: NameMatching,
    ) -> Result<Self, AliasError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path)
            .map_err(|e| AliasError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&payload, catalog, matching)
    }

    pub fn entries(&self) -> &[AliasEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// JSON object read as an ordered pair list, keeping repeated keys.
struct AliasPairs(Vec<(String, String)>);

impl<'de> Deserialize<'de> for AliasPairs {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = AliasPairs;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping feature names to catalog keys")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((alias, target)) = map.next_entry::<String, String>()? {
                    pairs.push((alias, target));
                }
                Ok(AliasPairs(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{AliasError, AliasTable};
    use catalog::Catalog;
    use foundation::NameMatching;
    use pretty_assertions::assert_eq;

    fn demo() -> Catalog {
        Catalog::demo().expect("demo catalog")
    }

    #[test]
    fn parses_object_in_order() {
        let table = AliasTable::from_json_str(
            r#"{"United States of America": "United States", "Republic of Peru": "Peru"}"#,
            &demo(),
            NameMatching::Exact,
        )
        .unwrap();
        let aliases: Vec<(&str, &str)> = table
            .entries()
            .iter()
            .map(|e| (e.alias.as_str(), e.target.as_str()))
            .collect();
        assert_eq!(
            aliases,
            vec![
                ("United States of America", "United States"),
                ("Republic of Peru", "Peru")
            ]
        );
    }

    #[test]
    fn repeated_json_key_is_duplicate_alias() {
        let err = AliasTable::from_json_str(
            r#"{"USA": "United States", "USA": "Brazil"}"#,
            &demo(),
            NameMatching::Exact,
        )
        .unwrap_err();
        assert_eq!(
            err,
            AliasError::DuplicateAlias {
                alias: "USA".to_string()
            }
        );
    }

    #[test]
    fn dangling_target_is_rejected() {
        let err = AliasTable::from_pairs([("Perú", "Republic of Peru")], &demo(), NameMatching::Exact)
            .unwrap_err();
        assert!(matches!(err, AliasError::UnknownTarget { .. }));
    }

    #[test]
    fn alias_shadowing_other_country_is_rejected() {
        let err = AliasTable::from_pairs([("Peru", "Brazil")], &demo(), NameMatching::Exact)
            .unwrap_err();
        assert!(matches!(err, AliasError::ShadowsCatalogKey { .. }));

        // Pointing a key at itself is harmless.
        assert!(AliasTable::from_pairs([("Peru", "Peru")], &demo(), NameMatching::Exact).is_ok());
    }

    #[test]
    fn folded_matching_canonicalizes_targets_and_catches_collisions() {
        let table = AliasTable::from_pairs(
            [("United States of America", " united states ")],
            &demo(),
            NameMatching::Folded,
        )
        .unwrap();
        assert_eq!(table.entries()[0].target.as_str(), "United States");

        let err = AliasTable::from_pairs(
            [("USA", "United States"), ("usa ", "United States")],
            &demo(),
            NameMatching::Folded,
        )
        .unwrap_err();
        assert!(matches!(err, AliasError::DuplicateAlias { .. }));
    }

    #[test]
    fn non_object_is_parse_error() {
        let err = AliasTable::from_json_str(r#"["USA"]"#, &demo(), NameMatching::Exact).unwrap_err();
        assert!(matches!(err, AliasError::Parse(_)));
    }

    #[test]
    fn empty_table_is_valid() {
        let table = AliasTable::from_json_str("{}", &demo(), NameMatching::Exact).unwrap();
        assert!(table.is_empty());
    }
}
