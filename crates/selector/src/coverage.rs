use std::collections::HashSet;

use foundation::CountryKey;

use crate::{CountrySelector, MatchKind};

/// How a set of boundary feature names lines up with the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverageReport {
    /// Names equal to a catalog key.
    pub direct: Vec<String>,
    /// Names reached through the alias table, with their target.
    pub aliased: Vec<(String, CountryKey)>,
    /// Names that select nothing.
    pub unmatched: Vec<String>,
    /// Catalog countries no feature reaches, in catalog order.
    pub unreached: Vec<CountryKey>,
}

impl CoverageReport {
    /// Every catalog country has at least one clickable feature.
    pub fn is_complete(&self) -> bool {
        self.unreached.is_empty()
    }
}

impl CountrySelector {
    pub fn coverage<'a, I>(&self, names: I) -> CoverageReport
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut report = CoverageReport::default();
        let mut reached: HashSet<&CountryKey> = HashSet::new();

        for name in names {
            match self.lookup(name) {
                Some((key, MatchKind::Direct)) => {
                    reached.insert(key);
                    report.direct.push(name.to_string());
                }
                Some((key, MatchKind::Alias)) => {
                    reached.insert(key);
                    report.aliased.push((name.to_string(), key.clone()));
                }
                None => report.unmatched.push(name.to_string()),
            }
        }

        report.unreached = self
            .catalog()
            .keys()
            .filter(|k| !reached.contains(k))
            .cloned()
            .collect();
        report
    }

    /// Items whose name resolves to a catalog country, in input order.
    pub fn interactive<'f, T>(
        &self,
        items: &'f [T],
        name_of: impl Fn(&T) -> Option<&str>,
    ) -> Vec<(&CountryKey, &'f T)> {
        items
            .iter()
            .filter_map(|item| {
                let (key, _) = self.lookup(name_of(item)?)?;
                Some((key, item))
            })
            .collect()
    }
}
