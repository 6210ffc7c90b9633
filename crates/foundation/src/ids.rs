use std::borrow::{Borrow, Cow};

/// Canonical country identifier used as a catalog key (e.g. "Peru").
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryKey(String);

impl CountryKey {
    pub fn new(key: impl Into<String>) -> Self {
        CountryKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Borrow<str> for CountryKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CountryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CountryKey {
    fn from(s: &str) -> Self {
        CountryKey(s.to_string())
    }
}

impl From<String> for CountryKey {
    fn from(s: String) -> Self {
        CountryKey(s)
    }
}

impl std::fmt::Display for CountryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How names from different sources are compared.
///
/// The same policy must be applied to catalog keys, alias keys, alias targets
/// and incoming names alike.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NameMatching {
    /// Case-sensitive, whitespace-exact comparison.
    #[default]
    Exact,
    /// Trim surrounding whitespace and lowercase before comparing.
    Folded,
}

impl NameMatching {
    pub fn normalize(self, name: &str) -> Cow<'_, str> {
        match self {
            NameMatching::Exact => Cow::Borrowed(name),
            NameMatching::Folded => Cow::Owned(name.trim().to_lowercase()),
        }
    }
}
