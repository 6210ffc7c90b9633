use foundation::CountryKey;

/// Single-slot record of the most recently resolved country.
///
/// Owned by the interaction loop and passed to the selector explicitly.
/// Only [`crate::CountrySelector::resolve`] sets it; only [`SelectionState::clear`]
/// empties it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<CountryKey>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&CountryKey> {
        self.selected.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_none()
    }

    /// Explicit deselect.
    ///
    /// Returns `true` if a selection was removed.
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    pub(crate) fn select(&mut self, key: CountryKey) {
        self.selected = Some(key);
    }
}
