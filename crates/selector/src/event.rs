use foundation::CountryKey;

/// One user action delivered by the interaction source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionEvent {
    /// `name` property of the clicked boundary polygon.
    FeatureClicked { name: String },
    /// Text of the last clicked tooltip; the configured prefix is stripped.
    TooltipClicked { text: String },
    /// Pick from a country list.
    CountryPicked { key: String },
    /// Explicit deselect.
    Cleared,
}

/// State transition produced by one [`InteractionEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome {
    Selected(CountryKey),
    /// Unknown country or nothing to clear; the state is untouched.
    Unchanged,
    Cleared,
}
