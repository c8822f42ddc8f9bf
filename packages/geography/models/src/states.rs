//! US state abbreviation table.
//!
//! The 50 states plus DC, in the order Plotly's `USA-states` location mode
//! expects two-letter codes.

/// Two-letter abbreviations and full names for the 50 US states + DC.
pub const STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Returns every state abbreviation.
pub fn abbreviations() -> impl Iterator<Item = &'static str> {
    STATES.iter().map(|(abbr, _)| *abbr)
}

/// Maps a two-letter abbreviation to the full state name.
///
/// Matching is exact: source data uses upper-case codes and so must callers.
#[must_use]
pub fn state_name(abbr: &str) -> Option<&'static str> {
    STATES
        .iter()
        .find(|(code, _)| *code == abbr)
        .map(|(_, name)| *name)
}

/// Whether `abbr` is a known state abbreviation.
#[must_use]
pub fn is_state(abbr: &str) -> bool {
    state_name(abbr).is_some()
}
