//! Typed enumerated values that can be used as restriction values.
//!
//! The server identifies enumerated fields (severity, ticket state, ...) by a
//! numeric id, while the legacy API and humans use the label. An [`EnumValue`]
//! carries both so each compiler can pick the form its protocol expects.

use std::fmt;

/// Common behavior of closed server-side enumerations.
pub trait OnmsEnum: Copy {
    /// Numeric id used by the server.
    fn id(&self) -> i32;

    /// Canonical upper-case label.
    fn label(&self) -> &'static str;

    fn to_enum_value(&self) -> EnumValue {
        EnumValue {
            id: self.id(),
            label: self.label(),
        }
    }
}

/// An enumerated value, detached from its concrete enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub id: i32,
    pub label: &'static str,
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label)
    }
}

/// Alarm and event severities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Indeterminate,
    Cleared,
    Normal,
    Warning,
    Minor,
    Major,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 7] = [
        Severity::Indeterminate,
        Severity::Cleared,
        Severity::Normal,
        Severity::Warning,
        Severity::Minor,
        Severity::Major,
        Severity::Critical,
    ];

    /// Look up a severity by label (case-insensitive) or numeric id.
    pub fn find(token: &str) -> Option<Severity> {
        let token = token.trim();
        if let Ok(id) = token.parse::<i32>() {
            return Self::from_id(id);
        }
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(token))
    }

    pub fn from_id(id: i32) -> Option<Severity> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }
}

impl OnmsEnum for Severity {
    fn id(&self) -> i32 {
        match self {
            Severity::Indeterminate => 1,
            Severity::Cleared => 2,
            Severity::Normal => 3,
            Severity::Warning => 4,
            Severity::Minor => 5,
            Severity::Major => 6,
            Severity::Critical => 7,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Severity::Indeterminate => "INDETERMINATE",
            Severity::Cleared => "CLEARED",
            Severity::Normal => "NORMAL",
            Severity::Warning => "WARNING",
            Severity::Minor => "MINOR",
            Severity::Major => "MAJOR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl From<Severity> for EnumValue {
    fn from(severity: Severity) -> Self {
        severity.to_enum_value()
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
