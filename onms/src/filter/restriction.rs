//! Restrictions, nested groups and the clauses that link them.

use chrono::{DateTime, FixedOffset, TimeZone};

use super::comparator::{Comparator, Operator};
use crate::enums::{EnumValue, Severity};

/// The right-hand side of a restriction.
#[derive(Debug, Clone, PartialEq)]
pub enum RestrictionValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Enumerated value; V1 sends the label, V2 the numeric id.
    Enum(EnumValue),
    /// Always normalized to UTC before it goes on the wire.
    Date(DateTime<FixedOffset>),
}

impl RestrictionValue {
    /// True for the literal string `"null"`, which callers use to ask for a
    /// typed null on comparators other than NULL/NOTNULL.
    pub fn is_null_literal(&self) -> bool {
        matches!(self, RestrictionValue::Str(s) if s == "null")
    }
}

impl From<&str> for RestrictionValue {
    fn from(value: &str) -> Self {
        RestrictionValue::Str(value.to_string())
    }
}

impl From<String> for RestrictionValue {
    fn from(value: String) -> Self {
        RestrictionValue::Str(value)
    }
}

impl From<&String> for RestrictionValue {
    fn from(value: &String) -> Self {
        RestrictionValue::Str(value.clone())
    }
}

impl From<i32> for RestrictionValue {
    fn from(value: i32) -> Self {
        RestrictionValue::Int(i64::from(value))
    }
}

impl From<i64> for RestrictionValue {
    fn from(value: i64) -> Self {
        RestrictionValue::Int(value)
    }
}

impl From<u32> for RestrictionValue {
    fn from(value: u32) -> Self {
        RestrictionValue::Int(i64::from(value))
    }
}

impl From<f64> for RestrictionValue {
    fn from(value: f64) -> Self {
        RestrictionValue::Float(value)
    }
}

impl From<bool> for RestrictionValue {
    fn from(value: bool) -> Self {
        RestrictionValue::Bool(value)
    }
}

impl From<EnumValue> for RestrictionValue {
    fn from(value: EnumValue) -> Self {
        RestrictionValue::Enum(value)
    }
}

impl From<Severity> for RestrictionValue {
    fn from(value: Severity) -> Self {
        RestrictionValue::Enum(value.into())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for RestrictionValue {
    fn from(value: DateTime<Tz>) -> Self {
        RestrictionValue::Date(value.fixed_offset())
    }
}

/// An atomic predicate: `attribute comparator value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Restriction {
    pub attribute: String,
    pub comparator: Comparator,
    pub value: Option<RestrictionValue>,
}

impl Restriction {
    pub fn new(
        attribute: impl Into<String>,
        comparator: Comparator,
        value: impl Into<RestrictionValue>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            comparator,
            value: Some(value.into()),
        }
    }

    /// A restriction with no value, typically NULL or NOTNULL.
    pub fn without_value(attribute: impl Into<String>, comparator: Comparator) -> Self {
        Self {
            attribute: attribute.into(),
            comparator,
            value: None,
        }
    }
}

/// A parenthesized group of clauses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NestedRestriction {
    pub clauses: Vec<Clause>,
}

impl NestedRestriction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    pub fn with_or_restriction(self, restriction: impl Into<RestrictionNode>) -> Self {
        self.with_clause(Clause::new(restriction, Operator::Or))
    }

    pub fn with_and_restriction(self, restriction: impl Into<RestrictionNode>) -> Self {
        self.with_clause(Clause::new(restriction, Operator::And))
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// Either side of a clause: a single restriction or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum RestrictionNode {
    Restriction(Restriction),
    Nested(NestedRestriction),
}

impl From<Restriction> for RestrictionNode {
    fn from(restriction: Restriction) -> Self {
        RestrictionNode::Restriction(restriction)
    }
}

impl From<NestedRestriction> for RestrictionNode {
    fn from(nested: NestedRestriction) -> Self {
        RestrictionNode::Nested(nested)
    }
}

/// A restriction plus the operator joining it to the preceding expression.
///
/// The operator of the first clause in a list has nothing to join and is
/// ignored by the FIQL compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub restriction: RestrictionNode,
    pub operator: Operator,
}

impl Clause {
    pub fn new(restriction: impl Into<RestrictionNode>, operator: Operator) -> Self {
        Self {
            restriction: restriction.into(),
            operator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_value_conversions() {
        assert_eq!(RestrictionValue::from("abc"), RestrictionValue::Str("abc".to_string()));
        assert_eq!(RestrictionValue::from(0), RestrictionValue::Int(0));
        assert_eq!(RestrictionValue::from(true), RestrictionValue::Bool(true));
        assert_eq!(
            RestrictionValue::from(Severity::Minor),
            RestrictionValue::Enum(EnumValue { id: 5, label: "MINOR" })
        );
    }

    #[test]
    fn test_date_conversion_keeps_instant() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        match RestrictionValue::from(utc) {
            RestrictionValue::Date(d) => assert_eq!(d.timestamp(), utc.timestamp()),
            other => panic!("expected date, got {:?}", other),
        }
    }

    #[test]
    fn test_null_literal() {
        assert!(RestrictionValue::from("null").is_null_literal());
        assert!(!RestrictionValue::from("NULL").is_null_literal());
        assert!(!RestrictionValue::from(0).is_null_literal());
    }

    #[test]
    fn test_nested_builder_preserves_order() {
        let nested = NestedRestriction::new()
            .with_or_restriction(Restriction::new("a", Comparator::Eq, 1))
            .with_and_restriction(Restriction::without_value("b", Comparator::Null));

        assert_eq!(nested.clauses.len(), 2);
        assert_eq!(nested.clauses[0].operator, Operator::Or);
        assert_eq!(nested.clauses[1].operator, Operator::And);
        match &nested.clauses[1].restriction {
            RestrictionNode::Restriction(r) => {
                assert_eq!(r.attribute, "b");
                assert!(r.value.is_none());
            }
            RestrictionNode::Nested(_) => panic!("expected a plain restriction"),
        }
    }
}
