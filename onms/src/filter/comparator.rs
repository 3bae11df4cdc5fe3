//! Comparators, boolean operators and sort orders.
//!
//! Each is a closed enum with a numeric id, a canonical label and a list of
//! aliases. Processors dispatch on the variant itself, so there is exactly one
//! value per comparator and no way to build an "equivalent" one.

use std::fmt;

/// Relational comparators understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    Eq,
    Ne,
    Ilike,
    Like,
    Gt,
    Lt,
    Ge,
    Le,
    Null,
    NotNull,
}

impl Comparator {
    pub const ALL: [Comparator; 10] = [
        Comparator::Eq,
        Comparator::Ne,
        Comparator::Ilike,
        Comparator::Like,
        Comparator::Gt,
        Comparator::Lt,
        Comparator::Ge,
        Comparator::Le,
        Comparator::Null,
        Comparator::NotNull,
    ];

    pub fn id(&self) -> u8 {
        match self {
            Comparator::Eq => 1,
            Comparator::Ne => 2,
            Comparator::Ilike => 3,
            Comparator::Like => 4,
            Comparator::Gt => 5,
            Comparator::Lt => 6,
            Comparator::Ge => 7,
            Comparator::Le => 8,
            Comparator::Null => 9,
            Comparator::NotNull => 10,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Comparator::Eq => "EQ",
            Comparator::Ne => "NE",
            Comparator::Ilike => "ILIKE",
            Comparator::Like => "LIKE",
            Comparator::Gt => "GT",
            Comparator::Lt => "LT",
            Comparator::Ge => "GE",
            Comparator::Le => "LE",
            Comparator::Null => "NULL",
            Comparator::NotNull => "NOTNULL",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Comparator::Eq => &["=", "==", "eq"],
            Comparator::Ne => &["!=", "<>", "ne"],
            Comparator::Ilike => &["ilike"],
            Comparator::Like => &["like", "~"],
            Comparator::Gt => &[">", "gt"],
            Comparator::Lt => &["<", "lt"],
            Comparator::Ge => &[">=", "ge"],
            Comparator::Le => &["<=", "le"],
            Comparator::Null => &["null", "isnull", "is null"],
            Comparator::NotNull => &["notnull", "isnotnull", "is not null"],
        }
    }

    /// Case-insensitive match against the label, then the aliases.
    pub fn matches(&self, token: &str) -> bool {
        matches_token(self.label(), self.aliases(), token)
    }

    pub fn find(token: &str) -> Option<Comparator> {
        Self::ALL.into_iter().find(|c| c.matches(token))
    }

    /// True for the comparators that test for the absence of a value.
    pub fn is_null_check(&self) -> bool {
        matches!(self, Comparator::Null | Comparator::NotNull)
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Boolean operator joining a clause to the expression before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    pub const ALL: [Operator; 2] = [Operator::And, Operator::Or];

    pub fn id(&self) -> u8 {
        match self {
            Operator::And => 1,
            Operator::Or => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Operator::And => &["&", "&&", ";"],
            Operator::Or => &["|", "||", ","],
        }
    }

    pub fn matches(&self, token: &str) -> bool {
        matches_token(self.label(), self.aliases(), token)
    }

    pub fn find(token: &str) -> Option<Operator> {
        Self::ALL.into_iter().find(|o| o.matches(token))
    }

    /// Separator used between FIQL terms.
    pub fn fiql_symbol(&self) -> char {
        match self {
            Operator::And => ';',
            Operator::Or => ',',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl Order {
    pub const ALL: [Order; 2] = [Order::Asc, Order::Desc];

    pub fn id(&self) -> u8 {
        match self {
            Order::Asc => 1,
            Order::Desc => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Order::Asc => &["asc", "ascending"],
            Order::Desc => &["desc", "descending"],
        }
    }

    pub fn matches(&self, token: &str) -> bool {
        matches_token(self.label(), self.aliases(), token)
    }

    pub fn find(token: &str) -> Option<Order> {
        Self::ALL.into_iter().find(|o| o.matches(token))
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn matches_token(label: &str, aliases: &[&str], token: &str) -> bool {
    let token = token.trim();
    label.eq_ignore_ascii_case(token) || aliases.iter().any(|a| a.eq_ignore_ascii_case(token))
}
