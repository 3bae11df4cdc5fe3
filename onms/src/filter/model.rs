//! The top-level filter container.

use super::comparator::{Operator, Order};
use super::restriction::{Clause, RestrictionNode};

/// Limit applied when the caller does not choose one.
pub const DEFAULT_LIMIT: u32 = 1000;

/// Sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub attribute: String,
    pub order: Order,
}

impl OrderBy {
    pub fn new(attribute: impl Into<String>, order: Order) -> Self {
        Self {
            attribute: attribute.into(),
            order,
        }
    }

    pub fn asc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, Order::Asc)
    }

    pub fn desc(attribute: impl Into<String>) -> Self {
        Self::new(attribute, Order::Desc)
    }
}

/// A complete query: limit, clauses and sort keys.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    /// Maximum number of results (None = let the server decide).
    pub limit: Option<u32>,
    pub clauses: Vec<Clause>,
    pub order_by: Vec<OrderBy>,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            limit: Some(DEFAULT_LIMIT),
            clauses: Vec::new(),
            order_by: Vec::new(),
        }
    }
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
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

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by.push(order_by);
        self
    }

    /// True when the filter has no clauses (matches everything).
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}
