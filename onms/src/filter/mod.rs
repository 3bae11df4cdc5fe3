//! Protocol-agnostic filter model.
//!
//! A [`Filter`] is a list of [`Clause`]s. Each clause pairs a restriction (or
//! a nested group of clauses) with the boolean [`Operator`] that joins it to
//! whatever precedes it in the same list:
//!
//! ```text
//! Filter::new()
//!     .with_or_restriction(Restriction::new("id", Comparator::Ne, 0))
//!     .with_and_restriction(
//!         NestedRestriction::new()
//!             .with_or_restriction(Restriction::new("severity", Comparator::Eq, Severity::Minor))
//!             .with_or_restriction(Restriction::new("uei", Comparator::Like, "*x")),
//!     )
//! ```
//!
//! Nothing is validated here. What is legal depends on the wire protocol and
//! is checked by the processors in [`crate::processor`].

mod comparator;
mod model;
mod restriction;

pub use comparator::{Comparator, Operator, Order};
pub use model::{Filter, OrderBy, DEFAULT_LIMIT};
pub use restriction::{Clause, NestedRestriction, Restriction, RestrictionNode, RestrictionValue};
