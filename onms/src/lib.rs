//! ONMS: client core for the OpenNMS REST API.
//!
//! Builds protocol-agnostic filters and compiles them into request parameters
//! for either the V1 (flat parameters) or V2 (FIQL) API, depending on what the
//! connected server supports.

pub mod config;
pub mod enums;
pub mod error;
pub mod filter;
pub mod processor;
pub mod properties;
pub mod server;

pub use config::Config;
pub use enums::{EnumValue, OnmsEnum, Severity};
pub use error::{Error, Result};
pub use filter::{Clause, Comparator, Filter, NestedRestriction, Operator, Order, OrderBy, Restriction, RestrictionNode, RestrictionValue};
pub use processor::{compile, FilterProcessor, ParamValue, Params, V1FilterProcessor, V2FilterProcessor};
pub use properties::{parse_search_properties, DaoKind, PropertiesCache, SearchProperty, SearchPropertyType};
pub use server::{ApiVersion, ServerIdentity, ServerMetadata, ServerType, ServerVersion};
