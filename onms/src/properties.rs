//! Search property metadata.
//!
//! V2 servers describe every queryable attribute of a resource through a
//! `properties` endpoint. The only thing the filter compiler needs from it is
//! the semantic type of an attribute, to pick the right null sentinel. The
//! legal comparator subset is exposed for callers that want to validate input.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::filter::Comparator;
use crate::server::ServerIdentity;
use crate::Result;

/// Semantic type of a search property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchPropertyType {
    String,
    Integer,
    Float,
    Long,
    IpAddress,
    Timestamp,
}

impl SearchPropertyType {
    /// Comparators the server accepts for attributes of this type.
    pub fn comparators(&self) -> &'static [Comparator] {
        use Comparator::*;
        match self {
            SearchPropertyType::String => &[Eq, Ne, Ilike, Like, Null, NotNull],
            SearchPropertyType::Integer
            | SearchPropertyType::Float
            | SearchPropertyType::Long
            | SearchPropertyType::Timestamp => &[Eq, Ne, Gt, Lt, Ge, Le, Null, NotNull],
            SearchPropertyType::IpAddress => &[Eq, Ne, Like, Null, NotNull],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchPropertyType::String => "STRING",
            SearchPropertyType::Integer => "INTEGER",
            SearchPropertyType::Float => "FLOAT",
            SearchPropertyType::Long => "LONG",
            SearchPropertyType::IpAddress => "IP_ADDRESS",
            SearchPropertyType::Timestamp => "TIMESTAMP",
        }
    }
}

impl fmt::Display for SearchPropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One queryable attribute as reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchProperty {
    /// Attribute name used in restrictions, e.g. `alarmAckTime`.
    pub id: String,
    /// Human readable name.
    pub name: String,
    #[serde(rename = "orderBy", default)]
    pub order_by: bool,
    #[serde(rename = "type")]
    pub property_type: SearchPropertyType,
    /// Enumerated values (raw value -> label), when the server restricts them.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub values: IndexMap<String, String>,
}

impl SearchProperty {
    pub fn new(id: impl Into<String>, name: impl Into<String>, property_type: SearchPropertyType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order_by: true,
            property_type,
            values: IndexMap::new(),
        }
    }

    pub fn comparators(&self) -> &'static [Comparator] {
        self.property_type.comparators()
    }

    pub fn supports(&self, comparator: Comparator) -> bool {
        self.comparators().contains(&comparator)
    }
}

/// Find a property by attribute id.
pub fn find_property<'a>(properties: &'a [SearchProperty], id: &str) -> Option<&'a SearchProperty> {
    properties.iter().find(|p| p.id == id)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PropertiesDocument {
    Wrapped {
        #[serde(rename = "searchProperty")]
        search_property: Vec<SearchProperty>,
    },
    Bare(Vec<SearchProperty>),
}

/// Parse the server's properties document.
///
/// Accepts both `{"searchProperty": [...]}` and a bare array.
pub fn parse_search_properties(json: &str) -> Result<Vec<SearchProperty>> {
    let document: PropertiesDocument = serde_json::from_str(json)?;
    Ok(match document {
        PropertiesDocument::Wrapped { search_property } => search_property,
        PropertiesDocument::Bare(properties) => properties,
    })
}

/// The server resource a set of properties belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DaoKind {
    Alarms,
    Events,
    Nodes,
    IpInterfaces,
    SnmpInterfaces,
    Outages,
}

impl DaoKind {
    /// Path of the properties endpoint, relative to the server root.
    pub fn properties_path(&self) -> &'static str {
        match self {
            DaoKind::Alarms => "api/v2/alarms/properties",
            DaoKind::Events => "api/v2/events/properties",
            DaoKind::Nodes => "api/v2/nodes/properties",
            DaoKind::IpInterfaces => "api/v2/ipinterfaces/properties",
            DaoKind::SnmpInterfaces => "api/v2/snmpinterfaces/properties",
            DaoKind::Outages => "api/v2/outages/properties",
        }
    }
}

type CacheKey = (DaoKind, ServerIdentity);

#[derive(Default)]
struct CacheState {
    server: Option<ServerIdentity>,
    entries: HashMap<CacheKey, Arc<[SearchProperty]>>,
}

/// Shared store of property snapshots keyed by resource and server.
///
/// Snapshots are immutable; replacing an entry never affects a compilation
/// that already holds the previous `Arc`.
#[derive(Default)]
pub struct PropertiesCache {
    state: RwLock<CacheState>,
}

impl PropertiesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: DaoKind, server: &ServerIdentity) -> Option<Arc<[SearchProperty]>> {
        let state = self.state.read();
        let hit = state.entries.get(&(kind, server.clone())).cloned();
        tracing::trace!(?kind, %server, hit = hit.is_some(), "properties cache lookup");
        hit
    }

    pub fn put(
        &self,
        kind: DaoKind,
        server: &ServerIdentity,
        properties: Vec<SearchProperty>,
    ) -> Arc<[SearchProperty]> {
        let snapshot: Arc<[SearchProperty]> = properties.into();
        self.state
            .write()
            .entries
            .insert((kind, server.clone()), Arc::clone(&snapshot));
        snapshot
    }

    /// Return the cached snapshot, or run `fetch` and cache its result.
    ///
    /// `fetch` runs without the lock held. Errors are returned as-is and
    /// nothing is cached.
    pub fn get_or_try_insert_with<F>(
        &self,
        kind: DaoKind,
        server: &ServerIdentity,
        fetch: F,
    ) -> Result<Arc<[SearchProperty]>>
    where
        F: FnOnce() -> Result<Vec<SearchProperty>>,
    {
        if let Some(snapshot) = self.get(kind, server) {
            return Ok(snapshot);
        }
        let properties = fetch()?;
        Ok(self.put(kind, server, properties))
    }

    /// Record the currently connected server, dropping entries of any other.
    ///
    /// Returns the number of evicted entries.
    pub fn set_server(&self, server: &ServerIdentity) -> usize {
        let mut state = self.state.write();
        if state.server.as_ref() == Some(server) {
            return 0;
        }
        let before = state.entries.len();
        state.entries.retain(|(_, s), _| s == server);
        let evicted = before - state.entries.len();
        if evicted > 0 {
            tracing::warn!(%server, evicted, "server changed, dropped cached search properties");
        }
        state.server = Some(server.clone());
        evicted
    }

    pub fn current_server(&self) -> Option<ServerIdentity> {
        self.state.read().server.clone()
    }

    /// Drop every entry belonging to `server`.
    pub fn invalidate_server(&self, server: &ServerIdentity) -> usize {
        let mut state = self.state.write();
        let before = state.entries.len();
        state.entries.retain(|(_, s), _| s != server);
        before - state.entries.len()
    }

    /// Drop every entry. The current server is kept.
    pub fn clear(&self) {
        self.state.write().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
