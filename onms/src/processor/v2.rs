//! FIQL compiler for the V2 REST API.

use super::values::{check_attribute, encode_component, id_form, NULL_DATE, NULL_VALUE};
use super::{apply_order_by, FilterProcessor, Params};
use crate::filter::{Clause, Comparator, Filter, Restriction, RestrictionNode};
use crate::properties::{find_property, SearchProperty, SearchPropertyType};
use crate::server::ApiVersion;
use crate::{Error, Result};

/// Compiles filters into a V2 `_s` search expression.
///
/// Only values are percent-encoded; the structural characters `;`, `,`, `(`
/// and `)` are emitted as-is.
#[derive(Debug, Default)]
pub struct V2FilterProcessor<'a> {
    properties: &'a [SearchProperty],
}

impl<'a> V2FilterProcessor<'a> {
    /// A processor without search property metadata. Every typed null falls
    /// back to [`NULL_VALUE`].
    pub fn new() -> Self {
        Self { properties: &[] }
    }

    pub fn with_properties(properties: &'a [SearchProperty]) -> Self {
        Self { properties }
    }

    fn expression(&self, clauses: &[Clause]) -> Result<String> {
        let mut search = String::new();
        for (i, clause) in clauses.iter().enumerate() {
            if i > 0 {
                search.push(clause.operator.fiql_symbol());
            }
            match &clause.restriction {
                RestrictionNode::Restriction(restriction) => {
                    search.push_str(&self.term(restriction)?);
                }
                RestrictionNode::Nested(nested) => {
                    if nested.is_empty() {
                        return Err(Error::Unsupported(
                            "empty nested restrictions cannot be expressed in FIQL".to_string(),
                        ));
                    }
                    search.push('(');
                    search.push_str(&self.expression(&nested.clauses)?);
                    search.push(')');
                }
            }
        }
        Ok(search)
    }

    fn term(&self, restriction: &Restriction) -> Result<String> {
        check_attribute(restriction)?;
        let symbol = fiql_comparator(restriction.comparator)?;
        let value = self.value(restriction);
        Ok(format!("{}{}{}", restriction.attribute, symbol, value))
    }

    fn value(&self, restriction: &Restriction) -> String {
        let value = restriction.value.as_ref();

        if restriction.comparator.is_null_check() {
            return match value {
                Some(value) => encode_component(&id_form(value)),
                None => NULL_VALUE.to_string(),
            };
        }

        match value {
            Some(value) if !value.is_null_literal() => encode_component(&id_form(value)),
            _ => self.typed_null(&restriction.attribute),
        }
    }

    fn typed_null(&self, attribute: &str) -> String {
        let property_type = find_property(self.properties, attribute).map(|p| p.property_type);
        match property_type {
            Some(SearchPropertyType::Timestamp) => encode_component(NULL_DATE),
            _ => NULL_VALUE.to_string(),
        }
    }
}

fn fiql_comparator(comparator: Comparator) -> Result<&'static str> {
    match comparator {
        Comparator::Eq | Comparator::Null | Comparator::Like => Ok("=="),
        Comparator::Ne | Comparator::NotNull => Ok("!="),
        Comparator::Gt => Ok("=gt="),
        Comparator::Lt => Ok("=lt="),
        Comparator::Ge => Ok("=ge="),
        Comparator::Le => Ok("=le="),
        Comparator::Ilike => Err(Error::Unsupported(
            "the ILIKE comparator is not supported by the V2 API".to_string(),
        )),
    }
}

impl FilterProcessor for V2FilterProcessor<'_> {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V2
    }

    fn parameters(&self, filter: &Filter) -> Result<Params> {
        let mut params = Params::new();
        params.set("limit", filter.limit.unwrap_or(0).to_string());

        let search = self.expression(&filter.clauses)?;
        if !search.is_empty() {
            params.set("_s", search);
        }

        apply_order_by(filter, &mut params)?;
        Ok(params)
    }
}
