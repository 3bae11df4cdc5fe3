//! Flat parameter compiler for the V1 REST API.

use super::values::{check_attribute, label_form};
use super::{apply_order_by, FilterProcessor, Params};
use crate::filter::{Comparator, Filter, Operator, RestrictionNode};
use crate::server::ApiVersion;
use crate::{Error, Result};

/// Compiles filters into V1 query parameters.
///
/// V1 has no grouping and a single `comparator` parameter for the whole
/// request, so only OR-joined flat restrictions sharing one comparator can be
/// expressed. NULL and NOTNULL are sent as `attribute=null|notnull` and do not
/// take part in the comparator check.
#[derive(Debug, Default)]
pub struct V1FilterProcessor;

impl V1FilterProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl FilterProcessor for V1FilterProcessor {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V1
    }

    fn parameters(&self, filter: &Filter) -> Result<Params> {
        let mut params = Params::new();

        if let Some(limit) = filter.limit {
            params.set("limit", limit.to_string());
        }

        let mut shared: Option<Comparator> = None;

        for clause in &filter.clauses {
            let restriction = match &clause.restriction {
                RestrictionNode::Restriction(restriction) => restriction,
                RestrictionNode::Nested(_) => {
                    return Err(Error::Unsupported(
                        "nested restrictions are not supported by the V1 API".to_string(),
                    ));
                }
            };

            if clause.operator != Operator::Or {
                return Err(Error::Unsupported(format!(
                    "the V1 API only supports OR between restrictions, found {} on '{}'",
                    clause.operator, restriction.attribute
                )));
            }

            check_attribute(restriction)?;

            match restriction.comparator {
                Comparator::Null => params.append(&restriction.attribute, "null"),
                Comparator::NotNull => params.append(&restriction.attribute, "notnull"),
                comparator => {
                    match shared {
                        Some(existing) if existing != comparator => {
                            return Err(Error::Inconsistent(format!(
                                "the V1 API supports one comparator per request, found {} and {}",
                                existing, comparator
                            )));
                        }
                        Some(_) => {}
                        None => {
                            params.set("comparator", comparator.label().to_ascii_lowercase());
                            shared = Some(comparator);
                        }
                    }

                    let value = restriction
                        .value
                        .as_ref()
                        .map(label_form)
                        .unwrap_or_else(|| "null".to_string());
                    params.append(&restriction.attribute, value);
                }
            }
        }

        apply_order_by(filter, &mut params)?;
        Ok(params)
    }
}
