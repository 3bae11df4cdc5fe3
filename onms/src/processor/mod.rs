//! Filter compilers.
//!
//! Two REST API generations take filters in incompatible forms:
//!
//! - **V1** ([`V1FilterProcessor`]): flat `attribute=value` parameters, OR
//!   only, one `comparator` shared by the whole query.
//! - **V2** ([`V2FilterProcessor`]): a single `_s` FIQL expression such as
//!   `id!=0;(severity==5,uei==*x)`.
//!
//! A processor is built for one compilation and dropped afterwards. Errors
//! abort the whole compilation; no partial parameters are ever returned.

mod params;
mod v1;
mod v2;
pub mod values;

pub use params::{ParamValue, Params};
pub use v1::V1FilterProcessor;
pub use v2::V2FilterProcessor;
pub use values::{NULL_DATE, NULL_VALUE};

use crate::filter::Filter;
use crate::properties::SearchProperty;
use crate::server::ApiVersion;
use crate::{Error, Result};

/// Compiles a [`Filter`] into request parameters for one API generation.
pub trait FilterProcessor {
    fn api_version(&self) -> ApiVersion;

    fn parameters(&self, filter: &Filter) -> Result<Params>;
}

/// Build the processor for `api`. V2 uses `properties` to type null values.
pub fn for_api<'a>(api: ApiVersion, properties: &'a [SearchProperty]) -> Box<dyn FilterProcessor + 'a> {
    match api {
        ApiVersion::V1 => Box::new(V1FilterProcessor::new()),
        ApiVersion::V2 => Box::new(V2FilterProcessor::with_properties(properties)),
    }
}

/// Compile `filter` for `api` with a fresh processor.
pub fn compile(filter: &Filter, api: ApiVersion, properties: &[SearchProperty]) -> Result<Params> {
    tracing::debug!(
        %api,
        clauses = filter.clauses.len(),
        properties = properties.len(),
        "compiling filter"
    );
    let result = for_api(api, properties).parameters(filter);
    if let Err(e) = &result {
        tracing::debug!(%api, error = %e, "filter rejected");
    }
    result
}

/// Emit `order` and `orderBy`. Both protocols carry a single direction.
pub(crate) fn apply_order_by(filter: &Filter, params: &mut Params) -> Result<()> {
    let Some(first) = filter.order_by.first() else {
        return Ok(());
    };

    if let Some(mixed) = filter.order_by.iter().find(|o| o.order != first.order) {
        return Err(Error::Inconsistent(format!(
            "mixed sort directions are not supported: {} {} and {} {}",
            first.attribute, first.order, mixed.attribute, mixed.order
        )));
    }

    params.set("order", first.order.label());
    for order_by in &filter.order_by {
        params.append("orderBy", &order_by.attribute);
    }
    Ok(())
}
