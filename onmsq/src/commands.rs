//! CLI command implementations.

use onms::processor::values::encode_component;
use onms::{
    parse_search_properties, ApiVersion, Config, Filter, Order, OrderBy, SearchProperty, ServerType,
};

use crate::parse::{parse_clauses, ParseError};

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Onms(#[from] onms::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

type Result<T> = std::result::Result<T, CommandError>;

/// Options for `onmsq compile`.
pub struct CompileOptions {
    pub api: Option<String>,
    pub limit: Option<u32>,
    pub no_limit: bool,
    pub order_by: Vec<String>,
    pub order: String,
    pub properties: Option<String>,
    pub format: String,
}

/// Write the connection config.
///
/// Options left out keep their saved values.
pub fn init(
    url: Option<String>,
    version: &str,
    server_type: Option<&str>,
    username: Option<String>,
    limit: Option<u32>,
) -> Result<()> {
    let mut config = Config::load()?;
    config.version = version.to_string();
    if let Some(url) = url {
        config.url = url;
    }
    if let Some(server_type) = server_type {
        config.server_type = Some(server_type.parse::<ServerType>()?);
    }
    if username.is_some() {
        config.username = username;
    }
    if let Some(limit) = limit {
        config.default_limit = limit;
    }

    // Reject versions we cannot reason about before writing anything.
    let metadata = config.metadata()?;
    config.save()?;

    println!("Wrote {}", config.config_path().display());
    println!(
        "Server: {} {} (API {})",
        metadata.server_type,
        metadata.version,
        metadata.api_version()
    );
    Ok(())
}

/// Print the resolved config and derived capabilities.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;
    let metadata = config.metadata()?;

    println!("config:            {}", config.config_path().display());
    if !config.is_saved() {
        println!("                   (not saved, showing defaults)");
    }
    println!("url:               {}", config.url);
    println!("version:           {}", metadata.version);
    println!("type:              {}", metadata.server_type);
    if let Some(username) = &config.username {
        println!("username:          {}", username);
    }
    println!("default limit:     {}", config.default_limit);
    println!("api:               {}", metadata.api_version());
    println!("json:              {}", metadata.use_json());
    println!("graphs:            {}", metadata.graphs());
    println!("outage summaries:  {}", metadata.outage_summaries());
    println!("tickets:           {}", metadata.tickets());
    println!("set node location: {}", metadata.set_node_location());
    println!("ack flow api:      {}", metadata.ack_flow_api());
    Ok(())
}

/// Build a filter from tokens and print the compiled parameters.
pub fn compile(tokens: &[String], opts: &CompileOptions) -> Result<()> {
    let config = Config::load()?;

    let api = match &opts.api {
        Some(api) => api.parse::<ApiVersion>()?,
        None if !config.is_saved() => {
            return Err(onms::Error::NotConfigured(config.config_path()).into());
        }
        None => config.metadata()?.api_version(),
    };

    let limit = if opts.no_limit {
        None
    } else {
        Some(opts.limit.unwrap_or(config.default_limit))
    };

    let mut filter = Filter::new().with_limit(limit);
    for clause in parse_clauses(tokens)? {
        filter = filter.with_clause(clause);
    }

    let default_order = Order::find(&opts.order)
        .ok_or_else(|| CommandError::Usage(format!("Unknown sort order: {}", opts.order)))?;
    for key in &opts.order_by {
        filter = filter.with_order_by(parse_order_by(key, default_order)?);
    }

    let properties = match &opts.properties {
        Some(path) => load_properties(path)?,
        None => Vec::new(),
    };
    if api == ApiVersion::V1 && !properties.is_empty() {
        tracing::debug!("search properties are only used by the V2 API, ignoring them");
    }

    let params = onms::compile(&filter, api, &properties)?;

    match opts.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&params)?),
        "query" => {
            for (key, value) in params.query_pairs() {
                println!("{}={}", key, printable(value));
            }
        }
        other => {
            return Err(CommandError::Usage(format!(
                "Unknown format: {} (expected query or json)",
                other
            )))
        }
    }
    Ok(())
}

/// List search properties from a JSON document.
pub fn properties(path: &str, attribute: Option<&str>) -> Result<()> {
    let properties = load_properties(path)?;
    let selected: Vec<&SearchProperty> = properties
        .iter()
        .filter(|p| attribute.map_or(true, |a| p.id == a))
        .collect();

    if selected.is_empty() {
        if let Some(attribute) = attribute {
            return Err(CommandError::Usage(format!("No such property: {}", attribute)));
        }
        println!("No search properties");
        return Ok(());
    }

    for property in selected {
        let comparators: Vec<&str> = property.comparators().iter().map(|c| c.label()).collect();
        println!(
            "{:<28} {:<11} {:<5} {}",
            property.id,
            property.property_type,
            if property.order_by { "sort" } else { "" },
            comparators.join(",")
        );
        for (value, label) in &property.values {
            println!("    {} = {}", value, label);
        }
    }
    Ok(())
}

fn load_properties(path: &str) -> Result<Vec<SearchProperty>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(parse_search_properties(&contents)?)
}

/// Parse `ATTR` or `ATTR:DIRECTION`.
fn parse_order_by(key: &str, default_order: Order) -> Result<OrderBy> {
    match key.rsplit_once(':') {
        Some((attribute, direction)) => {
            let order = Order::find(direction)
                .ok_or_else(|| CommandError::Usage(format!("Unknown sort order: {}", direction)))?;
            Ok(OrderBy::new(attribute, order))
        }
        None => Ok(OrderBy::new(key, default_order)),
    }
}

/// Percent-encode control characters so sentinels stay visible on a terminal.
fn printable(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_control() {
                encode_component(c.encode_utf8(&mut [0u8; 4]))
            } else {
                c.to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_order_by() {
        let key = parse_order_by("lastEventTime:desc", Order::Asc).unwrap();
        assert_eq!(key, OrderBy::desc("lastEventTime"));

        let key = parse_order_by("id", Order::Desc).unwrap();
        assert_eq!(key, OrderBy::desc("id"));

        assert!(parse_order_by("id:sideways", Order::Asc).is_err());
    }

    #[test]
    fn test_printable() {
        assert_eq!(printable("id!=\u{0000}"), "id!=%00");
        assert_eq!(printable("uei==*x"), "uei==*x");
    }
}
