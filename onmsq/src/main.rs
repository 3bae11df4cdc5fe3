//! onmsq: build OpenNMS filters on the command line and print the request
//! parameters the V1 or V2 REST API expects for them.

use clap::{Parser, Subcommand};

mod commands;
mod parse;

#[derive(Parser)]
#[command(name = "onmsq")]
#[command(about = "onmsq - compile OpenNMS filters into REST request parameters")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the server connection config
    Init {
        /// Base URL of the server (defaults to http://localhost:8980/opennms)
        #[arg(short = 'u', long = "url")]
        url: Option<String>,

        /// Version reported by the server (e.g. 21.0.1, 2018.1.0)
        #[arg(short = 's', long = "server-version")]
        server_version: String,

        /// Product line: horizon or meridian (detected from the version if omitted)
        #[arg(short = 't', long = "type")]
        server_type: Option<String>,

        /// User name for the HTTP layer
        #[arg(long = "username")]
        username: Option<String>,

        /// Default result limit for compiled filters
        #[arg(short = 'l', long = "limit")]
        limit: Option<u32>,
    },

    /// Show the resolved config and the server capabilities derived from it
    Config,

    /// Compile a filter expression
    ///
    /// Tokens form `ATTR OP [VALUE] ((and|or) ATTR OP [VALUE])*`, with `(` and
    /// `)` for grouping. NULL/NOTNULL take no value.
    /// Example: onmsq compile id ne 0 and "(" severity eq MINOR or uei like "*x" ")"
    #[command(visible_alias = "c")]
    Compile {
        /// API generation to compile for (1 or 2); required unless `onmsq init` has been run
        #[arg(short = 'a', long = "api")]
        api: Option<String>,

        /// Result limit (defaults to the configured limit)
        #[arg(short = 'l', long = "limit", conflicts_with = "no_limit")]
        limit: Option<u32>,

        /// Send no limit at all
        #[arg(long = "no-limit")]
        no_limit: bool,

        /// Sort key, optionally with a direction: ATTR or ATTR:asc|desc
        #[arg(short = 'o', long = "order-by")]
        order_by: Vec<String>,

        /// Direction for sort keys given without one
        #[arg(long = "order", default_value = "asc")]
        order: String,

        /// Search property JSON used to type null values (V2)
        #[arg(short = 'p', long = "properties")]
        properties: Option<String>,

        /// Output format: query (key=value lines) or json
        #[arg(short = 'f', long = "format", default_value = "query")]
        format: String,

        /// Filter tokens
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },

    /// List search properties from a JSON document
    Properties {
        /// Path to the properties JSON (as returned by /api/v2/<resource>/properties)
        file: String,

        /// Only show this attribute
        #[arg(short = 'a', long = "attribute")]
        attribute: Option<String>,
    },
}

fn init_logging() {
    let filter = std::env::var("ONMSQ_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact()
        .with_env_filter(filter)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { url, server_version, server_type, username, limit } => {
            commands::init(url, &server_version, server_type.as_deref(), username, limit)
        }
        Commands::Config => commands::show_config(),
        Commands::Compile { api, limit, no_limit, order_by, order, properties, format, tokens } => {
            let opts = commands::CompileOptions {
                api,
                limit,
                no_limit,
                order_by,
                order,
                properties,
                format,
            };
            commands::compile(&tokens, &opts)
        }
        Commands::Properties { file, attribute } => commands::properties(&file, attribute.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
