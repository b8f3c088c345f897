#![deny(missing_docs)]

//! # Postman2OAS CLI
//!
//! Converts an exported Postman collection into OpenAPI 3.1 JSON and YAML.
//!
//! ```text
//! postman2oas --collection api.postman_collection.json \
//!     --output-json openapi.json --output-yaml openapi.yaml
//! ```

use crate::error::CliResult;
use clap::Parser;

mod convert;
mod error;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Postman Collection to OpenAPI 3.1 converter")]
struct Cli {
    #[clap(flatten)]
    args: convert::ConvertArgs,

    /// Log every component registration and dropped item.
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    convert::execute(&cli.args)
}
