#![deny(missing_docs)]

//! # Convert Command
//!
//! Loads a Postman collection, converts it, validates the result and writes
//! the JSON and YAML documents.

use crate::error::{CliError, CliResult};
use postman2oas_core::oas::{OpenApiContact, OpenApiLicense};
use postman2oas_core::{convert, load_collection, validate_document, write_outputs, ConversionOptions};
use std::path::PathBuf;
use tracing::{info, warn};

/// Arguments for a conversion run.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Path to the exported Postman collection.
    #[clap(long, default_value = "postman_collection.json")]
    pub collection: PathBuf,

    /// Where to write the JSON document.
    #[clap(long, default_value = "openapi.json")]
    pub output_json: PathBuf,

    /// Where to write the YAML document.
    #[clap(long, default_value = "openapi.yaml")]
    pub output_yaml: PathBuf,

    /// Base URL of the hosted API docs, used for `externalDocs` links.
    #[clap(long, env = "POSTMAN2OAS_DOCS_URL")]
    pub docs_url: Option<String>,

    /// `info.contact.name`.
    #[clap(long)]
    pub contact_name: Option<String>,

    /// `info.contact.email`.
    #[clap(long)]
    pub contact_email: Option<String>,

    /// `info.contact.url`.
    #[clap(long)]
    pub contact_url: Option<String>,

    /// `info.license.name`.
    #[clap(long)]
    pub license_name: Option<String>,

    /// SPDX identifier for `info.license.identifier`. Requires `--license-name`.
    #[clap(long, requires = "license_name")]
    pub license_identifier: Option<String>,

    /// Keep every object inline instead of moving repeats into `components`.
    #[clap(long)]
    pub no_resolve_refs: bool,

    /// Fail without writing anything when validation reports problems.
    #[clap(long)]
    pub strict: bool,
}

impl ConvertArgs {
    /// Conversion options described by these arguments.
    pub fn options(&self) -> ConversionOptions {
        let mut options = ConversionOptions::new().with_resolve_references(!self.no_resolve_refs);

        if let Some(url) = &self.docs_url {
            options = options.with_docs_base_url(url);
        }

        let mut contact = OpenApiContact::new();
        if let Some(name) = &self.contact_name {
            contact = contact.with_name(name);
        }
        if let Some(email) = &self.contact_email {
            contact = contact.with_email(email);
        }
        if let Some(url) = &self.contact_url {
            contact = contact.with_url(url);
        }
        if !contact.is_empty() {
            options = options.with_contact(contact);
        }

        if let Some(name) = &self.license_name {
            let mut license = OpenApiLicense::new(name);
            if let Some(identifier) = &self.license_identifier {
                license = license.with_identifier(identifier);
            }
            options = options.with_license(license);
        }

        options
    }
}

/// Executes the conversion.
///
/// # Arguments
///
/// * `args` - Command arguments.
pub fn execute(args: &ConvertArgs) -> CliResult<()> {
    let options = args.options();

    info!(collection = %args.collection.display(), "Loading collection");
    let collection = load_collection(&args.collection, &options)?;
    let document = convert(&collection);

    let report = validate_document(&document);
    if report.is_valid() {
        info!("OpenAPI document passed validation");
    } else if args.strict {
        return Err(CliError::General(report.to_string()));
    } else {
        for diagnostic in report.diagnostics() {
            warn!(location = %diagnostic.location, "{}", diagnostic.message);
        }
    }

    write_outputs(&document, &args.output_json, &args.output_yaml)?;
    Ok(())
}
