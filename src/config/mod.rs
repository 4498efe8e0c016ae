pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    validate_file_extensions, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::collections::HashMap;

pub const SUPPORTED_INPUT_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "dispatch-etl")]
#[command(about = "Apply spreadsheet delivery assignments to an e-commerce order store")]
pub struct CliConfig {
    /// Spreadsheet with order-to-delivery-person assignments (xlsx, xls or csv)
    pub input: String,

    #[arg(long, default_value = "http://localhost:8080/api")]
    pub store_endpoint: String,

    #[arg(long, default_value = "./output")]
    pub report_path: String,

    #[arg(long)]
    pub auth_token: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Load store settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Skip writing the report bundle archive")]
    pub no_bundle: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn store_endpoint(&self) -> &str {
        &self.store_endpoint
    }

    fn report_path(&self) -> &str {
        &self.report_path
    }

    fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    fn extra_headers(&self) -> Option<&HashMap<String, String>> {
        None
    }

    fn timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("input", &self.input)?;
        validate_file_extensions(
            "input",
            std::slice::from_ref(&self.input),
            &SUPPORTED_INPUT_EXTENSIONS,
        )?;
        validate_url("store_endpoint", &self.store_endpoint)?;
        validate_path("report_path", &self.report_path)?;

        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout, 1)?;
        }

        Ok(())
    }
}
