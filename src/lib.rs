pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpOrderStore;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{batch::BatchRunner, pipeline::AssignmentPipeline};
pub use utils::error::{DispatchError, Result};
