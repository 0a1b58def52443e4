use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{StorageBackend, DEFAULT_CONFIG_FILE};

/// Infer a CRUD REST API from a JSON sample and simulate calls against it
#[derive(Parser, Debug, Clone)]
#[command(name = "apisim", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, env = "APISIM_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Path prefix of the generated routes
    #[arg(long, global = true, env = "APISIM_PREFIX")]
    pub prefix: Option<String>,

    /// Where the documentation is persisted
    #[arg(long, global = true, env = "APISIM_STORAGE", value_enum)]
    pub storage: Option<StorageBackend>,

    /// Directory used by the file storage backend
    #[arg(long, global = true, env = "APISIM_STORAGE_PATH")]
    pub storage_path: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Write a configuration file with the default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate the API documentation from a JSON sample file
    Generate {
        /// JSON sample describing the data shape
        sample: PathBuf,
    },

    /// List the generated routes
    Routes,

    /// Simulate one request, e.g. `call PUT /api/v1/users/1 --body '{"name":"Bob"}'`
    Call {
        /// HTTP method
        method: String,

        /// Concrete request path
        url: String,

        /// Extra path parameter (key=value), may be repeated
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,
    },

    /// Print the live mock data
    Data,

    /// Remove the persisted documentation
    Reset,
}

/// Parse a `key=value` pair
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid key=value pair: no '=' found in '{}'", s))?;
    if key.is_empty() {
        return Err(format!("invalid key=value pair: empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
