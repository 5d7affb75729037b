//! Command-line interface definitions for `onion-dump`.

use std::path::PathBuf;

use clap::Parser;

/// Parsed CLI arguments for `onion-dump`.
///
/// Layers are stacked lowest first: the discovered folder file, then each
/// `--file` in order, then the whitelisted environment.
#[derive(Debug, Parser)]
#[command(name = "onion-dump")]
#[command(about = "Print the merged view of layered configuration sources")]
#[command(version)]
pub struct Args {
    /// Configuration file to layer (repeat to stack; later files win).
    #[arg(long, value_name = "path")]
    pub file: Vec<PathBuf>,
    /// Folder searched for `<name>.<ext>`.
    #[arg(long, value_name = "dir", requires = "name")]
    pub folder: Option<PathBuf>,
    /// Base name of the file discovered in `--folder`.
    #[arg(long, value_name = "config", requires = "folder")]
    pub name: Option<String>,
    /// Environment variable to include (repeat for several).
    #[arg(long, value_name = "VAR")]
    pub env: Vec<String>,
    /// Separator splitting environment variable names into nested keys.
    #[arg(long, value_name = "sep", default_value = "_")]
    pub env_separator: String,
    /// Key delimiter used by `--key`.
    #[arg(long, value_name = "delim", default_value = onion::DEFAULT_DELIMITER)]
    pub delimiter: String,
    /// Print only the value at this key.
    #[arg(long, value_name = "key")]
    pub key: Option<String>,
}
