//! Command line definition.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

/// Path value meaning standard output.
pub const STDOUT_PATH: &str = "-";

#[derive(Debug, Parser)]
#[command(name = "wexcfg", version)]
#[command(about = "Build, validate and generate WexBloit test configurations", long_about = None)]
pub struct Cli {
    /// Seconds allowed for each proxy probe
    #[arg(long, env = "WEXCFG_PROBE_TIMEOUT_SECS", default_value_t = 5, global = true)]
    pub probe_timeout_secs: u64,

    /// Directory for generated files when no output path is given
    #[arg(long, env = "WEXCFG_OUTPUT_DIR", default_value = ".", global = true)]
    pub output_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Per-endpoint probe timeout.
    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the bundled templates
    Templates,
    /// List the test case modules and extensions
    Modules,
    /// Write a new working document
    New {
        /// Template to start from; the session default when omitted
        #[arg(short, long)]
        template: Option<String>,
        /// Output file (`.json` for JSON, YAML otherwise); `-` for stdout
        #[arg(short, long, default_value = STDOUT_PATH)]
        out: PathBuf,
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
    /// Check a working document and list every problem
    Validate {
        /// Working document
        file: PathBuf,
    },
    /// Print the configuration a working document generates
    Preview {
        /// Working document
        file: PathBuf,
    },
    /// Write the configuration file for a working document
    Generate {
        /// Working document
        file: PathBuf,
        /// Output file; `-` for stdout. Defaults to the suggested file name
        /// inside the output directory
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Generate even when validation fails
        #[arg(long)]
        force: bool,
    },
    /// Check that the configured proxies accept connections
    Probe {
        /// Working document
        file: PathBuf,
    },
}

/// Check whether `path` means standard output.
#[must_use]
pub fn is_stdout(path: &std::path::Path) -> bool {
    path.as_os_str() == STDOUT_PATH
}
