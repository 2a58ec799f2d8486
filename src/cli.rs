use crate::types::ToolName;
use clap::{Parser, Subcommand};

fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    // If there's a git tag at HEAD, use just the tag (release build)
    if let Some(tag) = option_env!("SOLKIT_GIT_TAG") {
        return tag;
    }

    let commit = option_env!("SOLKIT_GIT_COMMIT").unwrap_or("unknown");
    let branch = option_env!("SOLKIT_GIT_BRANCH").unwrap_or("unknown");

    // Leaked once at startup to satisfy clap's 'static requirement
    let version = format!("v{}-{} ({})", BASE_VERSION, commit, branch);
    Box::leak(version.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "solkit")]
#[command(about = "Toolchain detection and shell PATH setup for Solana development")]
#[command(version = get_version(), propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report which development tools are installed and their versions
    #[command(after_help = "Examples:\n  solkit doctor\n  solkit doctor anchor")]
    Doctor {
        /// Only probe this tool
        #[arg(value_enum)]
        tool: Option<ToolName>,
    },

    /// Manage PATH entries in your shell startup files
    Path {
        #[command(subcommand)]
        action: PathAction,
    },

    /// Manage solkit's configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show the current version
    Version,
}

#[derive(Subcommand)]
pub enum PathAction {
    /// Add a directory to PATH in ~/.bashrc and ~/.zshrc
    #[command(
        after_help = "Examples:\n  solkit path add ~/.avm/bin\n  solkit path add ~/.local/share/solana/install/active_release/bin --name solana"
    )]
    Add {
        /// Directory to expose on PATH
        dir: String,
        /// Register the directory as <NAME>_HOME with a duplicate-safe PATH guard
        #[arg(long)]
        name: Option<String>,
        /// Do not re-source the shell startup files afterwards
        #[arg(long)]
        no_source: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a configuration setting
    Get {
        /// Key to get (if omitted, shows all settings)
        key: Option<String>,
    },
    /// Set a configuration setting
    Set {
        /// Key and value (e.g., 'probe-timeout-secs=10' or 'probe-timeout-secs 10')
        #[arg(trailing_var_arg = true, required = true)]
        args: Vec<String>,
    },
    /// Reset a configuration setting to its default
    Unset {
        /// Key to unset (e.g., 'source-rc-files')
        key: String,
    },
    /// Show full configuration as JSON
    Show,
}
