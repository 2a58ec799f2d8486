use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// External tools the CLI knows how to probe.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ToolName {
    Rust,
    Solana,
    Avm,
    Anchor,
    Yarn,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::Rust,
        ToolName::Solana,
        ToolName::Avm,
        ToolName::Anchor,
        ToolName::Yarn,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::Rust => "rust",
            ToolName::Solana => "solana",
            ToolName::Avm => "avm",
            ToolName::Anchor => "anchor",
            ToolName::Yarn => "yarn",
        }
    }

    /// Command used to ask the tool for its version.
    pub fn default_version_command(&self) -> &'static str {
        match self {
            ToolName::Rust => "rustc --version",
            ToolName::Solana => "solana --version",
            ToolName::Avm => "avm --version",
            ToolName::Anchor => "anchor --version",
            ToolName::Yarn => "yarn --version",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlatformOs {
    #[default]
    Unknown,
    Linux,
    Mac,
    Windows,
}

impl fmt::Display for PlatformOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlatformOs::Unknown => "unknown",
            PlatformOs::Linux => "linux",
            PlatformOs::Mac => "mac",
            PlatformOs::Windows => "windows",
        };
        f.write_str(name)
    }
}

/// Version reported by a tool.
///
/// `Unrecognized` carries the whole trimmed output when no `major.minor.patch`
/// triple could be found, so callers must not assume a strict semver string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolVersion {
    Semantic(String),
    Unrecognized(String),
}

impl ToolVersion {
    pub fn as_str(&self) -> &str {
        match self {
            ToolVersion::Semantic(v) | ToolVersion::Unrecognized(v) => v,
        }
    }

    pub fn semver(&self) -> Option<semver::Version> {
        match self {
            ToolVersion::Semantic(v) => semver::Version::parse(v).ok(),
            ToolVersion::Unrecognized(_) => None,
        }
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Unavailable,
    Available {
        raw_output: String,
        version: ToolVersion,
    },
}

impl ProbeResult {
    pub fn is_available(&self) -> bool {
        matches!(self, ProbeResult::Available { .. })
    }

    pub fn version(&self) -> Option<&ToolVersion> {
        match self {
            ProbeResult::Available { version, .. } => Some(version),
            ProbeResult::Unavailable => None,
        }
    }
}

/// A directory to expose on `PATH`, optionally under a `<NAME>_HOME` variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub new_path: String,
    pub name: Option<String>,
}

impl PathEntry {
    pub fn new(new_path: impl Into<String>) -> Self {
        Self {
            new_path: new_path.into(),
            name: None,
        }
    }

    pub fn named(new_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            new_path: new_path.into(),
            name: Some(name.into()),
        }
    }

    /// The entry's name, with blank names treated as absent.
    pub fn label(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.trim().is_empty())
    }

    /// Variable name for named entries, e.g. `solana` -> `SOLANA_HOME`.
    pub fn home_var(&self) -> Option<String> {
        self.label().map(|name| format!("{}_HOME", name.to_uppercase()))
    }

    /// Shell snippet appended to RC files.
    pub fn snippet(&self) -> String {
        match (self.label(), self.home_var()) {
            (Some(name), Some(var)) => format!(
                "\n# {name}\n\
                 export {var}=\"{path}\"\n\
                 case \":$PATH:\" in\n  \
                 *\":${var}:\"*) ;;\n  \
                 *) export PATH=\"${var}:$PATH\" ;;\n\
                 esac\n\
                 # {name} end\n\n",
                name = name,
                var = var,
                path = self.new_path,
            ),
            _ => format!("export PATH={}:$PATH\n", self.new_path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RcOutcome {
    Appended,
    AlreadyPresent,
    Missing,
    Failed(String),
}

impl fmt::Display for RcOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RcOutcome::Appended => f.write_str("updated"),
            RcOutcome::AlreadyPresent => f.write_str("already configured"),
            RcOutcome::Missing => f.write_str("not found, skipped"),
            RcOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcUpdate {
    pub path: PathBuf,
    pub outcome: RcOutcome,
}
