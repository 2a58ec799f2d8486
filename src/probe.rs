//! Tool detection by running version commands.
//!
//! A missing tool is expected information, not a failure: every probe
//! resolves to a [`ProbeResult`] and nothing is ever propagated to the caller.

use crate::types::{ProbeResult, ToolName, ToolVersion};
use futures_util::future::join_all;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;
use tokio::process::Command;

/// A command to probe, either as a raw string split on whitespace or as an
/// explicit argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLine {
    Raw(String),
    Argv(Vec<String>),
}

impl CommandLine {
    pub fn argv(&self) -> Vec<String> {
        match self {
            CommandLine::Raw(line) => line.split_whitespace().map(str::to_string).collect(),
            CommandLine::Argv(args) => args.clone(),
        }
    }
}

impl From<&str> for CommandLine {
    fn from(line: &str) -> Self {
        CommandLine::Raw(line.to_string())
    }
}

impl From<String> for CommandLine {
    fn from(line: String) -> Self {
        CommandLine::Raw(line)
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(args: Vec<String>) -> Self {
        CommandLine::Argv(args)
    }
}

impl From<&[&str]> for CommandLine {
    fn from(args: &[&str]) -> Self {
        CommandLine::Argv(args.iter().map(|s| s.to_string()).collect())
    }
}

/// Maps each tool to the command that reports its version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRegistry {
    commands: BTreeMap<ToolName, String>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        let commands = ToolName::ALL
            .iter()
            .map(|tool| (*tool, tool.default_version_command().to_string()))
            .collect();
        Self { commands }
    }
}

impl ToolRegistry {
    pub fn empty() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Built-in commands with user overrides applied. A blank override
    /// unregisters the tool.
    pub fn with_overrides(overrides: &HashMap<ToolName, String>) -> Self {
        let mut registry = Self::default();
        for (tool, command) in overrides {
            if command.trim().is_empty() {
                registry.remove(*tool);
            } else {
                registry.insert(*tool, command.clone());
            }
        }
        registry
    }

    pub fn insert(&mut self, tool: ToolName, command: impl Into<String>) {
        self.commands.insert(tool, command.into());
    }

    pub fn remove(&mut self, tool: ToolName) {
        self.commands.remove(&tool);
    }

    pub fn command(&self, tool: ToolName) -> Option<&str> {
        self.commands.get(&tool).map(String::as_str)
    }
}

fn version_regex() -> &'static Regex {
    static VERSION_RE: OnceLock<Regex> = OnceLock::new();
    VERSION_RE.get_or_init(|| Regex::new(r"(?:[\w-]+\s+)?(\d+\.\d+\.\d+)").unwrap())
}

/// Pull the first `major.minor.patch` triple out of a tool's output, falling
/// back to the whole trimmed output.
pub fn extract_version(output: &str) -> ToolVersion {
    let trimmed = output.trim();
    match version_regex()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
    {
        Some(m) => ToolVersion::Semantic(m.as_str().to_string()),
        None => ToolVersion::Unrecognized(trimmed.to_string()),
    }
}

pub async fn run_command(command: impl Into<CommandLine>) -> ProbeResult {
    run_command_with_timeout(command, None).await
}

/// Run a command with captured stdio and interpret its stdout.
///
/// Spawn errors, non-zero exits, empty output and timeouts all map to
/// [`ProbeResult::Unavailable`]. A timed out child is killed.
pub async fn run_command_with_timeout(
    command: impl Into<CommandLine>,
    timeout: Option<Duration>,
) -> ProbeResult {
    let argv = command.into().argv();
    let Some((program, args)) = argv.split_first() else {
        tracing::debug!("Refusing to probe an empty command");
        return ProbeResult::Unavailable;
    };

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    tracing::debug!("Probing: {} {:?}", program, args);

    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!("'{}' did not finish within {:?}", program, limit);
                return ProbeResult::Unavailable;
            }
        },
        None => cmd.output().await,
    };

    let output = match output {
        Ok(output) => output,
        Err(e) => {
            tracing::debug!("Could not run '{}': {}", program, e);
            return ProbeResult::Unavailable;
        }
    };

    if !output.status.success() {
        tracing::debug!("'{}' exited with {}", program, output.status);
        return ProbeResult::Unavailable;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        tracing::debug!("'{}' produced no output", program);
        return ProbeResult::Unavailable;
    }

    ProbeResult::Available {
        raw_output: trimmed.to_string(),
        version: extract_version(trimmed),
    }
}

pub async fn probe_version(
    registry: &ToolRegistry,
    tool: ToolName,
    timeout: Option<Duration>,
) -> ProbeResult {
    let Some(command) = registry.command(tool) else {
        tracing::debug!("No version command registered for {}", tool);
        return ProbeResult::Unavailable;
    };
    run_command_with_timeout(command, timeout).await
}

/// Probe every known tool concurrently, in [`ToolName::ALL`] order.
pub async fn probe_all(
    registry: &ToolRegistry,
    timeout: Option<Duration>,
) -> Vec<(ToolName, ProbeResult)> {
    let probes = ToolName::ALL
        .into_iter()
        .map(|tool| async move { (tool, probe_version(registry, tool, timeout).await) });
    join_all(probes).await
}
