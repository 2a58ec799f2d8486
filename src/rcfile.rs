//! Shell startup file (RC file) management.
//!
//! Directories are exposed on `PATH` by appending a snippet to the RC files
//! that already exist in the user's home directory. Files are never created,
//! truncated or removed, and a file that already mentions the directory is
//! left untouched, so repeated runs do not grow the file.

use crate::platform::resolve_home_dir;
use crate::types::{PathEntry, RcOutcome, RcUpdate};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Candidate RC files, relative to the home directory, in update order.
pub const RC_FILES: [&str; 2] = [".bashrc", ".zshrc"];

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("Unable to find the user home directory")]
    HomeDirectoryUnresolved,
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not append to {}: {source}", .path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReport {
    pub updates: Vec<RcUpdate>,
    /// Output of re-sourcing each RC file, in [`RC_FILES`] order.
    pub shell_output: Vec<String>,
}

pub fn rc_file_paths(home: &Path) -> Vec<PathBuf> {
    RC_FILES.iter().map(|file| home.join(file)).collect()
}

/// Register `entry` in the RC files of the current user's home directory.
///
/// An unresolved home directory is logged and turns this into a no-op.
pub fn register_path(entry: &PathEntry) -> Vec<RcUpdate> {
    register_in_home("register_path", resolve_home_dir().as_deref(), entry)
}

fn register_in_home(caller: &str, home: Option<&Path>, entry: &PathEntry) -> Vec<RcUpdate> {
    match home {
        Some(home) => register_path_in(home, entry),
        None => {
            tracing::error!("[{}] {}", caller, BootstrapError::HomeDirectoryUnresolved);
            Vec::new()
        }
    }
}

pub fn register_path_in(home: &Path, entry: &PathEntry) -> Vec<RcUpdate> {
    let snippet = entry.snippet();

    rc_file_paths(home)
        .into_iter()
        .map(|path| {
            let outcome = match update_rc_file(&path, &entry.new_path, &snippet) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!("{}", e);
                    RcOutcome::Failed(e.to_string())
                }
            };
            tracing::debug!("{}: {}", path.display(), outcome);
            RcUpdate { path, outcome }
        })
        .collect()
}

fn update_rc_file(
    path: &Path,
    new_path: &str,
    snippet: &str,
) -> Result<RcOutcome, BootstrapError> {
    if !path.exists() {
        return Ok(RcOutcome::Missing);
    }

    // RC files are not required to be UTF-8
    let bytes = fs::read(path).map_err(|source| BootstrapError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if String::from_utf8_lossy(&bytes).contains(new_path) {
        return Ok(RcOutcome::AlreadyPresent);
    }

    let append_err = |source| BootstrapError::Append {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(append_err)?;
    file.write_all(snippet.as_bytes()).map_err(append_err)?;

    tracing::info!("Appended {} to PATH in {}", new_path, path.display());
    Ok(RcOutcome::Appended)
}

/// Register `entry`, then export it into this process and re-source the RC
/// files. The three follow-up actions run concurrently in no particular order.
pub async fn register_and_source_path(
    entry: &PathEntry,
    timeout: Option<Duration>,
) -> SourceReport {
    let home = resolve_home_dir();
    let updates = register_in_home("register_and_source_path", home.as_deref(), entry);

    let (_, bash, zsh) = tokio::join!(
        async { export_to_process(entry) },
        source_rc_file(home.as_deref(), RC_FILES[0], timeout),
        source_rc_file(home.as_deref(), RC_FILES[1], timeout),
    );

    SourceReport {
        updates,
        shell_output: vec![bash, zsh],
    }
}

/// Make `entry` visible to this process and the children it spawns.
///
/// This mutates the process environment with `std::env::set_var`, so it must
/// not race with other threads reading the environment. The binary runs on a
/// current-thread runtime, where the concurrent branches of
/// [`register_and_source_path`] are interleaved on one thread.
pub fn export_to_process(entry: &PathEntry) {
    if let Some(var) = entry.home_var() {
        std::env::set_var(&var, &entry.new_path);
    }

    let current = std::env::var("PATH").unwrap_or_default();
    if let Some(updated) = prepend_path(&current, &entry.new_path) {
        tracing::debug!("Prepending {} to PATH", entry.new_path);
        std::env::set_var("PATH", updated);
    }
}

/// `new_path` prepended to `current`, or `None` when it is already an entry.
pub fn prepend_path(current: &str, new_path: &str) -> Option<String> {
    let separator = if cfg!(windows) { ';' } else { ':' };
    if current.split(separator).any(|entry| entry == new_path) {
        None
    } else if current.is_empty() {
        Some(new_path.to_string())
    } else {
        Some(format!("{}{}{}", new_path, separator, current))
    }
}

/// Source `~/<rc_file>` in a child shell. Failures are reported only as the
/// returned diagnostic text.
pub async fn source_rc_file(
    home: Option<&Path>,
    rc_file: &str,
    timeout: Option<Duration>,
) -> String {
    let script = format!(
        "if [ -f \"$HOME/{rc}\" ]; then . \"$HOME/{rc}\"; else echo \"~/{rc} not found\"; fi",
        rc = rc_file
    );

    let mut cmd = Command::new("sh");
    cmd.arg("-c")
        .arg(&script)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(home) = home {
        cmd.env("HOME", home);
    }

    let output = match timeout {
        Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
            Ok(result) => result,
            Err(_) => return format!("~/{} took longer than {:?} to source", rc_file, limit),
        },
        None => cmd.output().await,
    };

    match output {
        Ok(output) => {
            let mut text = String::from_utf8_lossy(&output.stdout).trim().to_string();
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                if !text.is_empty() {
                    text.push('\n');
                }
                text.push_str(stderr.trim());
            }
            text
        }
        Err(e) => format!("Could not source ~/{}: {}", rc_file, e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn home_with(files: &[(&str, &str)]) -> TempDir {
        let home = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(home.path().join(name), content).expect("Failed to write rc file");
        }
        home
    }

    fn outcomes(updates: &[RcUpdate]) -> Vec<RcOutcome> {
        updates.iter().map(|u| u.outcome.clone()).collect()
    }

    #[test]
    fn test_unnamed_snippet() {
        let entry = PathEntry::new("/opt/tool/bin");
        assert_eq!(entry.snippet(), "export PATH=/opt/tool/bin:$PATH\n");
        assert_eq!(entry.home_var(), None);
    }

    #[test]
    fn test_named_snippet() {
        let entry = PathEntry::named("/opt/tool/bin", "tool");
        assert_eq!(
            entry.snippet(),
            "\n# tool\n\
             export TOOL_HOME=\"/opt/tool/bin\"\n\
             case \":$PATH:\" in\n  \
             *\":$TOOL_HOME:\"*) ;;\n  \
             *) export PATH=\"$TOOL_HOME:$PATH\" ;;\n\
             esac\n\
             # tool end\n\n"
        );
        assert!(entry.snippet().contains("*\":$TOOL_HOME:\"*) ;;"));
        assert!(!entry.snippet().contains("export PATH=/opt"));
    }

    #[test]
    fn test_register_is_idempotent() {
        let home = home_with(&[(".bashrc", "# bash\n"), (".zshrc", "# zsh\n")]);
        let entry = PathEntry::named("/opt/solana/bin", "solana");

        let first = register_path_in(home.path(), &entry);
        assert_eq!(outcomes(&first), vec![RcOutcome::Appended, RcOutcome::Appended]);

        let second = register_path_in(home.path(), &entry);
        assert_eq!(
            outcomes(&second),
            vec![RcOutcome::AlreadyPresent, RcOutcome::AlreadyPresent]
        );

        for file in RC_FILES {
            let content = fs::read_to_string(home.path().join(file)).unwrap();
            assert_eq!(content.matches("export SOLANA_HOME=").count(), 1);
        }
    }

    #[test]
    fn test_existing_path_leaves_file_unchanged() {
        let original = "export PATH=\"/opt/solana/bin:$PATH\"\nalias ll='ls -l'\n";
        let home = home_with(&[(".bashrc", original)]);

        let updates = register_path_in(home.path(), &PathEntry::named("/opt/solana/bin", "solana"));
        assert_eq!(updates[0].outcome, RcOutcome::AlreadyPresent);

        let content = fs::read(home.path().join(".bashrc")).unwrap();
        assert_eq!(content, original.as_bytes());
    }

    #[test]
    fn test_missing_rc_files_are_not_created() {
        let home = home_with(&[]);

        let updates = register_path_in(home.path(), &PathEntry::new("/x/bin"));
        assert_eq!(outcomes(&updates), vec![RcOutcome::Missing, RcOutcome::Missing]);
        assert!(!home.path().join(".bashrc").exists());
        assert!(!home.path().join(".zshrc").exists());
    }

    #[test]
    fn test_only_zshrc_is_updated() {
        let home = home_with(&[(".zshrc", "")]);

        let updates = register_path_in(home.path(), &PathEntry::named("/x/bin", "x"));
        assert_eq!(updates[0].path, home.path().join(".bashrc"));
        assert_eq!(updates[0].outcome, RcOutcome::Missing);
        assert_eq!(updates[1].outcome, RcOutcome::Appended);

        let zshrc = fs::read_to_string(home.path().join(".zshrc")).unwrap();
        assert!(zshrc.contains("export X_HOME=\"/x/bin\""));
        assert!(zshrc.contains("*) export PATH=\"$X_HOME:$PATH\" ;;"));
        assert!(!home.path().join(".bashrc").exists());
    }

    #[test]
    fn test_unreadable_rc_file_is_reported() {
        let home = home_with(&[(".zshrc", "")]);
        fs::create_dir(home.path().join(".bashrc")).unwrap();

        let updates = register_path_in(home.path(), &PathEntry::new("/x/bin"));
        assert!(matches!(updates[0].outcome, RcOutcome::Failed(_)));
        assert_eq!(updates[1].outcome, RcOutcome::Appended);
    }

    #[test]
    fn test_blank_name_uses_plain_export() {
        for name in ["", "   "] {
            let entry = PathEntry::named("/x/bin", name);
            assert_eq!(entry.label(), None);
            assert_eq!(entry.home_var(), None);
            assert_eq!(entry.snippet(), "export PATH=/x/bin:$PATH\n");
        }

        let home = home_with(&[(".bashrc", "")]);
        register_path_in(home.path(), &PathEntry::named("/x/bin", ""));
        let bashrc = fs::read_to_string(home.path().join(".bashrc")).unwrap();
        assert_eq!(bashrc, "export PATH=/x/bin:$PATH\n");
        assert!(!bashrc.contains("_HOME"));
    }

    #[test]
    fn test_non_utf8_rc_file_is_updated() {
        let home = home_with(&[]);
        let original: &[u8] = b"# caf\xe9 latin-1 comment\n";
        fs::write(home.path().join(".bashrc"), original).unwrap();

        let entry = PathEntry::new("/x/bin");
        let updates = register_path_in(home.path(), &entry);
        assert_eq!(updates[0].outcome, RcOutcome::Appended);

        let content = fs::read(home.path().join(".bashrc")).unwrap();
        assert!(content.starts_with(original));
        assert!(content.ends_with(entry.snippet().as_bytes()));

        let again = register_path_in(home.path(), &entry);
        assert_eq!(again[0].outcome, RcOutcome::AlreadyPresent);
    }

    #[test]
    fn test_unresolved_home_registers_nothing() {
        let updates = register_in_home("test", None, &PathEntry::new("/x/bin"));
        assert!(updates.is_empty());
    }

    #[test]
    fn test_prepend_path() {
        let sep = if cfg!(windows) { ';' } else { ':' };
        let current = format!("/usr/bin{}/bin", sep);

        assert_eq!(
            prepend_path(&current, "/x/bin"),
            Some(format!("/x/bin{}{}", sep, current))
        );
        assert_eq!(prepend_path(&current, "/bin"), None);
        assert_eq!(prepend_path("", "/x/bin"), Some("/x/bin".to_string()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_source_rc_file() {
        let home = home_with(&[(".bashrc", "echo sourced-bashrc\n")]);

        let bash = source_rc_file(Some(home.path()), ".bashrc", Some(Duration::from_secs(10))).await;
        assert_eq!(bash, "sourced-bashrc");

        let zsh = source_rc_file(Some(home.path()), ".zshrc", Some(Duration::from_secs(10))).await;
        assert_eq!(zsh, "~/.zshrc not found");
    }
}
