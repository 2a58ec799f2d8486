use solkit::rcfile::{register_and_source_path, register_path};
use solkit::types::{PathEntry, RcOutcome};
use std::env;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

// Mutates process-wide environment, so everything runs in a single test on
// the same single-threaded runtime the binary uses.
#[tokio::test(flavor = "current_thread")]
async fn test_register_and_source_path_end_to_end() {
    let home = TempDir::new().expect("Failed to create temp dir");
    fs::write(home.path().join(".zshrc"), "# zsh\n").unwrap();
    env::set_var("HOME", home.path());
    env::remove_var("USERPROFILE");

    let entry = PathEntry::named("/solkit-test/x/bin", "solkit_x");
    let report = register_and_source_path(&entry, Some(Duration::from_secs(10))).await;

    let outcomes: Vec<RcOutcome> = report.updates.iter().map(|u| u.outcome.clone()).collect();
    assert_eq!(outcomes, vec![RcOutcome::Missing, RcOutcome::Appended]);
    assert!(!home.path().join(".bashrc").exists());

    if cfg!(unix) {
        assert_eq!(report.shell_output[0], "~/.bashrc not found");
    }

    assert_eq!(
        env::var("SOLKIT_X_HOME").ok().as_deref(),
        Some("/solkit-test/x/bin")
    );
    let path = env::var("PATH").unwrap();
    assert!(path.starts_with("/solkit-test/x/bin"));

    // Second run touches neither the file nor PATH
    let zshrc = fs::read_to_string(home.path().join(".zshrc")).unwrap();
    let report = register_and_source_path(&entry, Some(Duration::from_secs(10))).await;
    assert_eq!(report.updates[1].outcome, RcOutcome::AlreadyPresent);
    assert_eq!(fs::read_to_string(home.path().join(".zshrc")).unwrap(), zshrc);
    assert_eq!(env::var("PATH").unwrap(), path);

    // Without a home directory registration is a no-op
    env::remove_var("HOME");
    assert!(register_path(&PathEntry::new("/solkit-test/y/bin")).is_empty());
}
