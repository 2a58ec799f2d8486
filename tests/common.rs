use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

// Not every test binary uses every helper.
#[allow(dead_code)]
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config_path: PathBuf,
    pub bin_path: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config").join("config.json");
        let bin_path = PathBuf::from(env!("CARGO_BIN_EXE_solkit"));

        Self {
            temp_dir,
            config_path,
            bin_path,
        }
    }

    pub fn home(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_home_file(&self, name: &str, content: &str) {
        fs::write(self.home().join(name), content).expect("Failed to write home file");
    }

    pub fn read_home_file(&self, name: &str) -> String {
        fs::read_to_string(self.home().join(name)).expect("Failed to read home file")
    }

    pub fn write_config(&self, content: &str) {
        fs::create_dir_all(self.config_path.parent().unwrap()).unwrap();
        fs::write(&self.config_path, content).expect("Failed to write config");
    }

    /// A command isolated to the temp home directory and config file.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.current_dir(self.home());
        cmd.env("HOME", self.home());
        cmd.env("SOLKIT_CONFIG_PATH", &self.config_path);
        cmd.env_remove("USERPROFILE");
        cmd.env_remove("RUST_LOG");
        cmd.env_remove("SOLKIT_PROBE_TIMEOUT_SECS");
        cmd.env_remove("SOLKIT_SOURCE_RC_FILES");
        cmd
    }

    pub fn run(&self, args: &[&str]) -> CommandOutput {
        self.cmd()
            .args(args)
            .output()
            .expect("Failed to run solkit")
            .into()
    }
}

#[allow(dead_code)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }
}

#[allow(dead_code)]
impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.status.success() {
            panic!(
                "Command failed with status {:?}\nstdout: {}\nstderr: {}",
                self.status.code(),
                self.stdout,
                self.stderr
            );
        }
        self
    }

    pub fn assert_exit_code(&self, code: i32) -> &Self {
        assert_eq!(
            self.status.code(),
            Some(code),
            "Unexpected exit code\nstdout: {}\nstderr: {}",
            self.stdout,
            self.stderr
        );
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Stdout did not contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stdout_lacks(&self, text: &str) -> &Self {
        assert!(
            !self.stdout.contains(text),
            "Stdout unexpectedly contained '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }
}
