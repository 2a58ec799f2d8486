use anyhow::{bail, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use solkit::cli::{Cli, Commands, ConfigAction, PathAction};
use solkit::config::{
    self, get_config_file_path, load_settings, load_settings_from, save_settings, SolkitSettings,
};
use solkit::platform::detect_operating_system;
use solkit::probe::{probe_all, probe_version, ToolRegistry};
use solkit::rcfile;
use solkit::solana_toml::DEFAULT_CONFIG_FILE;
use solkit::types::{PathEntry, ProbeResult, RcOutcome, ToolName};
use solkit::ui::{self, Outro};
use std::path::Path;
use std::time::Duration;

// `path add` mutates the process environment; keep it on one thread
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(&cli)?;

    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => ui::cancel_message(None).exit(),
    };

    match result {
        Ok(Some(outro)) => outro.exit(),
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::debug!("Command failed: {:?}", e);
            ui::error_message(e, None).exit()
        }
    }
}

async fn run(cli: Cli) -> Result<Option<Outro>> {
    match cli.command {
        Commands::Version => {
            println!("solkit v{}", env!("CARGO_PKG_VERSION"));
            Ok(None)
        }

        Commands::Doctor { tool } => {
            let settings = load_settings()?;
            Ok(Some(doctor(&settings, tool).await))
        }

        Commands::Path { action } => match action {
            PathAction::Add {
                dir,
                name,
                no_source,
            } => {
                let settings = load_settings()?;
                add_path(&settings, &dir, name, no_source).await.map(Some)
            }
        },

        Commands::Config { action } => configure(action).map(|_| None),
    }
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "warn"
    } else if cli.verbose == 1 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Could not initialize logging: {}", e))?;

    Ok(())
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

async fn doctor(settings: &SolkitSettings, tool: Option<ToolName>) -> Outro {
    let registry = ToolRegistry::with_overrides(&settings.tools);
    let timeout = settings.probe_timeout();

    println!("{}", ui::title_message("solkit doctor"));
    println!("  {:<8} {}", "os", detect_operating_system());

    let progress = spinner("Checking installed tools...");
    let results = match tool {
        Some(tool) => vec![(tool, probe_version(&registry, tool, timeout).await)],
        None => probe_all(&registry, timeout).await,
    };
    progress.finish_and_clear();

    let mut missing = Vec::new();
    for (tool, result) in &results {
        match result {
            ProbeResult::Available { version, .. } => println!("  {:<8} {}", tool, version),
            ProbeResult::Unavailable => {
                println!("  {:<8} {}", tool, ui::warn_message("not installed"));
                missing.push(tool.as_str());
            }
        }
    }

    let project_config = if Path::new(DEFAULT_CONFIG_FILE).exists() {
        "found"
    } else {
        "not found"
    };
    println!("  {}: {}\n", DEFAULT_CONFIG_FILE, project_config);

    match (tool, missing.is_empty()) {
        (_, true) => ui::success_outro(Some("All checked tools are installed")),
        (Some(tool), false) => ui::error_outro(&format!("{} is not installed", tool), None),
        (None, false) => ui::notice_outro(&format!("Not installed: {}", missing.join(", "))),
    }
}

fn is_valid_var_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

async fn add_path(
    settings: &SolkitSettings,
    dir: &str,
    name: Option<String>,
    no_source: bool,
) -> Result<Outro> {
    let dir = dir.trim();
    if dir.is_empty() {
        bail!("The directory to add must not be empty");
    }

    let entry = match name {
        Some(name) if !is_valid_var_name(&name) => {
            bail!(
                "Invalid name '{}'. Use letters, digits and underscores (e.g. 'solana')",
                name
            );
        }
        Some(name) => PathEntry::named(dir, name),
        None => PathEntry::new(dir),
    };

    let updates = if no_source || !settings.source_rc_files {
        rcfile::register_path(&entry)
    } else {
        let report = rcfile::register_and_source_path(&entry, settings.probe_timeout()).await;
        for output in report.shell_output.iter().filter(|o| !o.is_empty()) {
            println!("{}", output);
        }
        report.updates
    };

    if updates.is_empty() {
        return Ok(ui::notice_outro("Unable to find the user home directory. PATH was not updated"));
    }

    for update in &updates {
        println!("  {}: {}", update.path.display(), update.outcome);
    }

    let outro = if updates.iter().any(|u| u.outcome == RcOutcome::Appended) {
        ui::success_outro(Some(&format!(
            "Added {} to PATH. Open a new shell to pick it up",
            dir
        )))
    } else if updates.iter().any(|u| u.outcome == RcOutcome::AlreadyPresent) {
        ui::notice_outro(&format!("{} is already configured", dir))
    } else if updates.iter().all(|u| u.outcome == RcOutcome::Missing) {
        ui::notice_outro("No shell startup files found (~/.bashrc, ~/.zshrc)")
    } else {
        ui::error_outro("Could not update your shell startup files", None)
    };
    Ok(outro)
}

fn configure(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let settings = load_settings()?;
            if let Some(key) = key {
                match settings.get(&key) {
                    Some(value) => println!("{}", value),
                    None => bail!("Setting '{}' not found", key),
                }
            } else {
                println!("--- solkit settings ---");
                for key in config::SETTING_KEYS {
                    if let Some(value) = settings.get(key) {
                        println!("  {}: {}", key, value);
                    }
                }
                for tool in ToolName::ALL {
                    let key = format!("{}{}", config::TOOLS_PREFIX, tool);
                    if let Some(command) = settings.get(&key) {
                        println!("  {}: {}", key, command);
                    }
                }
            }
        }

        ConfigAction::Set { args } => {
            let (key, value) = match args.as_slice() {
                [pair] => match pair.split_once('=') {
                    Some((key, value)) => (key.to_string(), value.to_string()),
                    None => bail!("Invalid format. Use 'key=value' or 'key value'."),
                },
                [key, rest @ ..] => (key.to_string(), rest.join(" ")),
                [] => bail!("Invalid format. Use 'key=value' or 'key value'."),
            };

            let mut settings = load_settings_from(&get_config_file_path()?)?;
            settings.set(&key, &value)?;
            save_settings(&settings)?;
            tracing::info!("Setting '{}' updated to '{}'", config::normalize_key(&key), value);
        }

        ConfigAction::Unset { key } => {
            let mut settings = load_settings_from(&get_config_file_path()?)?;
            settings.unset(&key)?;
            save_settings(&settings)?;
            tracing::info!("Setting '{}' unset", config::normalize_key(&key));
        }

        ConfigAction::Show => {
            let settings = load_settings()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}
