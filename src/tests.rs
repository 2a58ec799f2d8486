#[cfg(test)]
mod tests {
    use crate::config::SolkitSettings;
    use crate::platform;
    use crate::probe::ToolRegistry;
    use crate::types::{PathEntry, PlatformOs, ToolName};

    #[test]
    fn test_platform_info() {
        let os = platform::detect_operating_system();
        if cfg!(target_os = "linux") {
            assert_eq!(os, PlatformOs::Linux);
        } else if cfg!(target_os = "macos") {
            assert_eq!(os, PlatformOs::Mac);
        } else if cfg!(windows) {
            assert_eq!(os, PlatformOs::Windows);
        }
    }

    #[test]
    fn test_every_tool_has_a_default_command() {
        let registry = ToolRegistry::default();
        for tool in ToolName::ALL {
            let command = registry.command(tool).expect("default command");
            assert!(command.ends_with("--version"), "{}: {}", tool, command);
        }
    }

    #[test]
    fn test_settings_drive_registry() {
        let mut settings = SolkitSettings::default();
        settings.tools.insert(ToolName::Rust, String::new());

        let registry = ToolRegistry::with_overrides(&settings.tools);
        assert_eq!(registry.command(ToolName::Rust), None);
        assert_eq!(registry.command(ToolName::Solana), Some("solana --version"));
    }

    #[test]
    fn test_tool_name_home_var() {
        for tool in ToolName::ALL {
            let entry = PathEntry::named("/opt/bin", tool.as_str());
            let var = entry.home_var().expect("named entry");
            assert_eq!(var, format!("{}_HOME", tool.as_str().to_uppercase()));
            assert!(entry.snippet().contains(&format!("*\":${}:\"*) ;;", var)));
        }
    }

    #[test]
    fn test_tool_name_padding() {
        assert_eq!(format!("[{:<6}]", ToolName::Avm), "[avm   ]");
        assert_eq!(ToolName::Anchor.to_string(), "anchor");
    }
}
