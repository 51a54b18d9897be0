use anyhow::Result;
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "./stackguide.toml";

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StackguideConfig {
    /// Build configuration
    pub build: BuildConfig,
    /// Site configuration (from stackguide-core)
    #[serde(flatten)]
    pub site: stackguide_core::config::Config,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Output directory for generated site
    pub output: String,
    /// Directory of template overrides
    pub theme: String,
    /// Configuration file path
    pub config: String,
    /// Host for dev server
    pub host: String,
    /// Port for dev server
    pub port: u16,
    /// Open browser automatically
    pub open: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output: "./out".to_string(),
            theme: "./theme".to_string(),
            config: DEFAULT_CONFIG_FILE.to_string(),
            host: "127.0.0.1".to_string(),
            port: 3000,
            open: false,
        }
    }
}

impl StackguideConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (STACKGUIDE_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let config_file = args
            .try_get_one::<String>("config")
            .ok()
            .flatten()
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        let defaults = Self::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2. Add configuration file if it exists
        if Path::new(&config_file).exists() {
            tracing::debug!(file = %config_file, "reading config file");
            builder = builder.add_source(File::from(Path::new(&config_file)));
        }

        // 3. Add environment variables with STACKGUIDE_ prefix
        builder = builder.add_source(
            Environment::with_prefix("STACKGUIDE")
                .prefix_separator("_")
                .separator("__"), // Use double underscore for nested keys
        );

        // 4. Override with CLI arguments (highest priority)
        let overrides = cli_overrides(args);
        if !overrides.is_empty() {
            builder = builder.add_source(config::Config::try_from(&overrides)?);
        }

        let config = builder.build()?;
        let mut loaded: StackguideConfig = config.try_deserialize()?;
        loaded.build.config = config_file;

        Ok(loaded)
    }

    pub fn site_config(&self) -> &stackguide_core::config::Config {
        &self.site
    }

    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }
}

// Only args that are actually defined for the running command count.
fn cli_overrides(args: &ArgMatches) -> HashMap<String, String> {
    let mut overrides = HashMap::new();

    let string_arg = |name: &str| args.try_get_one::<String>(name).ok().flatten().cloned();

    if let Some(output) = string_arg("output") {
        overrides.insert("build.output".to_string(), output);
    }
    if let Some(theme) = string_arg("theme") {
        overrides.insert("build.theme".to_string(), theme);
    }
    if let Some(host) = string_arg("host") {
        overrides.insert("build.host".to_string(), host);
    }
    if let Some(port) = string_arg("port") {
        match port.parse::<u16>() {
            Ok(port) => {
                overrides.insert("build.port".to_string(), port.to_string());
            }
            Err(_) => tracing::warn!(port, "ignoring invalid port"),
        }
    }
    if args.try_get_one::<bool>("open").ok().flatten() == Some(&true) {
        overrides.insert("build.open".to_string(), "true".to_string());
    }

    overrides
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ArgAction, Command};

    fn command() -> Command {
        Command::new("test")
            .arg(Arg::new("output").long("output").value_name("DIR"))
            .arg(Arg::new("config").long("config").value_name("FILE"))
            .arg(Arg::new("port").long("port").value_name("PORT"))
            .arg(Arg::new("open").long("open").action(ArgAction::SetTrue))
    }

    #[test]
    fn test_default_config() {
        let config = StackguideConfig::default();
        assert_eq!(config.build.output, "./out");
        assert_eq!(config.build.theme, "./theme");
        assert_eq!(config.build.port, 3000);
        assert_eq!(config.site.site.title, "unccode");
    }

    #[test]
    fn test_cli_args_override() {
        let matches = command()
            .try_get_matches_from(vec!["test", "--output", "/custom/output", "--port", "8080"])
            .unwrap();

        let config = StackguideConfig::load(&matches).unwrap();
        assert_eq!(config.build.output, "/custom/output");
        assert_eq!(config.build.port, 8080);
        // Should still have defaults for non-overridden values
        assert_eq!(config.build.theme, "./theme");
        assert!(!config.build.open);
    }

    #[test]
    fn test_file_values_below_cli() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stackguide.toml");
        std::fs::write(
            &file,
            "[site]\ntitle = \"field notes\"\n\n[build]\noutput = \"./public\"\nport = 4000\n",
        )
        .unwrap();

        let file_arg = file.to_string_lossy().to_string();
        let matches = command()
            .try_get_matches_from(vec!["test", "--config", &file_arg, "--port", "5000", "--open"])
            .unwrap();

        let config = StackguideConfig::load(&matches).unwrap();
        assert_eq!(config.site.site.title, "field notes");
        assert_eq!(config.site.site.tagline, "STACK GUIDE");
        assert_eq!(config.build.output, "./public");
        assert_eq!(config.build.port, 5000);
        assert!(config.build.open);
        assert_eq!(config.build.config, file_arg);
    }

    #[test]
    fn test_invalid_port_falls_back() {
        let matches = command()
            .try_get_matches_from(vec!["test", "--port", "not-a-port"])
            .unwrap();
        let config = StackguideConfig::load(&matches).unwrap();
        assert_eq!(config.build.port, 3000);
    }
}
