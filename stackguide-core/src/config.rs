use std::{fmt, path::Path};

use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parsing(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parsing(e) => write!(f, "TOML parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Parsing(value)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    /// Set by the dev server; never read from disk.
    #[serde(skip)]
    pub dev: Option<DevMode>,
}

impl Config {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&data)?;

        Ok(config)
    }

    /// Build for the live-reload server at `host:port`.
    pub fn dev(&mut self, host: String, port: u16) {
        self.dev = Some(DevMode { host, port });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevMode {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: String,
    pub repo_url: String,
    pub footer: String,
    pub syntax_theme: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "unccode".into(),
            tagline: "STACK GUIDE".into(),
            repo_url: "https://github.com/theaymanian2803/react-shadcn-tailwindcss-setup".into(),
            footer: "© 2026 unccode stack // for experimental web only".into(),
            syntax_theme: crate::highlight::DEFAULT_THEME.into(),
        }
    }
}
