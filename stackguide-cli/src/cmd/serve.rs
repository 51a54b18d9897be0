use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use notify_debouncer_mini::{DebounceEventResult, new_debouncer};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};
use stackguide_core::build_site;
use stackguide_dev_server::{LiveServer, LiveServerConfig};
use crate::cmd::build::add_build_args;
use crate::config::StackguideConfig;

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("serve"))
        .about("Start development server with live reload")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .value_name("PORT")
                .help("Port to serve on [default: 3000]"),
        )
        .arg(
            Arg::new("host")
                .long("host")
                .value_name("HOST")
                .help("Host to bind to [default: 127.0.0.1]"),
        )
        .arg(
            Arg::new("open")
                .long("open")
                .help("Open browser automatically")
                .action(clap::ArgAction::SetTrue),
        )
}

/// Site config with the live reload script pointed at this server.
fn dev_site_config(config: &StackguideConfig) -> stackguide_core::config::Config {
    let build_config = config.build_config();
    let mut site = config.site_config().clone();
    site.dev(build_config.host.clone(), build_config.port);
    site
}

/// Re-run the full cascade (defaults, file, env, the flags given at
/// startup) after the config file changed.
fn reload_site_config(args: &ArgMatches) -> Result<stackguide_core::config::Config> {
    Ok(dev_site_config(&StackguideConfig::load(args)?))
}

pub async fn execute(args: &ArgMatches) -> Result<()> {
    // Load cascading configuration
    let config = StackguideConfig::load(args)?;
    let build_config = config.build_config();

    let output_dir = PathBuf::from(&build_config.output);
    let theme_dir = PathBuf::from(&build_config.theme);

    // Dev build first so the server has something to serve
    let pages = build_site(&dev_site_config(&config), &output_dir, &theme_dir)?;
    tracing::info!(pages, "initial build done");

    // The server watches the output dir and reloads pages on its own
    let server_config = LiveServerConfig {
        host: build_config.host.clone(),
        port: build_config.port,
        root: output_dir.clone(),
        open: build_config.open,
        ignore: vec![".git".to_string(), "*.tmp".to_string()],
    };

    let server = LiveServer::new(server_config);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!(error = %e, "dev server stopped");
        }
    });

    // Watch theme and config, rebuild on changes
    let watcher_config = config.clone();
    let watcher_args = args.clone();
    let watcher_handle = tokio::spawn(async move {
        if let Err(e) = watch_inputs(watcher_config, watcher_args).await {
            tracing::error!(error = %e, "input watcher stopped");
        }
    });

    // Wait for both tasks
    let _ = tokio::try_join!(server_handle, watcher_handle)?;

    Ok(())
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn is_config_change(path: &Path, config_file: &Path) -> bool {
    absolute(path) == absolute(config_file)
}

fn is_input_change(path: &Path, theme_dir: &Path, config_file: &Path) -> bool {
    absolute(path).starts_with(absolute(theme_dir)) || is_config_change(path, config_file)
}

/// Rebuild when the theme overrides or the config file change. Output
/// paths and the server address stay as they were at startup; only the
/// site settings are reloaded.
async fn watch_inputs(config: StackguideConfig, args: ArgMatches) -> Result<()> {
    let build_config = config.build_config();
    let output_dir = PathBuf::from(&build_config.output);
    let theme_dir = PathBuf::from(&build_config.theme);
    let config_file = PathBuf::from(&build_config.config);

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut debouncer = new_debouncer(
        Duration::from_millis(500), // Slightly longer delay for rebuilds
        move |res: DebounceEventResult| {
            if let Ok(events) = res {
                for event in events {
                    let _ = tx.blocking_send(event.path);
                }
            }
        },
    )?;

    // Watch theme directory if it exists
    if theme_dir.exists() {
        debouncer
            .watcher()
            .watch(&theme_dir, notify::RecursiveMode::Recursive)?;
        tracing::info!(dir = %theme_dir.display(), "watching theme directory");
    }

    // Watch config file if it exists
    if config_file.exists() {
        debouncer
            .watcher()
            .watch(&config_file, notify::RecursiveMode::NonRecursive)?;
        tracing::info!(file = %config_file.display(), "watching config file");
    }

    let mut site_config = dev_site_config(&config);

    while let Some(path) = rx.recv().await {
        if !is_input_change(&path, &theme_dir, &config_file) {
            tracing::trace!(path = %path.display(), "skipping non-input change");
            continue;
        }
        tracing::debug!(path = %path.display(), "input changed");

        if is_config_change(&path, &config_file) {
            match reload_site_config(&args) {
                Ok(reloaded) => site_config = reloaded,
                Err(e) => tracing::error!(error = %e, "keeping previous config"),
            }
        }

        // Rebuild site - the dev server will detect output changes and reload
        match build_site(&site_config, &output_dir, &theme_dir) {
            Ok(pages) => println!("Rebuilt {} pages", pages),
            Err(e) => tracing::error!(error = %e, "rebuild failed"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dev_config_points_at_server() {
        let matches = make_subcommand()
            .try_get_matches_from(["serve", "--port", "4040", "-c", "/no/such/stackguide.toml"])
            .unwrap();
        let config = StackguideConfig::load(&matches).unwrap();
        let site = dev_site_config(&config);
        let dev = site.dev.unwrap();
        assert_eq!(dev.port, 4040);
        assert_eq!(dev.host, "127.0.0.1");
    }

    #[test]
    fn test_config_reload_keeps_cascade() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stackguide.toml");
        std::fs::write(&file, "[site]\ntitle = \"first\"\nfooter = \"from file\"\n").unwrap();
        let file_arg = file.to_string_lossy().to_string();

        // No other test reads this key.
        unsafe { std::env::set_var("STACKGUIDE_SITE__FOOTER", "from env") };

        let matches = make_subcommand()
            .try_get_matches_from(["serve", "-c", &file_arg, "--port", "4141"])
            .unwrap();

        std::fs::write(&file, "[site]\ntitle = \"second\"\nfooter = \"from file\"\n").unwrap();
        let reloaded = reload_site_config(&matches).unwrap();

        unsafe { std::env::remove_var("STACKGUIDE_SITE__FOOTER") };

        assert_eq!(reloaded.site.title, "second");
        assert_eq!(reloaded.site.footer, "from env");
        assert_eq!(reloaded.dev.map(|d| d.port), Some(4141));
    }

    #[test]
    fn test_input_changes() {
        let dir = tempfile::tempdir().unwrap();
        let theme = dir.path().join("theme");
        std::fs::create_dir(&theme).unwrap();
        let template = theme.join("shell.html");
        std::fs::write(&template, "").unwrap();
        let config_file = dir.path().join("stackguide.toml");
        std::fs::write(&config_file, "").unwrap();

        assert!(is_input_change(&template, &theme, &config_file));
        assert!(is_input_change(&config_file, &theme, &config_file));
        assert!(!is_input_change(&dir.path().join("out/index.html"), &theme, &config_file));
    }
}
