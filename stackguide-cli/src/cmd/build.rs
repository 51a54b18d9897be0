use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use std::path::Path;
use stackguide_core::build_site;
use crate::config::{DEFAULT_CONFIG_FILE, StackguideConfig};

pub fn add_build_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory for generated site"),
        )
        .arg(
            Arg::new("theme")
                .short('t')
                .long("theme")
                .value_name("DIR")
                .help("Directory of template overrides"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help(format!("Configuration file [default: {DEFAULT_CONFIG_FILE}]")),
        )
}

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("build"))
        .about("Render every route into the output directory")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let config = StackguideConfig::load(args)?;
    let build_config = config.build_config();

    let output_dir = Path::new(&build_config.output);
    let theme_dir = Path::new(&build_config.theme);

    let pages = build_site(config.site_config(), output_dir, theme_dir)?;

    println!("Built {} pages in {}", pages, output_dir.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_writes_site() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("public");
        let out_arg = out.to_string_lossy().to_string();
        let missing_config = dir.path().join("none.toml").to_string_lossy().to_string();

        let matches = make_subcommand()
            .try_get_matches_from(["build", "-o", &out_arg, "-c", &missing_config])
            .unwrap();
        execute(&matches).unwrap();

        assert!(out.join("index.html").is_file());
        assert!(out.join("git/hosting/index.html").is_file());
        assert!(out.join("404.html").is_file());
    }
}
