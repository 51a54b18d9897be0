use anyhow::Result;
use clap::{Arg, ArgAction, Command};

mod cmd;
mod config;
mod logging;

fn cli() -> Command {
    Command::new("stackguide")
        .about("Stack setup guides rendered as a static site")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output (-v, -vv, -vvv)")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(cmd::build::make_subcommand())
        .subcommand(cmd::serve::make_subcommand())
        .subcommand(cmd::routes::make_subcommand())
        .subcommand(cmd::step::make_subcommand())
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli().get_matches();
    logging::init_logging(&matches)?;

    match matches.subcommand() {
        Some(("build", args)) => cmd::build::execute(args),
        Some(("serve", args)) => cmd::serve::execute(args).await,
        Some(("routes", args)) => cmd::routes::execute(args),
        Some(("step", args)) => cmd::step::execute(args).await,
        _ => unreachable!("subcommand_required is set"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = cli().try_get_matches_from(["stackguide", "routes", "-vv"]).unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
        assert!(!matches.get_flag("quiet"));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(cli().try_get_matches_from(["stackguide"]).is_err());
    }
}
