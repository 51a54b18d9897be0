use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use serde::Serialize;
use stackguide_core::{NavState, Navigator, PageKind, RouteTable};

pub fn make_subcommand() -> Command {
    Command::new("routes")
        .about("List the route table, or show what a path resolves to")
        .arg(
            Arg::new("path")
                .value_name("PATH")
                .help("Resolve a single path instead of listing every route"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print JSON instead of text")
                .action(ArgAction::SetTrue),
        )
}

#[derive(Debug, Serialize)]
struct RouteReport {
    path: String,
    status: u16,
    chain: Vec<PageKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn resolve(table: &RouteTable, path: &str) -> RouteReport {
    let mut navigator = Navigator::new(table);
    match navigator.navigate(path) {
        NavState::Rendered(m) => RouteReport {
            path: m.path.clone(),
            status: 200,
            chain: m.chain.clone(),
            error: None,
        },
        NavState::Fallback(e) => RouteReport {
            path: path.to_string(),
            status: e.status,
            chain: Vec::new(),
            error: Some(e.detail().to_string()),
        },
        // navigate always settles
        NavState::Idle | NavState::Matching(_) => RouteReport {
            path: path.to_string(),
            status: 0,
            chain: Vec::new(),
            error: None,
        },
    }
}

fn reports(table: &RouteTable, path: Option<&str>) -> Vec<RouteReport> {
    match path {
        Some(path) => vec![resolve(table, path)],
        None => table.paths().iter().map(|p| resolve(table, p)).collect(),
    }
}

fn format_text(reports: &[RouteReport]) -> String {
    let width = reports.iter().map(|r| r.path.len()).max().unwrap_or(0);
    let mut out = String::new();
    for report in reports {
        let target = match &report.error {
            Some(error) => format!("fallback ({} {})", report.status, error),
            None => report
                .chain
                .iter()
                .map(|p| format!("{:?}", p))
                .collect::<Vec<_>>()
                .join(" > "),
        };
        out.push_str(&format!("{:width$}  {}\n", report.path, target, width = width));
    }
    out
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    let table = RouteTable::canonical();
    let path = args.get_one::<String>("path").map(String::as_str);
    let reports = reports(table, path);

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        print!("{}", format_text(&reports));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_route() {
        let reports = reports(RouteTable::canonical(), None);
        assert_eq!(reports.len(), RouteTable::canonical().paths().len());
        assert!(reports.iter().all(|r| r.status == 200));
    }

    #[test]
    fn test_single_path_chain() {
        let reports = reports(RouteTable::canonical(), Some("/sections/sectionone"));
        assert_eq!(
            reports[0].chain,
            vec![PageKind::Shell, PageKind::Sections, PageKind::SectionOne]
        );
        let text = format_text(&reports);
        assert!(text.contains("Shell > Sections > SectionOne"));
    }

    #[test]
    fn test_unknown_path_reports_fallback() {
        let reports = reports(RouteTable::canonical(), Some("/does-not-exist"));
        assert_eq!(reports[0].status, 404);
        assert!(format_text(&reports).contains("fallback (404 Not Found)"));
    }

    #[test]
    fn test_json_shape() {
        let reports = reports(RouteTable::canonical(), Some("/git"));
        let json = serde_json::to_value(&reports).unwrap();
        assert_eq!(json[0]["path"], "/git");
        assert!(json[0].get("error").is_none());
    }
}
