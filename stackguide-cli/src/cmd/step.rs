use anyhow::{Result, anyhow, bail};
use clap::{Arg, ArgMatches, Command};
use stackguide_core::card::WriterClipboard;
use stackguide_core::markdown::prose_text;
use stackguide_core::{Catalog, Clipboard, Resolution, RouteTable, Step, StepCard};

pub fn make_subcommand() -> Command {
    Command::new("step")
        .about("Copy a step's code to stdout, or list a page's steps")
        .arg(
            Arg::new("route")
                .value_name("ROUTE")
                .required(true)
                .help("Page the step lives on, e.g. /git/reset"),
        )
        .arg(
            Arg::new("id")
                .value_name("STEP_ID")
                .help("Step to copy; omit to list the page's steps"),
        )
}

/// The steps shown on the page `route` resolves to.
fn steps_for(catalog: &Catalog, route: &str) -> Result<Vec<Step>> {
    let matched = match RouteTable::canonical().resolve(route) {
        Resolution::Matched(m) => m,
        Resolution::Fallback(e) => bail!("{}: {}", e.path, e.detail()),
    };

    if let Some(section) = catalog.section_at(&matched.path) {
        return Ok(vec![section.as_step()]);
    }

    let guide = catalog
        .guide(matched.leaf())
        .ok_or_else(|| anyhow!("{} has no steps", route))?;
    Ok(guide.steps.iter().cloned().collect())
}

fn copy_step<C: Clipboard + ?Sized>(step: &Step, clipboard: &C) {
    let mut card = StepCard::new(step);
    card.copy(clipboard);
    tracing::info!(step = step.id(), copied = card.is_copied(), "step copied");
}

pub async fn execute(args: &ArgMatches) -> Result<()> {
    let catalog = Catalog::load()?;
    let route = args
        .get_one::<String>("route")
        .ok_or_else(|| anyhow!("ROUTE is required"))?;
    let steps = steps_for(&catalog, route)?;

    let Some(id) = args.get_one::<String>("id") else {
        for step in &steps {
            println!("{:<10} {:<4} {}", step.id(), step.ordinal(), step.title());
            println!("{:16}{}", "", prose_text(step.description_text()));
        }
        return Ok(());
    };

    let step = steps
        .iter()
        .find(|s| s.id() == id)
        .ok_or_else(|| anyhow!("no step `{}` on {}", id, route))?;

    copy_step(step, &WriterClipboard::new(std::io::stdout()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackguide_core::card::MemoryClipboard;

    #[test]
    fn test_guide_steps_in_order() {
        let catalog = Catalog::load().unwrap();
        let steps = steps_for(&catalog, "/git/reset").unwrap();
        let ids: Vec<&str> = steps.iter().map(|s| s.id()).collect();
        assert_eq!(ids, ["step-1", "step-2", "step-3", "step-4"]);
    }

    #[test]
    fn test_section_page_has_one_step() {
        let catalog = Catalog::load().unwrap();
        let steps = steps_for(&catalog, "/sections/sectionone/").unwrap();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].id(), "sectionone");
    }

    #[test]
    fn test_pages_without_steps_are_errors() {
        let catalog = Catalog::load().unwrap();
        assert!(steps_for(&catalog, "/libraries").is_err());
        assert!(steps_for(&catalog, "/nowhere").is_err());
    }

    #[tokio::test]
    async fn test_copy_step_writes_code() {
        let catalog = Catalog::load().unwrap();
        let steps = steps_for(&catalog, "/prisma").unwrap();
        let clipboard = MemoryClipboard::default();
        copy_step(&steps[0], &clipboard);
        assert_eq!(clipboard.contents().as_deref(), Some(steps[0].code_text()));
    }
}
