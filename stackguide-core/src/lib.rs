pub mod builder;
pub mod card;
pub mod config;
pub mod content;
pub mod highlight;
pub mod markdown;
pub mod nav;
pub mod navigation;
pub mod renderer;
pub mod route;
pub mod step;
pub mod template;

use std::path::Path;

// Re-export main types
pub use builder::{BuildError, Manifest, RenderError, Site, SiteBuilder};
pub use card::{Clipboard, ClipboardError, StepCard, Tab};
pub use content::Catalog;
pub use nav::{NavLink, NavList, is_active};
pub use navigation::{NavState, Navigator};
pub use route::{PageKind, Resolution, RouteError, RouteMatch, RouteTable};
pub use step::{Step, StepList};
pub use template::{TemplateError, TemplateRenderer};

#[derive(Debug)]
pub enum SiteError {
    Build(BuildError),
    Render(RenderError),
}

impl From<BuildError> for SiteError {
    fn from(err: BuildError) -> Self {
        SiteError::Build(err)
    }
}

impl From<RenderError> for SiteError {
    fn from(err: RenderError) -> Self {
        SiteError::Render(err)
    }
}

impl std::fmt::Display for SiteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiteError::Build(e) => write!(f, "{}", e),
            SiteError::Render(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SiteError {}

/// Build the whole site into `output_dir`. Shared by `build` and the
/// dev server's rebuild loop.
pub fn build_site(config: &config::Config, output_dir: &Path, theme_dir: &Path) -> Result<usize, SiteError> {
    let site = SiteBuilder::new()
        .output_dir(output_dir)
        .theme_dir(theme_dir)
        .config(config.clone())
        .build()?;

    Ok(site.render_all()?)
}
