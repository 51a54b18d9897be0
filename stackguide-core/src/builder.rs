use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{Config, DevMode};
use crate::content::{Catalog, ContentError};
use crate::renderer::{PageComposer, RenderedPage, Renderer};
use crate::route::{RouteError, RouteTable};
use crate::template::TemplateError;

const SITE_CSS: &str = include_str!("../assets/site.css");
const SITE_JS: &str = include_str!("../assets/site.js");

#[derive(Debug)]
pub enum BuildError {
    Content(ContentError),
    TemplateError(TemplateError),
    UnknownTheme(String),
}

impl From<TemplateError> for BuildError {
    fn from(err: TemplateError) -> Self {
        BuildError::TemplateError(err)
    }
}

impl From<ContentError> for BuildError {
    fn from(err: ContentError) -> Self {
        BuildError::Content(err)
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Content(e) => write!(f, "Content error: {}", e),
            BuildError::TemplateError(e) => write!(f, "Template error: {}", e),
            BuildError::UnknownTheme(t) => write!(f, "Unknown syntax theme: {}", t),
        }
    }
}

impl std::error::Error for BuildError {}

#[derive(Debug)]
pub enum RenderError {
    TemplateError(TemplateError),
    IoError(std::io::Error),
}

impl From<TemplateError> for RenderError {
    fn from(err: TemplateError) -> Self {
        RenderError::TemplateError(err)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(err: std::io::Error) -> Self {
        RenderError::IoError(err)
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::TemplateError(e) => write!(f, "Template error: {}", e),
            RenderError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for RenderError {}

/// HTTP status of every written route, kept next to the pages so a server
/// can answer a route that failed to render with the fallback's status.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub routes: Vec<ManifestEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    pub status: u16,
}

impl Manifest {
    pub const FILE: &'static str = "routes.json";

    pub fn from_json(data: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    pub fn status_of(&self, path: &str) -> Option<u16> {
        self.routes.iter().find(|r| r.path == path).map(|r| r.status)
    }
}

pub struct SiteBuilder {
    output_dir: PathBuf,
    theme_dir: Option<PathBuf>,
    config: Config,
    table: &'static RouteTable,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            output_dir: PathBuf::from("./out"),
            theme_dir: None,
            config: Config::default(),
            table: RouteTable::canonical(),
        }
    }

    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    /// Directory of template overrides.
    pub fn theme_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.theme_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Site, BuildError> {
        if !crate::highlight::theme_exists(&self.config.site.syntax_theme) {
            return Err(BuildError::UnknownTheme(self.config.site.syntax_theme.clone()));
        }

        let catalog = Catalog::load()?;
        let mut renderer = Renderer::new(self.theme_dir.as_deref())?;

        // Set global context once
        renderer.set_global_context("site", &self.config.site);
        renderer.set_global_context("dev", &self.config.dev.as_ref().map(DevContext::from));

        Ok(Site {
            catalog,
            renderer,
            config: self.config,
            table: self.table,
            output_dir: self.output_dir,
        })
    }
}

#[derive(serde::Serialize)]
struct DevContext<'a> {
    host: &'a str,
    port: u16,
}

impl<'a> From<&'a DevMode> for DevContext<'a> {
    fn from(value: &'a DevMode) -> Self {
        Self {
            host: &value.host,
            port: value.port,
        }
    }
}

pub struct Site {
    catalog: Catalog,
    renderer: Renderer,
    config: Config,
    table: &'static RouteTable,
    output_dir: PathBuf,
}

impl Site {
    fn composer(&self) -> PageComposer<'_> {
        PageComposer {
            renderer: &self.renderer,
            catalog: &self.catalog,
            config: &self.config,
            table: self.table,
        }
    }

    /// Render whatever `url` resolves to, the fallback page included.
    pub fn render_url(&self, url: &str) -> Result<RenderedPage, TemplateError> {
        self.composer().render_url(url)
    }

    fn route_out_path(&self, route: &str) -> PathBuf {
        let relative = route.trim_start_matches('/');
        if relative.is_empty() {
            self.output_dir.join("index.html")
        } else {
            self.output_dir.join(relative).join("index.html")
        }
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), RenderError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Write every route, the route manifest, the fallback page and the
    /// static assets. Returns the number of route pages written.
    pub fn render_all(&self) -> Result<usize, RenderError> {
        std::fs::create_dir_all(&self.output_dir)?;

        let mut manifest = Manifest::default();
        for route in self.table.paths() {
            let page = self.render_url(&route)?;
            if page.status != 200 {
                tracing::warn!(route, status = page.status, "route rendered as fallback");
            }
            let out_path = self.route_out_path(&route);
            tracing::debug!(route, path = %out_path.display(), "writing page");
            self.write(&out_path, &page.html)?;
            manifest.routes.push(ManifestEntry {
                path: route,
                status: page.status,
            });
        }
        let written = manifest.routes.len();

        let manifest_json = serde_json::to_string_pretty(&manifest).map_err(std::io::Error::other)?;
        self.write(&self.output_dir.join(Manifest::FILE), &manifest_json)?;

        let not_found = self
            .composer()
            .render_fallback(&RouteError::not_found("/404"))?;
        self.write(&self.output_dir.join("404.html"), &not_found.html)?;

        let assets = self.output_dir.join("assets");
        self.write(&assets.join("site.css"), SITE_CSS)?;
        self.write(&assets.join("site.js"), SITE_JS)?;

        tracing::info!(pages = written, out = %self.output_dir.display(), "site rendered");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_into(dir: &Path) -> Site {
        SiteBuilder::new().output_dir(dir).build().unwrap()
    }

    #[test]
    fn test_writes_every_route() {
        let dir = tempfile::tempdir().unwrap();
        let site = build_into(dir.path());
        let written = site.render_all().unwrap();

        assert_eq!(written, RouteTable::canonical().paths().len());
        assert!(dir.path().join("index.html").is_file());
        assert!(dir.path().join("git/reset/index.html").is_file());
        assert!(dir.path().join("sections/sectionone/index.html").is_file());
        assert!(dir.path().join("404.html").is_file());
        assert!(dir.path().join("assets/site.js").is_file());
    }

    #[test]
    fn test_manifest_records_failed_route() {
        let dir = tempfile::tempdir().unwrap();
        let theme = dir.path().join("theme");
        std::fs::create_dir(&theme).unwrap();
        std::fs::write(theme.join("libraries.html"), "{{ missing_variable }}").unwrap();
        let out = dir.path().join("out");

        let site = SiteBuilder::new().output_dir(&out).theme_dir(&theme).build().unwrap();
        site.render_all().unwrap();

        let manifest =
            Manifest::from_json(&std::fs::read_to_string(out.join(Manifest::FILE)).unwrap()).unwrap();
        assert_eq!(manifest.routes.len(), RouteTable::canonical().paths().len());
        assert_eq!(manifest.status_of("/libraries"), Some(500));
        assert_eq!(manifest.status_of("/git"), Some(200));
        assert_eq!(manifest.status_of("/nowhere"), None);
    }

    #[test]
    fn test_not_found_page_has_no_shell() {
        let dir = tempfile::tempdir().unwrap();
        build_into(dir.path()).render_all().unwrap();

        let html = std::fs::read_to_string(dir.path().join("404.html")).unwrap();
        assert!(html.contains("Back to Home"));
        assert!(!html.contains("filter-nav"));
    }

    #[test]
    fn test_dev_build_injects_livereload() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.dev("127.0.0.1".into(), 4321);
        let site = SiteBuilder::new().output_dir(dir.path()).config(config).build().unwrap();

        let html = site.render_url("/prisma").unwrap().html;
        assert!(html.contains("ws://127.0.0.1:4321/__livereload"));
    }

    #[test]
    fn test_production_build_has_no_livereload() {
        let dir = tempfile::tempdir().unwrap();
        let html = build_into(dir.path()).render_url("/prisma").unwrap().html;
        assert!(!html.contains("__livereload"));
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let mut config = Config::default();
        config.site.syntax_theme = "neon-vomit".into();
        let err = SiteBuilder::new().config(config).build().err().unwrap();
        assert!(matches!(err, BuildError::UnknownTheme(_)));
    }
}
