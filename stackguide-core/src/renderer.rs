use std::path::Path;

use serde::Serialize;
use tera::Context;

use crate::card::{CardView, StepCard, Tab};
use crate::config::Config;
use crate::content::Catalog;
use crate::highlight::highlight_code;
use crate::markdown::render_prose;
use crate::route::{PageKind, Resolution, RouteError, RouteMatch, RouteTable, location_path};
use crate::step::Step;
use crate::template::{TemplateError, TemplateRenderer};

/// Per-render values layered over the renderer's global context.
pub struct RenderContext {
    context: Context,
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderContext {
    pub fn new() -> Self {
        Self {
            context: Context::new(),
        }
    }

    pub fn add_to_context<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.context.insert(key, value);
    }
}

pub struct Renderer {
    templates: TemplateRenderer,
    global: Context,
}

impl Renderer {
    pub fn new(theme_dir: Option<&Path>) -> Result<Self, TemplateError> {
        let templates = match theme_dir {
            Some(dir) => TemplateRenderer::with_theme(dir)?,
            None => TemplateRenderer::new()?,
        };

        Ok(Self {
            templates,
            global: Context::new(),
        })
    }

    pub fn set_global_context<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.global.insert(key, value);
    }

    pub fn render(&self, template: &str, context: &RenderContext) -> Result<String, TemplateError> {
        let mut full = self.global.clone();
        full.extend(context.context.clone());
        self.templates.render(template, &full)
    }
}

/// A step card as the templates see it: the card's current state plus the
/// pre-rendered code and description.
#[derive(Serialize)]
struct RenderedCard<'a> {
    #[serde(flatten)]
    view: CardView<'a>,
    code_html: String,
    description_html: String,
}

/// The output for one URL.
#[derive(Debug)]
pub struct RenderedPage {
    pub status: u16,
    pub html: String,
}

/// Turns a resolved route into a full HTML document.
pub struct PageComposer<'a> {
    pub renderer: &'a Renderer,
    pub catalog: &'a Catalog,
    pub config: &'a Config,
    pub table: &'a RouteTable,
}

impl PageComposer<'_> {
    /// Resolve and render `url`. A page that fails to render is replaced by
    /// the fallback page carrying the failure's message.
    pub fn render_url(&self, url: &str) -> Result<RenderedPage, TemplateError> {
        match self.table.resolve(url) {
            Resolution::Matched(m) => match self.render_match(&m, location_path(url)) {
                Ok(html) => Ok(RenderedPage { status: 200, html }),
                Err(e) => {
                    tracing::error!(path = %m.path, error = %e, "page failed to render");
                    let error = RouteError::render_failed(&m.path, e.to_string());
                    self.render_fallback(&error)
                }
            },
            Resolution::Fallback(error) => self.render_fallback(&error),
        }
    }

    pub fn render_fallback(&self, error: &RouteError) -> Result<RenderedPage, TemplateError> {
        let mut context = RenderContext::new();
        context.add_to_context("error", error);
        context.add_to_context("error_detail", error.detail());
        let html = self.renderer.render("error.html", &context)?;

        Ok(RenderedPage {
            status: error.status,
            html,
        })
    }

    /// Innermost page first, each result becoming the enclosing page's
    /// outlet, the shell last. `location` is the path as requested; nav
    /// links are marked active against it, not against `route.path`.
    pub fn render_match(&self, route: &RouteMatch, location: &str) -> Result<String, TemplateError> {
        let mut outlet: Option<String> = None;
        for page in route.chain.iter().rev() {
            let inner = if page.has_outlet() { outlet.take() } else { None };
            outlet = Some(self.render_page(*page, location, inner)?);
        }
        Ok(outlet.unwrap_or_default())
    }

    fn render_page(
        &self,
        page: PageKind,
        current_path: &str,
        outlet: Option<String>,
    ) -> Result<String, TemplateError> {
        let mut context = RenderContext::new();
        if let Some(inner) = &outlet {
            context.add_to_context("outlet", inner);
        }

        let template = match page {
            PageKind::Shell => {
                context.add_to_context("current_path", current_path);
                context.add_to_context("page_title", &self.page_title(current_path));
                context.add_to_context("primary_nav", &self.catalog.primary_nav().entries(current_path));
                context.add_to_context("filter_nav", &self.catalog.filter_nav().entries(current_path));
                "shell.html"
            }
            PageKind::Home => {
                context.add_to_context("guides", self.catalog.guides());
                context.add_to_context("library_count", &self.catalog.libraries().len());
                "home.html"
            }
            PageKind::Libraries => {
                context.add_to_context("libraries", self.catalog.libraries());
                "libraries.html"
            }
            PageKind::Components => {
                context.add_to_context("sections", self.catalog.sections());
                "components.html"
            }
            PageKind::Sections => "sections.html",
            PageKind::SectionsIndex => {
                context.add_to_context("sections", self.catalog.sections());
                "sections_index.html"
            }
            PageKind::SectionOne => {
                let section = self.catalog.section("sectionone").ok_or_else(|| {
                    TemplateError::TeraError(tera::Error::msg("section `sectionone` is not in the catalog"))
                })?;
                let step = section.as_step();
                context.add_to_context("section", section);
                context.add_to_context("card", &self.card(&step));
                context.add_to_context("tabs", &Tab::ALL);
                "section.html"
            }
            PageKind::Setup
            | PageKind::GitWorkflow
            | PageKind::GitReset
            | PageKind::Hosting
            | PageKind::SchemaSeed => {
                let guide = self.catalog.guide(page).ok_or_else(|| {
                    TemplateError::TeraError(tera::Error::msg(format!("no guide for {:?}", page)))
                })?;
                let cards: Vec<RenderedCard> = guide.steps.iter().map(|s| self.card(s)).collect();
                context.add_to_context("guide", guide);
                context.add_to_context("cards", &cards);
                context.add_to_context("tabs", &Tab::ALL);
                "guide.html"
            }
        };

        self.renderer.render(template, &context)
    }

    fn card<'s>(&self, step: &'s Step) -> RenderedCard<'s> {
        // Freshly mounted state: code tab, not copied.
        RenderedCard {
            view: StepCard::new(step).view(),
            code_html: highlight_code(step.code_text(), step.code_language(), &self.config.site.syntax_theme),
            description_html: render_prose(step.description_text()),
        }
    }

    fn page_title(&self, current_path: &str) -> String {
        if let Some(link) = self.catalog.filter_nav().active(current_path) {
            return link.name.clone();
        }
        match current_path {
            "/" => "Home".to_string(),
            p if p.starts_with("/sections") => "Sections".to_string(),
            _ => self.config.site.tagline.clone(),
        }
    }
}
