use std::path::Path;
use tera::{Context, Tera};

#[derive(Debug)]
pub enum TemplateError {
    TeraError(tera::Error),
    IoError(std::io::Error),
}

impl From<tera::Error> for TemplateError {
    fn from(err: tera::Error) -> Self {
        TemplateError::TeraError(err)
    }
}

impl From<std::io::Error> for TemplateError {
    fn from(err: std::io::Error) -> Self {
        TemplateError::IoError(err)
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::TeraError(e) => {
                // tera hides the useful part in the source chain
                write!(f, "Template error: {}", e)?;
                let mut source = std::error::Error::source(e);
                while let Some(inner) = source {
                    write!(f, ": {}", inner)?;
                    source = inner.source();
                }
                Ok(())
            }
            TemplateError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for TemplateError {}

const BUILTIN: &[(&str, &str)] = &[
    ("macros.html", include_str!("../templates/macros.html")),
    ("shell.html", include_str!("../templates/shell.html")),
    ("error.html", include_str!("../templates/error.html")),
    ("home.html", include_str!("../templates/home.html")),
    ("guide.html", include_str!("../templates/guide.html")),
    ("libraries.html", include_str!("../templates/libraries.html")),
    ("components.html", include_str!("../templates/components.html")),
    ("sections.html", include_str!("../templates/sections.html")),
    ("sections_index.html", include_str!("../templates/sections_index.html")),
    ("section.html", include_str!("../templates/section.html")),
];

pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Built-in templates only.
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(BUILTIN.iter().copied())?;

        Ok(Self { tera })
    }

    /// Built-in templates, with any `*.html` in `theme_dir` replacing the
    /// built-in of the same file name.
    pub fn with_theme(theme_dir: &Path) -> Result<Self, TemplateError> {
        let mut renderer = Self::new()?;
        if !theme_dir.is_dir() {
            return Ok(renderer);
        }

        let mut overrides = Vec::new();
        for entry in std::fs::read_dir(theme_dir)? {
            let path = entry?.path();
            if path.extension().map(|ext| ext == "html").unwrap_or(false) {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string());
                match name.as_deref() {
                    Some(n) if renderer.has_template(n) => {
                        tracing::info!(template = n, "theme overrides built-in template")
                    }
                    _ => tracing::debug!(template = ?name, "adding theme template"),
                }
                overrides.push((path, name));
            }
        }

        if !overrides.is_empty() {
            renderer.tera.add_template_files(overrides)?;
        }

        Ok(renderer)
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render a template with an external context
    pub fn render(&self, template: &str, context: &Context) -> Result<String, TemplateError> {
        Ok(self.tera.render(template, context)?)
    }
}
