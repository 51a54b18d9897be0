use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{IncludeBackground, styled_line_to_highlighted_html};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

pub const DEFAULT_THEME: &str = "base16-ocean.dark";

// Initialize syntax highlighting resources once
static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

pub fn theme_exists(name: &str) -> bool {
    THEME_SET.themes.contains_key(name)
}

fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    SYNTAX_SET.find_syntax_by_token(language).or_else(|| {
        // Fallback mappings for languages the default set lacks
        match language {
            "jsx" | "tsx" | "typescript" | "ts" => SYNTAX_SET.find_syntax_by_name("JavaScript"),
            "powershell" | "ps1" => SYNTAX_SET.find_syntax_by_token("bash"),
            _ => None,
        }
    })
}

fn theme(name: &str) -> Option<&'static Theme> {
    THEME_SET
        .themes
        .get(name)
        .or_else(|| THEME_SET.themes.get(DEFAULT_THEME))
}

/// Render `code` as a numbered block. Unknown languages and highlighter
/// failures fall back to escaped plain text.
pub fn highlight_code(code: &str, language: &str, theme_name: &str) -> String {
    let lines = match (find_syntax(language), theme(theme_name)) {
        (Some(syntax), Some(theme)) => highlighted_lines(code, syntax, theme).unwrap_or_else(|e| {
            tracing::warn!(language, error = %e, "highlighting failed, using plain text");
            plain_lines(code)
        }),
        _ => {
            tracing::debug!(language, "no syntax found");
            plain_lines(code)
        }
    };

    let mut html = format!(
        "<pre class=\"code\" data-language=\"{}\"><code>",
        html_escape::encode_double_quoted_attribute(language)
    );
    for (i, line) in lines.iter().enumerate() {
        html.push_str(&format!(
            "<span class=\"line\"><span class=\"ln\">{}</span>{}</span>\n",
            i + 1,
            line
        ));
    }
    html.push_str("</code></pre>\n");
    html
}

fn highlighted_lines(
    code: &str,
    syntax: &SyntaxReference,
    theme: &Theme,
) -> Result<Vec<String>, syntect::Error> {
    let mut highlighter = HighlightLines::new(syntax, theme);
    let mut out = Vec::new();

    for line in LinesWithEndings::from(code) {
        let regions = highlighter.highlight_line(line, &SYNTAX_SET)?;
        let html = styled_line_to_highlighted_html(&regions[..], IncludeBackground::No)?;
        out.push(html.replace(['\r', '\n'], ""));
    }

    Ok(out)
}

fn plain_lines(code: &str) -> Vec<String> {
    code.lines()
        .map(|l| html_escape::encode_text(l).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbers_every_line() {
        let html = highlight_code("git init\ngit add .", "bash", DEFAULT_THEME);
        assert!(html.contains("<span class=\"ln\">1</span>"));
        assert!(html.contains("<span class=\"ln\">2</span>"));
        assert!(!html.contains("<span class=\"ln\">3</span>"));
    }

    #[test]
    fn test_unknown_language_is_escaped() {
        let html = highlight_code("model A { id String @id }\n<script>", "prisma", DEFAULT_THEME);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_highlighted_output_is_escaped() {
        let html = highlight_code("<Button variant=\"outline\">Click Me</Button>", "jsx", DEFAULT_THEME);
        assert!(!html.contains("<Button"));
        assert!(html.contains("Click Me"));
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert!(!theme_exists("no-such-theme"));
        let html = highlight_code("npm install", "bash", "no-such-theme");
        assert!(html.contains("npm"));
    }
}
