use pulldown_cmark::{Event, Options, Parser, html};

/// Render a short prose field (step descriptions, section blurbs) to HTML.
/// Raw HTML in the source is shown as text, never passed through.
pub fn render_prose(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(source, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    out
}

/// Plain text of a prose field with markdown markers removed.
pub fn prose_text(source: &str) -> String {
    let mut text = String::new();
    for event in Parser::new(source) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_code_and_emphasis() {
        let html = render_prose("Rename the branch to **main** with `git branch -M`.");
        assert!(html.contains("<strong>main</strong>"));
        assert!(html.contains("<code>git branch -M</code>"));
    }

    #[test]
    fn test_raw_html_is_escaped() {
        let html = render_prose("Use <script>alert(1)</script> carefully");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_prose_text_strips_markers() {
        assert_eq!(prose_text("Run `ls -Force` **now**"), "Run ls -Force now");
    }
}
