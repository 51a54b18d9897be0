use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

/// Every page the site can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    Shell,
    Home,
    Setup,
    Libraries,
    GitWorkflow,
    GitReset,
    Hosting,
    SchemaSeed,
    Components,
    Sections,
    SectionsIndex,
    SectionOne,
}

impl PageKind {
    /// Pages that render a child route inside themselves.
    pub fn has_outlet(&self) -> bool {
        matches!(self, PageKind::Shell | PageKind::Sections)
    }
}

#[derive(Debug)]
pub struct RouteNode {
    /// Relative to the parent. Empty for index routes; may span segments.
    pub path: &'static str,
    pub page: PageKind,
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    pub fn new(path: &'static str, page: PageKind) -> Self {
        Self {
            path,
            page,
            children: Vec::new(),
        }
    }

    pub fn index(page: PageKind) -> Self {
        Self::new("", page)
    }

    pub fn children(mut self, children: Vec<RouteNode>) -> Self {
        self.children = children;
        self
    }

    fn segments(&self) -> impl Iterator<Item = &'static str> {
        split_segments(self.path)
    }

    fn is_index(&self) -> bool {
        self.segments().next().is_none()
    }

    /// Consume this node's segments from `remaining`, then recurse into the
    /// children. Returns the chain from this node down to the leaf.
    fn resolve<'n>(&'n self, remaining: &[&str]) -> Option<Vec<&'n RouteNode>> {
        let own: Vec<&str> = self.segments().collect();
        if remaining.len() < own.len() || remaining[..own.len()] != own[..] {
            return None;
        }
        let rest = &remaining[own.len()..];

        if rest.is_empty() {
            if self.children.is_empty() {
                return Some(vec![self]);
            }
            // A layout with no index child cannot be shown on its own.
            let index = self.children.iter().find(|c| c.is_index())?;
            return Some(vec![self, index]);
        }

        for child in self.children.iter().filter(|c| !c.is_index()) {
            if let Some(mut chain) = child.resolve(rest) {
                chain.insert(0, self);
                return Some(chain);
            }
        }

        None
    }

    fn collect_paths(&self, prefix: &str, out: &mut Vec<String>) {
        let own = join_path(prefix, self.path);
        if self.children.is_empty() {
            out.push(own.clone());
        }
        for child in &self.children {
            child.collect_paths(&own, out);
        }
    }
}

/// Why navigation fell through to the fallback page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteError {
    pub status: u16,
    pub status_text: String,
    pub message: String,
    pub path: String,
}

impl RouteError {
    pub fn not_found(path: &str) -> Self {
        Self {
            status: 404,
            status_text: "Not Found".to_string(),
            message: format!("No route matches URL \"{}\"", path),
            path: path.to_string(),
        }
    }

    pub fn render_failed(path: &str, message: impl Into<String>) -> Self {
        Self {
            status: 500,
            status_text: String::new(),
            message: message.into(),
            path: path.to_string(),
        }
    }

    /// What the fallback page shows: the status text when present,
    /// otherwise the message.
    pub fn detail(&self) -> &str {
        if self.status_text.is_empty() {
            &self.message
        } else {
            &self.status_text
        }
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.status, self.path, self.message)
    }
}

impl std::error::Error for RouteError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteMatch {
    /// Canonical path of the matched route, e.g. `/git/reset`.
    pub path: String,
    /// Outermost first. The last entry is the page shown in the innermost
    /// outlet.
    pub chain: Vec<PageKind>,
}

impl RouteMatch {
    pub fn leaf(&self) -> PageKind {
        // Resolution never yields an empty chain.
        self.chain.last().copied().unwrap_or(PageKind::Shell)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Matched(RouteMatch),
    Fallback(RouteError),
}

impl Resolution {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolution::Fallback(_))
    }
}

#[derive(Debug)]
pub struct RouteTable {
    root: RouteNode,
}

impl RouteTable {
    pub fn new(root: RouteNode) -> Self {
        Self { root }
    }

    /// The site's one route table.
    pub fn canonical() -> &'static RouteTable {
        &CANONICAL
    }

    pub fn resolve(&self, url: &str) -> Resolution {
        let path = location_path(url);
        let segments: Vec<&str> = split_segments(path).collect();

        match self.root.resolve(&segments) {
            Some(chain) => {
                let mut canonical = String::new();
                for node in &chain {
                    canonical = join_path(&canonical, node.path);
                }
                Resolution::Matched(RouteMatch {
                    path: canonical,
                    chain: chain.iter().map(|n| n.page).collect(),
                })
            }
            None => Resolution::Fallback(RouteError::not_found(path)),
        }
    }

    /// Every renderable path, in declaration order.
    pub fn paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.root.collect_paths("", &mut out);
        out
    }
}

static CANONICAL: LazyLock<RouteTable> = LazyLock::new(|| {
    RouteTable::new(RouteNode::new("/", PageKind::Shell).children(vec![
        RouteNode::index(PageKind::Home),
        RouteNode::new("setup", PageKind::Setup),
        RouteNode::new("libraries", PageKind::Libraries),
        RouteNode::new("git", PageKind::GitWorkflow),
        RouteNode::new("git/reset", PageKind::GitReset),
        RouteNode::new("git/hosting", PageKind::Hosting),
        RouteNode::new("prisma", PageKind::SchemaSeed),
        RouteNode::new("components", PageKind::Components),
        RouteNode::new("sections", PageKind::Sections).children(vec![
            RouteNode::index(PageKind::SectionsIndex),
            RouteNode::new("sectionone", PageKind::SectionOne),
        ]),
    ]))
});

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// The path part of `url`, query and fragment removed. Not normalized.
pub fn location_path(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

fn join_path(prefix: &str, path: &str) -> String {
    let mut joined = String::from("/");
    for segment in split_segments(prefix).chain(split_segments(path)) {
        if joined.len() > 1 {
            joined.push('/');
        }
        joined.push_str(segment);
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(url: &str) -> RouteMatch {
        match RouteTable::canonical().resolve(url) {
            Resolution::Matched(m) => m,
            Resolution::Fallback(e) => panic!("{url} fell back: {e}"),
        }
    }

    #[test]
    fn test_every_listed_route_resolves() {
        let expected = [
            "/",
            "/setup",
            "/libraries",
            "/git",
            "/git/reset",
            "/git/hosting",
            "/prisma",
            "/components",
            "/sections",
            "/sections/sectionone",
        ];
        for path in expected {
            assert_eq!(matched(path).path, path);
        }
    }

    #[test]
    fn test_root_renders_home_inside_shell() {
        assert_eq!(matched("/").chain, vec![PageKind::Shell, PageKind::Home]);
    }

    #[test]
    fn test_multi_segment_child_beats_prefix_sibling() {
        assert_eq!(matched("/git").leaf(), PageKind::GitWorkflow);
        assert_eq!(matched("/git/reset").leaf(), PageKind::GitReset);
        assert_eq!(matched("/git/hosting").leaf(), PageKind::Hosting);
    }

    #[test]
    fn test_nested_outlet_chain() {
        assert_eq!(
            matched("/sections/sectionone").chain,
            vec![PageKind::Shell, PageKind::Sections, PageKind::SectionOne]
        );
        assert_eq!(
            matched("/sections").chain,
            vec![PageKind::Shell, PageKind::Sections, PageKind::SectionsIndex]
        );
    }

    #[test]
    fn test_unknown_path_falls_back() {
        match RouteTable::canonical().resolve("/does-not-exist") {
            Resolution::Fallback(e) => {
                assert_eq!(e.status, 404);
                assert_eq!(e.path, "/does-not-exist");
                assert_eq!(e.detail(), "Not Found");
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_and_overlong_paths_fall_back() {
        let table = RouteTable::canonical();
        assert!(table.resolve("/git/reset/extra").is_fallback());
        assert!(table.resolve("/sections/sectionstwo").is_fallback());
        assert!(table.resolve("/Setup").is_fallback());
    }

    #[test]
    fn test_query_and_trailing_slash_ignored_for_matching() {
        assert_eq!(matched("/git/reset/").path, "/git/reset");
        assert_eq!(matched("/setup?tab=info").path, "/setup");
        assert_eq!(matched("/prisma#step-2").path, "/prisma");
    }

    #[test]
    fn test_layout_without_index_needs_child() {
        let table = RouteTable::new(RouteNode::new("/", PageKind::Shell).children(vec![
            RouteNode::new("sections", PageKind::Sections)
                .children(vec![RouteNode::new("sectionone", PageKind::SectionOne)]),
        ]));
        assert!(table.resolve("/sections").is_fallback());
        assert!(!table.resolve("/sections/sectionone").is_fallback());
    }

    #[test]
    fn test_paths_lists_leaves() {
        let paths = RouteTable::canonical().paths();
        assert_eq!(paths.first().map(String::as_str), Some("/"));
        assert!(paths.contains(&"/sections".to_string()));
        assert!(paths.contains(&"/sections/sectionone".to_string()));
        assert_eq!(paths.len(), 10);
    }

    #[test]
    fn test_render_failure_detail_uses_message() {
        let err = RouteError::render_failed("/setup", "template blew up");
        assert_eq!(err.detail(), "template blew up");
    }
}
