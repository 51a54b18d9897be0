use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

#[derive(Debug, PartialEq, Eq)]
pub enum NavError {
    DuplicatePath(String),
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::DuplicatePath(p) => write!(f, "Duplicate nav path: {}", p),
        }
    }
}

impl std::error::Error for NavError {}

/// Glyphs used by the navigation and page templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    LayoutTemplate,
    BookOpen,
    GitBranch,
    RefreshCw,
    Cloud,
    Database,
    Layers,
    Zap,
    Activity,
    MousePointer,
    Play,
    Github,
    Terminal,
    Server,
    Rocket,
    Code,
}

impl Icon {
    /// Short text stand-in for the glyph.
    pub fn glyph(&self) -> &'static str {
        match self {
            Icon::LayoutTemplate => "▦",
            Icon::BookOpen => "❏",
            Icon::GitBranch => "⑂",
            Icon::RefreshCw => "↻",
            Icon::Cloud => "☁",
            Icon::Database => "⛁",
            Icon::Layers => "≋",
            Icon::Zap => "⚡",
            Icon::Activity => "∿",
            Icon::MousePointer => "➚",
            Icon::Play => "▶",
            Icon::Github => "⌥",
            Icon::Terminal => "❯",
            Icon::Server => "▤",
            Icon::Rocket => "➶",
            Icon::Code => "‹›",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavLink {
    pub name: String,
    pub path: String,
    pub icon: Option<Icon>,
}

impl NavLink {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            icon: None,
        }
    }

    pub fn with_icon(mut self, icon: Icon) -> Self {
        self.icon = Some(icon);
        self
    }
}

/// Exact string comparison. `/git` is not active on `/git/reset`, and
/// `/git/` is not active on `/git`.
pub fn is_active(path: &str, current_path: &str) -> bool {
    path == current_path
}

/// A link list with unique paths.
#[derive(Debug, Clone)]
pub struct NavList {
    links: Vec<NavLink>,
}

impl NavList {
    pub fn new(links: Vec<NavLink>) -> Result<Self, NavError> {
        let mut seen = HashSet::new();
        for link in &links {
            if !seen.insert(link.path.as_str()) {
                return Err(NavError::DuplicatePath(link.path.clone()));
            }
        }

        Ok(Self { links })
    }

    pub fn links(&self) -> &[NavLink] {
        &self.links
    }

    pub fn active(&self, current_path: &str) -> Option<&NavLink> {
        self.links.iter().find(|l| is_active(&l.path, current_path))
    }

    /// Per-link view with the active flag derived for `current_path`.
    pub fn entries(&self, current_path: &str) -> Vec<NavEntry> {
        self.links
            .iter()
            .map(|link| NavEntry {
                name: link.name.clone(),
                path: link.path.clone(),
                glyph: link.icon.map(|i| i.glyph()),
                active: is_active(&link.path, current_path),
            })
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct NavEntry {
    pub name: String,
    pub path: String,
    pub glyph: Option<&'static str>,
    pub active: bool,
}

/// Open/closed state of the small-screen menu. Desktop navigation never
/// consults this.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NavMenu {
    open: bool,
}

impl NavMenu {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git_links() -> NavList {
        NavList::new(vec![
            NavLink::new("Git Workflow", "/git"),
            NavLink::new("Reset Git", "/git/reset"),
            NavLink::new("Github Hosting", "/git/hosting"),
        ])
        .unwrap()
    }

    #[test]
    fn test_no_prefix_bleed() {
        let entries = git_links().entries("/git");
        let active: Vec<&str> = entries.iter().filter(|e| e.active).map(|e| e.name.as_str()).collect();
        assert_eq!(active, vec!["Git Workflow"]);
    }

    #[test]
    fn test_child_path_only_activates_child() {
        let links = git_links();
        assert_eq!(links.active("/git/reset").map(|l| l.name.as_str()), Some("Reset Git"));
    }

    #[test]
    fn test_no_trailing_slash_normalization() {
        assert!(!is_active("/git", "/git/"));
        assert!(git_links().active("/git/").is_none());
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!is_active("/git", "/Git"));
    }

    #[test]
    fn test_at_most_one_active() {
        let links = git_links();
        for current in ["/", "/git", "/git/reset", "/git/hosting", "/prisma", ""] {
            let count = links.entries(current).iter().filter(|e| e.active).count();
            assert!(count <= 1, "{current} had {count} active links");
        }
    }

    #[test]
    fn test_rejects_duplicate_paths() {
        let err = NavList::new(vec![NavLink::new("A", "/a"), NavLink::new("B", "/a")]).unwrap_err();
        assert_eq!(err, NavError::DuplicatePath("/a".to_string()));
    }

    #[test]
    fn test_menu_toggle() {
        let mut menu = NavMenu::default();
        assert!(!menu.is_open());
        menu.toggle();
        assert!(menu.is_open());
        menu.toggle();
        assert!(!menu.is_open());
        menu.open();
        menu.close();
        assert!(!menu.is_open());
    }
}
