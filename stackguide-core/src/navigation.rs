use crate::nav::{NavLink, NavMenu};
use crate::route::{Resolution, RouteError, RouteMatch, RouteTable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    Idle,
    Matching(String),
    Rendered(RouteMatch),
    Fallback(RouteError),
}

/// Current location plus the shell's menu state. Every URL change runs
/// `Idle -> Matching -> Rendered | Fallback` synchronously.
pub struct Navigator<'t> {
    table: &'t RouteTable,
    location: String,
    state: NavState,
    menu: NavMenu,
}

impl<'t> Navigator<'t> {
    pub fn new(table: &'t RouteTable) -> Self {
        Self {
            table,
            location: String::new(),
            state: NavState::Idle,
            menu: NavMenu::default(),
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn state(&self) -> &NavState {
        &self.state
    }

    pub fn menu(&self) -> &NavMenu {
        &self.menu
    }

    pub fn menu_mut(&mut self) -> &mut NavMenu {
        &mut self.menu
    }

    pub fn navigate(&mut self, url: &str) -> &NavState {
        tracing::trace!(url, "navigating");
        self.location = url.to_string();
        self.state = NavState::Matching(url.to_string());

        self.state = match self.table.resolve(url) {
            Resolution::Matched(m) => NavState::Rendered(m),
            Resolution::Fallback(e) => {
                tracing::debug!(url, "no route matched");
                NavState::Fallback(e)
            }
        };

        // Any navigation dismisses the small-screen menu.
        self.menu.close();
        &self.state
    }

    /// Follow a nav link: updates the location and closes the menu.
    pub fn select(&mut self, link: &NavLink) -> &NavState {
        self.navigate(&link.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::PageKind;

    #[test]
    fn test_starts_idle() {
        let nav = Navigator::new(RouteTable::canonical());
        assert_eq!(nav.state(), &NavState::Idle);
        assert!(!nav.menu().is_open());
    }

    #[test]
    fn test_select_closes_open_menu() {
        let mut nav = Navigator::new(RouteTable::canonical());
        nav.navigate("/");
        nav.menu_mut().toggle();
        assert!(nav.menu().is_open());

        let link = NavLink::new("Reset Git", "/git/reset");
        let state = nav.select(&link).clone();

        assert!(!nav.menu().is_open());
        assert_eq!(nav.location(), "/git/reset");
        match state {
            NavState::Rendered(m) => assert_eq!(m.leaf(), PageKind::GitReset),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_unknown_url_reaches_fallback() {
        let mut nav = Navigator::new(RouteTable::canonical());
        match nav.navigate("/does-not-exist") {
            NavState::Fallback(e) => assert_eq!(e.status, 404),
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_closed_menu_stays_closed() {
        let mut nav = Navigator::new(RouteTable::canonical());
        nav.navigate("/prisma");
        assert!(!nav.menu().is_open());
    }
}
