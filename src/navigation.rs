/// Top-level screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Admin,
    Worker,
    Dashboard,
}

impl Default for View {
    fn default() -> Self {
        View::Home
    }
}

impl View {
    pub fn as_str(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::Admin => "admin",
            View::Worker => "worker",
            View::Dashboard => "dashboard",
        }
    }

    pub fn parse(value: &str) -> Option<View> {
        match value {
            "home" => Some(View::Home),
            "admin" => Some(View::Admin),
            "worker" => Some(View::Worker),
            "dashboard" => Some(View::Dashboard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Open(View),
    Back,
}

/// Every view is reachable from every other; `Back` always returns home.
pub fn transition(_current: View, action: NavAction) -> View {
    match action {
        NavAction::Open(view) => view,
        NavAction::Back => View::Home,
    }
}
