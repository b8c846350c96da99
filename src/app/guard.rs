//! Route guard
//!
//! Protected routes need a session. The decision is deferred while the
//! persisted session is still loading so a restored user is never bounced to
//! the login page.

use crate::app::session::SessionManager;
use crate::constants::routes;

/// What to do with a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not restored yet; render nothing
    Pending,
    Allow,
    RedirectToLogin,
    RedirectToDashboard,
}

impl GuardDecision {
    /// Route to navigate to instead, if any
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            GuardDecision::RedirectToLogin => Some(routes::LOGIN),
            GuardDecision::RedirectToDashboard => Some(routes::DASHBOARD),
            GuardDecision::Pending | GuardDecision::Allow => None,
        }
    }
}

/// Whether `path` is reachable without a session
pub fn is_public(path: &str) -> bool {
    routes::PUBLIC.contains(&path)
}

/// Layout title for a route; the login page has no layout
pub fn section_title(path: &str) -> Option<&'static str> {
    if path == routes::LOGIN {
        None
    } else if path.starts_with(routes::USERS) {
        Some("Users")
    } else if path.starts_with(routes::PRODUCTS) {
        Some("Products")
    } else {
        Some("Dashboard")
    }
}

/// Evaluates navigations against the current session
#[derive(Debug, Clone, Copy)]
pub struct AuthGuard<'a> {
    sessions: &'a SessionManager,
}

impl<'a> AuthGuard<'a> {
    pub fn new(sessions: &'a SessionManager) -> Self {
        Self { sessions }
    }

    /// Decide now, without waiting for hydration
    pub fn evaluate(&self, path: &str) -> GuardDecision {
        if !self.sessions.gate().is_hydrated() {
            return GuardDecision::Pending;
        }

        let signed_in = self.sessions.is_authenticated();
        if path == routes::LOGIN && signed_in {
            GuardDecision::RedirectToDashboard
        } else if !is_public(path) && !signed_in {
            GuardDecision::RedirectToLogin
        } else {
            GuardDecision::Allow
        }
    }

    /// Wait for hydration, then decide
    pub async fn resolve(&self, path: &str) -> GuardDecision {
        self.sessions.gate().wait().await;
        self.evaluate(path)
    }
}
