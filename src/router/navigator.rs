//! Route resolution combined with the access gate

use std::collections::BTreeMap;

use crate::auth::{AuthGate, GateDecision};
use crate::router::table::{DataSource, Layout, RouteMatch, RouteTable};
use crate::session::Session;

/// Redirect chains longer than this are treated as a loop
const MAX_REDIRECTS: usize = 8;

/// A page cleared to render
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub path: String,
    pub title: &'static str,
    pub layout: Layout,
    pub params: BTreeMap<String, String>,
    pub source: DataSource,
    pub session: Session,
}

impl Page {
    /// Backend path to load, with `:name` segments filled from the route
    /// parameters (and `:userId` from the session)
    pub fn endpoint(&self) -> Option<String> {
        let DataSource::Get(template) = self.source else {
            return None;
        };

        let filled = template
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some("userId") if !self.params.contains_key("userId") => {
                    self.session.user_id.clone()
                }
                Some(name) => self.params.get(name).cloned().unwrap_or_default(),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/");
        Some(filled)
    }
}

/// Outcome of one navigation
#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    AuthScreen,
    Render(Page),
    Redirect(String),
}

/// Resolves paths and runs the gate for every protected page.
/// Re-evaluated on each call; nothing carries over between navigations.
#[derive(Clone)]
pub struct Navigator {
    table: RouteTable,
    gate: AuthGate,
}

impl Navigator {
    pub fn new(table: RouteTable, gate: AuthGate) -> Self {
        Self { table, gate }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// One navigation step
    pub fn navigate(&self, path: &str) -> Navigation {
        match self.table.resolve(path) {
            RouteMatch::AuthScreen => Navigation::AuthScreen,
            RouteMatch::Redirect(to) => Navigation::Redirect(to.to_string()),
            RouteMatch::Page {
                group,
                page,
                params,
            } => match self.gate.check(Some(group.required_role)) {
                GateDecision::Granted(session) => Navigation::Render(Page {
                    path: path.to_string(),
                    title: page.title,
                    layout: group.layout,
                    params,
                    source: page.source,
                    session,
                }),
                denied => Navigation::Redirect(
                    denied.redirect().unwrap_or(crate::auth::AUTH_PATH).to_string(),
                ),
            },
        }
    }

    /// Follow redirects until a screen renders
    pub fn settle(&self, path: &str) -> Navigation {
        let mut current = path.to_string();
        for _ in 0..MAX_REDIRECTS {
            match self.navigate(&current) {
                Navigation::Redirect(to) => {
                    tracing::debug!("Redirect {} -> {}", current, to);
                    current = to;
                }
                settled => return settled,
            }
        }
        tracing::warn!("Redirect loop starting at {}", path);
        Navigation::AuthScreen
    }
}
