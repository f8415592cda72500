use crate::app::action::Action;
use crate::app::catalog::CatalogController;
use crate::app::form::{AuthForm, TextField};
use crate::app::notification::Notification;
use crate::app::route::{self, Route};
use crate::config::AppConfig;
use crate::session::SessionStore;
use std::time::{Duration, Instant};

/// Which part of the books screen receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooksFocus {
    Table,
    Search,
}

pub struct AppState {
    pub config: AppConfig,
    pub session: SessionStore,
    pub route: Route,
    pub catalog: CatalogController,
    pub login: AuthForm,
    pub register: AuthForm,
    pub search_input: TextField,
    pub books_focus: BooksFocus,
    pub notification: Option<Notification>,
    pub should_quit: bool,
    pub dirty: bool,
}

impl AppState {
    pub fn new(config: AppConfig, session: SessionStore) -> Self {
        let catalog = CatalogController::new(config.ui.page_size, config.ui.page_size_options.clone());
        let route = route::guard(Route::Books, session.is_authenticated());
        Self {
            config,
            session,
            route,
            catalog,
            login: AuthForm::login(),
            register: AuthForm::register(),
            search_input: TextField::new(),
            books_focus: BooksFocus::Table,
            notification: None,
            should_quit: false,
            dirty: true,
        }
    }

    /// Actions to run once the loop is up: load the list if we start on it.
    pub fn startup(&mut self) -> Vec<Action> {
        if self.route == Route::Books {
            self.catalog.refetch()
        } else {
            vec![]
        }
    }

    /// Switch screens through the route guard. Entering the list loads it;
    /// leaving it drops any list response still in flight.
    pub fn navigate(&mut self, requested: Route) -> Vec<Action> {
        let next = route::guard(requested, self.session.is_authenticated());
        if next != requested {
            tracing::debug!(?requested, resolved = ?next, "route guard redirected");
        }
        let previous = std::mem::replace(&mut self.route, next);
        self.dirty = true;
        match (previous, next) {
            (Route::Books, Route::Books) => vec![],
            (_, Route::Books) => {
                self.books_focus = BooksFocus::Table;
                self.catalog.refetch()
            }
            (Route::Books, _) => {
                self.catalog.invalidate_inflight();
                vec![]
            }
            _ => vec![],
        }
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
        self.dirty = true;
    }

    /// Move controller notifications into the toast slot; the newest wins.
    pub fn collect_notices(&mut self) {
        if let Some(latest) = self.catalog.take_notices().pop() {
            self.notify(latest);
        }
    }

    pub fn logout(&mut self) -> Vec<Action> {
        self.end_session();
        self.notify(Notification::info("Logged out!"));
        self.navigate(Route::Login)
    }

    /// The server refused our token: treat it as a logout.
    pub fn expire_session(&mut self) -> Vec<Action> {
        tracing::warn!("bearer token rejected, ending session");
        self.end_session();
        self.notify(Notification::error("Session expired, please log in again"));
        self.navigate(Route::Login)
    }

    fn end_session(&mut self) {
        self.session.logout();
        self.catalog.reset();
        self.search_input.clear();
        self.login.reset();
        self.register.reset();
    }

    pub fn expire_notification(&mut self, now: Instant) {
        let ttl = Duration::from_millis(self.config.ui.notification_ms);
        if self.notification.as_ref().is_some_and(|n| n.is_expired(now, ttl)) {
            self.notification = None;
            self.dirty = true;
        }
    }

    pub fn auth_form_mut(&mut self, route: Route) -> Option<&mut AuthForm> {
        match route {
            Route::Login => Some(&mut self.login),
            Route::Register => Some(&mut self.register),
            Route::Books => None,
        }
    }

    pub fn status_line(&self) -> String {
        match self.route {
            Route::Books => {
                let mut s = format!("{} books", self.catalog.total);
                if self.catalog.loading {
                    s.push_str(" | loading…");
                } else if let Some(at) = self.catalog.last_synced {
                    s.push_str(&format!(
                        " | synced {}",
                        at.format(&self.config.ui.timestamp_format)
                    ));
                }
                s
            }
            Route::Login => "Sign in to manage your books".to_string(),
            Route::Register => "Create an account".to_string(),
        }
    }
}
