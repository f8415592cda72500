use crate::api::models::AuthResponse;
use crate::api::ApiError;
use crate::app::action::Action;
use crate::app::catalog::{BookDialog, DeleteConfirm};
use crate::app::event::{AppEvent, AuthKind};
use crate::app::form::TextField;
use crate::app::notification::Notification;
use crate::app::route::Route;
use crate::app::state::*;
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Instant;

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    let actions = match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::BooksLoaded { seq, result } => {
            if !state.catalog.is_current(seq) {
                tracing::debug!(seq, "ignoring superseded book list response");
                return vec![];
            }
            state.dirty = true;
            if session_rejected(state, &result) {
                state.expire_session()
            } else {
                state.catalog.apply_page(seq, result)
            }
        }
        AppEvent::BookSaved { kind, result } => {
            if session_rejected(state, &result) {
                state.dirty = true;
                state.expire_session()
            } else if !state.catalog.is_saving() {
                tracing::debug!(?kind, "ignoring save response with no pending dialog");
                return vec![];
            } else {
                state.dirty = true;
                state.catalog.apply_save(kind, result)
            }
        }
        AppEvent::BookDeleted { id, result } => {
            if session_rejected(state, &result) {
                state.dirty = true;
                state.expire_session()
            } else if !state.catalog.is_deleting() {
                tracing::debug!(%id, "ignoring delete response with no pending confirmation");
                return vec![];
            } else {
                state.dirty = true;
                state.catalog.apply_delete(result)
            }
        }
        AppEvent::AuthCompleted { kind, result } => handle_auth_result(state, kind, result),
        AppEvent::Tick => {
            state.expire_notification(Instant::now());
            vec![]
        }
    };

    state.collect_notices();
    actions
}

/// A 401 on a call made with our token ends the session.
fn session_rejected<T>(state: &AppState, result: &Result<T, ApiError>) -> bool {
    state.session.is_authenticated() && matches!(result, Err(e) if e.is_unauthorized())
}

fn handle_auth_result(state: &mut AppState, kind: AuthKind, result: Result<AuthResponse, ApiError>) -> Vec<Action> {
    let form = match kind {
        AuthKind::Login => &mut state.login,
        AuthKind::Register => &mut state.register,
    };
    if !form.loading {
        return vec![];
    }
    form.loading = false;
    state.dirty = true;

    match result {
        Ok(auth) => {
            form.reset();
            state.session.establish(auth);
            state.notify(Notification::success(match kind {
                AuthKind::Login => "Login successful!",
                AuthKind::Register => "Registration successful!",
            }));
            state.navigate(Route::Books)
        }
        Err(e) => {
            let message = e.user_message(match kind {
                AuthKind::Login => "Login failed",
                AuthKind::Register => "Registration failed",
            });
            tracing::info!(?kind, error = %e, "authentication failed");
            form.error = Some(message.clone());
            state.notify(Notification::error(message));
            vec![]
        }
    }
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) if key.kind != KeyEventKind::Release => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    // Global keybindings
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit];
    }

    match state.route {
        Route::Login | Route::Register => handle_auth_key(state, key),
        Route::Books => handle_books_key(state, key),
    }
}

fn handle_auth_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let route = state.route;

    // F2 switches between the sign-in and sign-up screens
    if key.code == KeyCode::F(2) {
        let other = if route == Route::Login {
            Route::Register
        } else {
            Route::Login
        };
        return state.navigate(other);
    }
    if key.code == KeyCode::Esc {
        return vec![Action::Quit];
    }

    let Some(auth) = state.auth_form_mut(route) else {
        return vec![];
    };
    match key.code {
        KeyCode::Enter => {
            if auth.loading {
                return vec![];
            }
            auth.loading = true;
            auth.error = None;
            match auth.kind {
                AuthKind::Login => vec![Action::Login {
                    credentials: auth.credentials(),
                }],
                AuthKind::Register => vec![Action::Register {
                    registration: auth.registration(),
                }],
            }
        }
        KeyCode::F(3) => {
            auth.form.toggle_secrets();
            vec![]
        }
        KeyCode::Tab | KeyCode::Down => {
            auth.form.focus_next();
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            auth.form.focus_prev();
            vec![]
        }
        _ => {
            if !auth.loading {
                if let Some(field) = auth.form.focused_mut() {
                    edit_field(field, key);
                }
            }
            vec![]
        }
    }
}

/// Shared line-editing keys. Returns whether the text changed.
fn edit_field(field: &mut TextField, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let changed = !field.text.is_empty();
            field.clear();
            changed
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            field.insert_char(c);
            true
        }
        KeyCode::Backspace => {
            let before = field.text.len();
            field.delete_back();
            field.text.len() != before
        }
        KeyCode::Delete => {
            let before = field.text.len();
            field.delete_forward();
            field.text.len() != before
        }
        KeyCode::Left => {
            field.move_left();
            false
        }
        KeyCode::Right => {
            field.move_right();
            false
        }
        KeyCode::Home => {
            field.move_home();
            false
        }
        KeyCode::End => {
            field.move_end();
            false
        }
        _ => false,
    }
}

fn handle_books_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    // Delete confirmation captures all input when visible
    if !matches!(state.catalog.delete, DeleteConfirm::Hidden) {
        return handle_confirm_key(state, key);
    }

    // The add/edit dialog captures all input when open
    if matches!(state.catalog.dialog, BookDialog::Open { .. }) {
        return handle_dialog_key(state, key);
    }

    if state.books_focus == BooksFocus::Search {
        return handle_search_key(state, key);
    }

    match key.code {
        KeyCode::Char('q') => return vec![Action::Quit],
        KeyCode::Char('/') => {
            state.books_focus = BooksFocus::Search;
            return vec![];
        }
        KeyCode::Char('L') => return state.logout(),
        _ => {}
    }

    let catalog = &mut state.catalog;
    match key.code {
        KeyCode::Char('s') => {
            let next = catalog.query.sort_field.next();
            catalog.set_sort_field(next)
        }
        KeyCode::Char('o') => {
            let next = catalog.query.sort_order.toggled();
            catalog.set_sort_order(next)
        }
        KeyCode::Left | KeyCode::PageUp => catalog.prev_page(),
        KeyCode::Right | KeyCode::PageDown => catalog.next_page(),
        KeyCode::Char('+') | KeyCode::Char('=') => catalog.step_page_size(true),
        KeyCode::Char('-') => catalog.step_page_size(false),
        KeyCode::Up => {
            catalog.select_prev();
            vec![]
        }
        KeyCode::Down => {
            catalog.select_next();
            vec![]
        }
        KeyCode::Char('a') => {
            catalog.open_create_dialog();
            vec![]
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(book) = catalog.selected_book().cloned() {
                catalog.open_edit_dialog(book);
            }
            vec![]
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(book) = catalog.selected_book().cloned() {
                catalog.request_delete(book);
            }
            vec![]
        }
        KeyCode::Char('r') => catalog.refetch(),
        _ => vec![],
    }
}

fn handle_search_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Tab => {
            state.books_focus = BooksFocus::Table;
            vec![]
        }
        _ => {
            if edit_field(&mut state.search_input, key) {
                let text = state.search_input.text.clone();
                state.catalog.set_search_text(&text)
            } else {
                vec![]
            }
        }
    }
}

fn handle_dialog_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    let saving = state.catalog.is_saving();
    match key.code {
        KeyCode::Esc => {
            state.catalog.close_dialog();
            vec![]
        }
        KeyCode::Enter => state.catalog.save(state.session.session()),
        KeyCode::Tab | KeyCode::Down => {
            if let BookDialog::Open { form, .. } = &mut state.catalog.dialog {
                form.form.focus_next();
            }
            vec![]
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let BookDialog::Open { form, .. } = &mut state.catalog.dialog {
                form.form.focus_prev();
            }
            vec![]
        }
        _ => {
            if !saving {
                if let BookDialog::Open { form, .. } = &mut state.catalog.dialog {
                    if let Some(field) = form.form.focused_mut() {
                        edit_field(field, key);
                    }
                }
            }
            vec![]
        }
    }
}

fn handle_confirm_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            state.catalog.confirm_delete(state.session.session())
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.catalog.cancel_delete();
            vec![]
        }
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{Book, BookPage, UserProfile};
    use crate::app::event::SaveKind;
    use crate::app::notification::Severity;
    use crate::config::AppConfig;
    use crate::session::{MemoryStorage, SessionStore};

    fn auth() -> AuthResponse {
        AuthResponse {
            token: "tok".into(),
            user: UserProfile {
                name: "Ada".into(),
                email: "ada@example.com".into(),
            },
        }
    }

    fn state(signed_in: bool) -> AppState {
        let mut session = SessionStore::restore(Box::new(MemoryStorage::default()));
        if signed_in {
            session.establish(auth());
        }
        AppState::new(AppConfig::default(), session)
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Terminal(CEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn type_text(state: &mut AppState, text: &str) -> Vec<Action> {
        let mut all = Vec::new();
        for c in text.chars() {
            all.extend(handle_event(state, key(KeyCode::Char(c))));
        }
        all
    }

    fn book(id: &str) -> Book {
        Book {
            id: id.into(),
            title: format!("Book {}", id),
            author: "Author".into(),
            publication_year: Some(2000),
        }
    }

    fn fetch_seq(actions: &[Action]) -> u64 {
        match actions {
            [Action::FetchBooks { seq, .. }] => *seq,
            other => panic!("expected one fetch, got {:?}", other),
        }
    }

    /// Signed-in state showing `books` out of `total`.
    fn loaded(books: Vec<Book>, total: u64) -> AppState {
        let mut s = state(true);
        let seq = fetch_seq(&s.startup());
        handle_event(&mut s, AppEvent::BooksLoaded {
            seq,
            result: Ok(BookPage { books, total }),
        });
        s
    }

    #[test]
    fn one_request_per_search_keystroke() {
        let mut s = loaded(vec![book("1")], 1);
        assert!(handle_event(&mut s, key(KeyCode::Char('/'))).is_empty());
        let actions = type_text(&mut s, "du");
        assert_eq!(actions.len(), 2);
        match &actions[1] {
            Action::FetchBooks { query, .. } => {
                assert_eq!(query.search, "du");
                assert_eq!(query.page, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
        // cursor movement changes nothing
        assert!(handle_event(&mut s, key(KeyCode::Left)).is_empty());
        handle_event(&mut s, key(KeyCode::Esc));
        assert_eq!(s.books_focus, BooksFocus::Table);
    }

    #[test]
    fn sort_keys_keep_page() {
        let mut s = loaded((1..=5).map(|i| book(&i.to_string())).collect(), 12);
        let next = handle_event(&mut s, key(KeyCode::Right));
        assert_eq!(s.catalog.query.page_index, 1);
        let actions = handle_event(&mut s, key(KeyCode::Char('s')));
        assert!(fetch_seq(&actions) > fetch_seq(&next));
        assert_eq!(s.catalog.query.page_index, 1);
        handle_event(&mut s, key(KeyCode::Char('o')));
        assert_eq!(s.catalog.query.page_index, 1);
    }

    #[test]
    fn invalid_login_shows_backend_message_and_stays_out() {
        let mut s = state(false);
        type_text(&mut s, "ada@example.com");
        handle_event(&mut s, key(KeyCode::Tab));
        type_text(&mut s, "wrong");
        let actions = handle_event(&mut s, key(KeyCode::Enter));
        match &actions[..] {
            [Action::Login { credentials }] => {
                assert_eq!(credentials.email, "ada@example.com");
                assert_eq!(credentials.password, "wrong");
            }
            other => panic!("unexpected {:?}", other),
        }
        // a second Enter while loading does not resubmit
        assert!(handle_event(&mut s, key(KeyCode::Enter)).is_empty());

        let follow_up = handle_event(&mut s, AppEvent::AuthCompleted {
            kind: AuthKind::Login,
            result: Err(ApiError::Rejected {
                status: 401,
                message: Some("Invalid credentials".into()),
            }),
        });
        assert!(follow_up.is_empty());
        let toast = s.notification.as_ref().unwrap();
        assert_eq!(toast.message, "Invalid credentials");
        assert_eq!(toast.severity, Severity::Error);
        assert!(s.session.session().is_none());
        assert_eq!(s.route, Route::Login);
        assert_eq!(s.login.error.as_deref(), Some("Invalid credentials"));
        assert!(s.navigate(Route::Books).is_empty());
        assert_eq!(s.route, Route::Login);
    }

    #[test]
    fn successful_registration_enters_books() {
        let mut s = state(false);
        handle_event(&mut s, key(KeyCode::F(2)));
        assert_eq!(s.route, Route::Register);
        handle_event(&mut s, key(KeyCode::Enter));
        let actions = handle_event(&mut s, AppEvent::AuthCompleted {
            kind: AuthKind::Register,
            result: Ok(auth()),
        });
        assert_eq!(s.route, Route::Books);
        assert!(matches!(&actions[..], [Action::FetchBooks { .. }]));
        assert_eq!(s.session.token(), Some("tok"));
        assert_eq!(s.notification.as_ref().unwrap().message, "Registration successful!");
    }

    #[test]
    fn stale_list_response_is_ignored() {
        let mut s = loaded(vec![book("1")], 1);
        let old = fetch_seq(&handle_event(&mut s, key(KeyCode::Char('r'))));
        let new = fetch_seq(&handle_event(&mut s, key(KeyCode::Char('o'))));
        handle_event(&mut s, AppEvent::BooksLoaded {
            seq: new,
            result: Ok(BookPage { books: vec![book("2")], total: 1 }),
        });
        handle_event(&mut s, AppEvent::BooksLoaded {
            seq: old,
            result: Ok(BookPage { books: vec![book("1")], total: 1 }),
        });
        assert_eq!(s.catalog.items, vec![book("2")]);
    }

    #[test]
    fn edit_failure_keeps_dialog_open_with_message() {
        let mut s = loaded(vec![book("1")], 1);
        handle_event(&mut s, key(KeyCode::Char('e')));
        handle_event(&mut s, key(KeyCode::Tab));
        type_text(&mut s, "!");
        let actions = handle_event(&mut s, key(KeyCode::Enter));
        assert!(matches!(&actions[..], [Action::UpdateBook { id, .. }] if id == "1"));

        handle_event(&mut s, AppEvent::BookSaved {
            kind: SaveKind::Update,
            result: Err(ApiError::Rejected {
                status: 400,
                message: Some("Author is too exciting".into()),
            }),
        });
        assert_eq!(s.notification.as_ref().unwrap().message, "Author is too exciting");
        match &s.catalog.dialog {
            BookDialog::Open { form, submitting, .. } => {
                assert!(!submitting);
                assert_eq!(form.form.value(1), "Author!");
            }
            BookDialog::Closed => panic!("dialog should stay open"),
        }
    }

    #[test]
    fn delete_last_row_on_second_page_goes_back() {
        let mut s = loaded((1..=5).map(|i| book(&i.to_string())).collect(), 6);
        let seq = fetch_seq(&handle_event(&mut s, key(KeyCode::PageDown)));
        handle_event(&mut s, AppEvent::BooksLoaded {
            seq,
            result: Ok(BookPage { books: vec![book("6")], total: 6 }),
        });
        assert_eq!(s.catalog.items.len(), 1);

        handle_event(&mut s, key(KeyCode::Char('d')));
        let actions = handle_event(&mut s, key(KeyCode::Char('y')));
        assert!(matches!(&actions[..], [Action::DeleteBook { id, .. }] if id == "6"));

        let follow_up = handle_event(&mut s, AppEvent::BookDeleted {
            id: "6".into(),
            result: Ok(()),
        });
        match &follow_up[..] {
            [Action::FetchBooks { query, .. }] => assert_eq!((query.page, query.limit), (1, 5)),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(s.catalog.query.page_index, 0);
        assert_eq!(s.notification.as_ref().unwrap().message, "Book deleted!");
    }

    #[test]
    fn unauthorized_response_forces_logout() {
        let mut s = loaded(vec![book("1")], 1);
        handle_event(&mut s, key(KeyCode::Char('a')));
        handle_event(&mut s, key(KeyCode::Enter));
        let actions = handle_event(&mut s, AppEvent::BookSaved {
            kind: SaveKind::Create,
            result: Err(ApiError::Rejected {
                status: 401,
                message: Some("Token expired".into()),
            }),
        });
        assert!(actions.is_empty());
        assert_eq!(s.route, Route::Login);
        assert!(!s.session.is_authenticated());
        assert_eq!(
            s.notification.as_ref().unwrap().message,
            "Session expired, please log in again"
        );
    }

    #[test]
    fn unauthorized_save_after_dialog_closed_still_logs_out() {
        let mut s = loaded(vec![book("1")], 1);
        assert!(!s.catalog.is_saving());
        handle_event(&mut s, AppEvent::BookSaved {
            kind: SaveKind::Update,
            result: Err(ApiError::Rejected {
                status: 401,
                message: None,
            }),
        });
        assert_eq!(s.route, Route::Login);
        assert!(!s.session.is_authenticated());
    }

    #[test]
    fn cancel_during_save_keeps_each_response_on_its_own_dialog() {
        let mut s = loaded(vec![book("1")], 1);
        handle_event(&mut s, key(KeyCode::Char('a')));
        type_text(&mut s, "X");
        assert!(matches!(&handle_event(&mut s, key(KeyCode::Enter))[..], [Action::CreateBook { .. }]));

        // Esc, reopen and a second submit are all ignored while saving
        handle_event(&mut s, key(KeyCode::Esc));
        assert!(s.catalog.is_saving());
        type_text(&mut s, "aY");
        assert!(handle_event(&mut s, key(KeyCode::Enter)).is_empty());

        let follow_up = handle_event(&mut s, AppEvent::BookSaved {
            kind: SaveKind::Create,
            result: Ok(None),
        });
        assert_eq!(follow_up.len(), 1);
        assert!(matches!(s.catalog.dialog, BookDialog::Closed));
        assert_eq!(s.notification.as_ref().unwrap().message, "Book added!");

        handle_event(&mut s, key(KeyCode::Char('a')));
        type_text(&mut s, "Y");
        handle_event(&mut s, key(KeyCode::Enter));
        handle_event(&mut s, AppEvent::BookSaved {
            kind: SaveKind::Create,
            result: Err(ApiError::Rejected {
                status: 400,
                message: Some("Title taken".into()),
            }),
        });
        assert_eq!(s.notification.as_ref().unwrap().message, "Title taken");
        match &s.catalog.dialog {
            BookDialog::Open { form, submitting, .. } => {
                assert!(!submitting);
                assert_eq!(form.form.value(0), "Y");
            }
            BookDialog::Closed => panic!("failed save must keep the dialog"),
        }
    }

    #[test]
    fn f3_reveals_password_on_auth_screens() {
        let mut s = state(false);
        handle_event(&mut s, key(KeyCode::Tab));
        type_text(&mut s, "pw");
        assert_eq!(s.login.form.fields[1].input.display(), "••");
        handle_event(&mut s, key(KeyCode::F(3)));
        assert_eq!(s.login.form.fields[1].input.display(), "pw");
    }

    #[test]
    fn logout_key_drops_inflight_list() {
        let mut s = loaded(vec![book("1")], 1);
        let seq = fetch_seq(&handle_event(&mut s, key(KeyCode::Char('r'))));
        handle_event(&mut s, key(KeyCode::Char('L')));
        assert_eq!(s.route, Route::Login);
        handle_event(&mut s, AppEvent::BooksLoaded {
            seq,
            result: Ok(BookPage { books: vec![book("9")], total: 1 }),
        });
        assert!(s.catalog.items.is_empty());
    }

    #[test]
    fn ctrl_c_quits_everywhere() {
        let mut s = state(false);
        let event = AppEvent::Terminal(CEvent::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert_eq!(handle_event(&mut s, event), vec![Action::Quit]);
    }
}
