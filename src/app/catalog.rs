//! Page-state controller for the book list.
//!
//! Owns the query parameters (page, page size, search, sort), the page of
//! books they produced, and the add/edit and delete dialogs. Every operation
//! mutates state first and then returns the actions it triggers, so one user
//! action yields at most one list request carrying the final combined state.
//!
//! List requests are tagged with a sequence number. Only the response to the
//! most recently issued request is applied; anything older is dropped.

use crate::api::models::{Book, BookPage, BookQuery, SortField, SortOrder};
use crate::api::ApiError;
use crate::app::action::Action;
use crate::app::event::{RequestSeq, SaveKind};
use crate::app::form::BookForm;
use crate::app::notification::Notification;
use crate::session::Session;
use chrono::{DateTime, Local};

const FETCH_FAILED: &str = "Error fetching books";
const SAVE_FAILED: &str = "Error saving book";
const DELETE_FAILED: &str = "Error deleting book";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    /// 0-based; the wire format is 1-based.
    pub page_index: u32,
    pub page_size: u32,
    pub search: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
}

impl QueryState {
    pub fn to_query(&self) -> BookQuery {
        BookQuery {
            page: self.page_index + 1,
            limit: self.page_size,
            sort_by: self.sort_field,
            order: self.sort_order,
            search: self.search.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit(Book),
}

#[derive(Debug, Clone)]
pub enum BookDialog {
    Closed,
    Open {
        mode: DialogMode,
        form: BookForm,
        /// A save is outstanding; further submits are ignored.
        submitting: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteConfirm {
    Hidden,
    Confirming { target: Book },
    Deleting { target: Book, rows_on_page: usize },
}

pub struct CatalogController {
    pub query: QueryState,
    pub items: Vec<Book>,
    pub total: u64,
    pub selected: usize,
    pub dialog: BookDialog,
    pub delete: DeleteConfirm,
    pub loading: bool,
    pub last_synced: Option<DateTime<Local>>,
    page_size_options: Vec<u32>,
    latest_seq: RequestSeq,
    notices: Vec<Notification>,
}

impl CatalogController {
    pub fn new(page_size: u32, page_size_options: Vec<u32>) -> Self {
        let mut options: Vec<u32> = page_size_options.into_iter().filter(|n| *n > 0).collect();
        let page_size = page_size.max(1);
        if !options.contains(&page_size) {
            options.push(page_size);
        }
        options.sort_unstable();
        options.dedup();
        Self {
            query: QueryState {
                page_index: 0,
                page_size,
                search: String::new(),
                sort_field: SortField::Title,
                sort_order: SortOrder::Ascending,
            },
            items: Vec::new(),
            total: 0,
            selected: 0,
            dialog: BookDialog::Closed,
            delete: DeleteConfirm::Hidden,
            loading: false,
            last_synced: None,
            page_size_options: options,
            latest_seq: 0,
            notices: Vec::new(),
        }
    }

    /// Notifications raised since the last call.
    pub fn take_notices(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notices)
    }

    pub fn page_count(&self) -> u32 {
        let size = u64::from(self.query.page_size.max(1));
        self.total.div_ceil(size) as u32
    }

    pub fn selected_book(&self) -> Option<&Book> {
        self.items.get(self.selected)
    }

    // --- query changes ---

    /// A new filter invalidates the current page position.
    pub fn set_search_text(&mut self, text: &str) -> Vec<Action> {
        if self.query.search == text && self.query.page_index == 0 {
            return vec![];
        }
        self.query.search = text.to_string();
        self.query.page_index = 0;
        self.refetch()
    }

    /// Sorting keeps the current page position.
    pub fn set_sort_field(&mut self, field: SortField) -> Vec<Action> {
        if self.query.sort_field == field {
            return vec![];
        }
        self.query.sort_field = field;
        self.refetch()
    }

    pub fn set_sort_order(&mut self, order: SortOrder) -> Vec<Action> {
        if self.query.sort_order == order {
            return vec![];
        }
        self.query.sort_order = order;
        self.refetch()
    }

    pub fn set_page_index(&mut self, index: u32) -> Vec<Action> {
        if self.query.page_index == index {
            return vec![];
        }
        self.query.page_index = index;
        self.refetch()
    }

    /// Changing the page size always returns to the first page.
    pub fn set_page_size(&mut self, size: u32) -> Vec<Action> {
        let size = size.max(1);
        if self.query.page_size == size && self.query.page_index == 0 {
            return vec![];
        }
        self.query.page_size = size;
        self.query.page_index = 0;
        self.refetch()
    }

    pub fn next_page(&mut self) -> Vec<Action> {
        if self.query.page_index + 1 < self.page_count() {
            self.set_page_index(self.query.page_index + 1)
        } else {
            vec![]
        }
    }

    pub fn prev_page(&mut self) -> Vec<Action> {
        match self.query.page_index.checked_sub(1) {
            Some(prev) => self.set_page_index(prev),
            None => vec![],
        }
    }

    /// Step to the next larger (`grow`) or smaller page size option.
    pub fn step_page_size(&mut self, grow: bool) -> Vec<Action> {
        let current = self.query.page_size;
        let next = if grow {
            self.page_size_options.iter().copied().find(|n| *n > current)
        } else {
            self.page_size_options.iter().rev().copied().find(|n| *n < current)
        };
        match next {
            Some(size) => self.set_page_size(size),
            None => vec![],
        }
    }

    pub fn refetch(&mut self) -> Vec<Action> {
        self.latest_seq += 1;
        self.loading = true;
        vec![Action::FetchBooks {
            seq: self.latest_seq,
            query: self.query.to_query(),
        }]
    }

    pub fn is_current(&self, seq: RequestSeq) -> bool {
        seq == self.latest_seq
    }

    /// Apply a list response. Stale responses are ignored. On failure the
    /// previous page stays on screen.
    pub fn apply_page(&mut self, seq: RequestSeq, result: Result<BookPage, ApiError>) -> Vec<Action> {
        if !self.is_current(seq) {
            tracing::debug!(seq, latest = self.latest_seq, "dropping stale book list response");
            return vec![];
        }
        self.loading = false;
        match result {
            Ok(page) => {
                self.items = page.books;
                self.total = page.total;
                self.selected = self.selected.min(self.items.len().saturating_sub(1));
                self.last_synced = Some(Local::now());

                // The page fell off the end of the result set: clamp to the last page.
                if self.items.is_empty() && self.total > 0 && self.query.page_index > 0 {
                    let last = self.page_count().saturating_sub(1);
                    if last < self.query.page_index {
                        return self.set_page_index(last);
                    }
                }
                vec![]
            }
            Err(_) => {
                self.notices.push(Notification::error(FETCH_FAILED));
                vec![]
            }
        }
    }

    /// Forget outstanding list requests, e.g. when leaving the list view.
    pub fn invalidate_inflight(&mut self) {
        self.latest_seq += 1;
        self.loading = false;
    }

    /// Drop everything tied to the signed-in user. In-flight responses become stale.
    pub fn reset(&mut self) {
        self.invalidate_inflight();
        self.items.clear();
        self.total = 0;
        self.selected = 0;
        self.query.page_index = 0;
        self.dialog = BookDialog::Closed;
        self.delete = DeleteConfirm::Hidden;
        self.last_synced = None;
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    // --- add / edit dialog ---

    pub fn open_create_dialog(&mut self) {
        self.dialog = BookDialog::Open {
            mode: DialogMode::Create,
            form: BookForm::empty(),
            submitting: false,
        };
    }

    pub fn open_edit_dialog(&mut self, book: Book) {
        self.dialog = BookDialog::Open {
            form: BookForm::from_book(&book),
            mode: DialogMode::Edit(book),
            submitting: false,
        };
    }

    /// Cancel the dialog. Ignored while a save is outstanding so its
    /// response always lands on the dialog that sent it.
    pub fn close_dialog(&mut self) {
        if self.is_saving() {
            return;
        }
        self.dialog = BookDialog::Closed;
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.dialog, BookDialog::Open { submitting: true, .. })
    }

    /// Submit the open dialog. Without a session nothing is sent.
    pub fn save(&mut self, session: Option<&Session>) -> Vec<Action> {
        let BookDialog::Open {
            mode,
            form,
            submitting,
        } = &mut self.dialog
        else {
            return vec![];
        };
        if *submitting {
            return vec![];
        }
        let Some(session) = session else {
            self.notices
                .push(Notification::error(ApiError::Unauthenticated.user_message(SAVE_FAILED)));
            return vec![];
        };
        *submitting = true;
        let input = form.input();
        let token = session.token.clone();
        match mode {
            DialogMode::Edit(book) => vec![Action::UpdateBook {
                id: book.id.clone(),
                input,
                token,
            }],
            DialogMode::Create => vec![Action::CreateBook { input, token }],
        }
    }

    /// Outcome of a save. Success closes the dialog and reloads; failure keeps
    /// the dialog and its values so the user can correct them.
    pub fn apply_save(&mut self, kind: SaveKind, result: Result<Option<Book>, ApiError>) -> Vec<Action> {
        let BookDialog::Open { submitting, .. } = &mut self.dialog else {
            tracing::debug!(?kind, "dropping save response for a closed dialog");
            return vec![];
        };
        if !*submitting {
            return vec![];
        }
        match result {
            Ok(_) => {
                self.dialog = BookDialog::Closed;
                self.notices.push(Notification::success(match kind {
                    SaveKind::Create => "Book added!",
                    SaveKind::Update => "Book updated!",
                }));
                self.refetch()
            }
            Err(e) => {
                *submitting = false;
                self.notices.push(Notification::error(e.user_message(SAVE_FAILED)));
                vec![]
            }
        }
    }

    // --- delete confirmation ---

    pub fn request_delete(&mut self, book: Book) {
        self.delete = DeleteConfirm::Confirming { target: book };
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.delete, DeleteConfirm::Confirming { .. }) {
            self.delete = DeleteConfirm::Hidden;
        }
    }

    pub fn is_deleting(&self) -> bool {
        matches!(self.delete, DeleteConfirm::Deleting { .. })
    }

    pub fn confirm_delete(&mut self, session: Option<&Session>) -> Vec<Action> {
        let DeleteConfirm::Confirming { target } = &self.delete else {
            return vec![];
        };
        let Some(session) = session else {
            self.delete = DeleteConfirm::Hidden;
            self.notices
                .push(Notification::error(ApiError::Unauthenticated.user_message(DELETE_FAILED)));
            return vec![];
        };
        let target = target.clone();
        let action = Action::DeleteBook {
            id: target.id.clone(),
            token: session.token.clone(),
        };
        self.delete = DeleteConfirm::Deleting {
            target,
            rows_on_page: self.items.len(),
        };
        vec![action]
    }

    /// Outcome of a delete. The confirmation closes either way. Removing the
    /// only row of a later page steps back one page instead of reloading the
    /// now empty one.
    pub fn apply_delete(&mut self, result: Result<(), ApiError>) -> Vec<Action> {
        let DeleteConfirm::Deleting { rows_on_page, .. } = self.delete else {
            tracing::debug!("dropping delete response with no pending confirmation");
            return vec![];
        };
        self.delete = DeleteConfirm::Hidden;
        match result {
            Ok(()) => {
                self.notices.push(Notification::success("Book deleted!"));
                if rows_on_page == 1 && self.query.page_index > 0 {
                    self.set_page_index(self.query.page_index - 1)
                } else {
                    self.refetch()
                }
            }
            Err(e) => {
                self.notices.push(Notification::error(e.user_message(DELETE_FAILED)));
                vec![]
            }
        }
    }
}
