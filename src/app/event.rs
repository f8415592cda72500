use crate::api::models::{AuthResponse, Book, BookPage};
use crate::api::ApiError;
use crossterm::event::Event as CrosstermEvent;

/// Tag carried by every list request; only the latest one is applied.
pub type RequestSeq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Create,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Login,
    Register,
}

#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// Response to a `GET /books`
    BooksLoaded {
        seq: RequestSeq,
        result: Result<BookPage, ApiError>,
    },

    /// Response to a create or update
    BookSaved {
        kind: SaveKind,
        result: Result<Option<Book>, ApiError>,
    },

    BookDeleted {
        id: String,
        result: Result<(), ApiError>,
    },

    /// Response to a login or registration
    AuthCompleted {
        kind: AuthKind,
        result: Result<AuthResponse, ApiError>,
    },

    /// Tick for UI refresh
    Tick,
}
