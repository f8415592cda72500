use crate::api::models::{BookInput, BookQuery, Credentials, Registration};
use crate::app::event::RequestSeq;

/// Side effects requested by the handler, executed by the main loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The bearer token is attached at execution time from the current session.
    FetchBooks { seq: RequestSeq, query: BookQuery },
    CreateBook { input: BookInput, token: String },
    UpdateBook { id: String, input: BookInput, token: String },
    DeleteBook { id: String, token: String },
    Login { credentials: Credentials },
    Register { registration: Registration },
    Quit,
}
