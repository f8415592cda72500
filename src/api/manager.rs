//! Runs backend calls off the UI loop.
//!
//! Each method spawns one task and reports its outcome on the event channel,
//! so the handler sees results as ordinary [`AppEvent`]s.

use crate::api::client::BooksApi;
use crate::api::models::{BookInput, BookQuery, Credentials, Registration};
use crate::app::event::{AppEvent, AuthKind, RequestSeq, SaveKind};
use tokio::sync::mpsc;

pub struct ApiManager {
    api: BooksApi,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl ApiManager {
    pub fn new(api: BooksApi, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self { api, event_tx }
    }

    pub fn fetch_books(&self, seq: RequestSeq, query: BookQuery, token: Option<String>) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tracing::debug!(seq, page = query.page, limit = query.limit, search = %query.search, "fetching books");
        tokio::spawn(async move {
            let result = api.list_books(&query, token.as_deref()).await;
            if let Err(ref e) = result {
                tracing::warn!(seq, error = %e, "book list request failed");
            }
            let _ = tx.send(AppEvent::BooksLoaded { seq, result });
        });
    }

    pub fn create_book(&self, input: BookInput, token: String) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.create_book(&input, &token).await;
            if let Err(ref e) = result {
                tracing::warn!(error = %e, "create book failed");
            }
            let _ = tx.send(AppEvent::BookSaved {
                kind: SaveKind::Create,
                result,
            });
        });
    }

    pub fn update_book(&self, id: String, input: BookInput, token: String) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.update_book(&id, &input, &token).await;
            if let Err(ref e) = result {
                tracing::warn!(%id, error = %e, "update book failed");
            }
            let _ = tx.send(AppEvent::BookSaved {
                kind: SaveKind::Update,
                result,
            });
        });
    }

    pub fn delete_book(&self, id: String, token: String) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.delete_book(&id, &token).await;
            if let Err(ref e) = result {
                tracing::warn!(%id, error = %e, "delete book failed");
            }
            let _ = tx.send(AppEvent::BookDeleted { id, result });
        });
    }

    pub fn login(&self, credentials: Credentials) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.login(&credentials).await;
            let _ = tx.send(AppEvent::AuthCompleted {
                kind: AuthKind::Login,
                result,
            });
        });
    }

    pub fn register(&self, registration: Registration) {
        let api = self.api.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.register(&registration).await;
            let _ = tx.send(AppEvent::AuthCompleted {
                kind: AuthKind::Register,
                result,
            });
        });
    }
}
