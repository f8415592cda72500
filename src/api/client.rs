//! HTTP client for the catalog backend.
//!
//! Every method maps a non-success status to [`ApiError::Rejected`], keeping
//! the backend's `message` so callers can surface it verbatim.

use crate::api::error::ApiError;
use crate::api::models::{
    AuthResponse, Book, BookInput, BookPage, BookQuery, Credentials, ErrorBody, Registration,
};
use reqwest::{Client, RequestBuilder, Response, Url};

#[derive(Debug, Clone)]
pub struct BooksApi {
    client: Client,
    base_url: Url,
}

impl BooksApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("bookshelf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let base = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            base_url: base,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET /books`. The bearer header is sent only when a token is given.
    pub async fn list_books(&self, query: &BookQuery, token: Option<&str>) -> Result<BookPage, ApiError> {
        let req = self.client.get(self.url(&["books"])).query(query);
        let resp = check(with_token(req, token).send().await?).await?;
        Ok(resp.json::<BookPage>().await?)
    }

    pub async fn create_book(&self, input: &BookInput, token: &str) -> Result<Option<Book>, ApiError> {
        let req = self.client.post(self.url(&["books"])).json(input).bearer_auth(token);
        let resp = check(req.send().await?).await?;
        Ok(lenient_book(resp).await)
    }

    pub async fn update_book(&self, id: &str, input: &BookInput, token: &str) -> Result<Option<Book>, ApiError> {
        let req = self
            .client
            .put(self.url(&["books", id]))
            .json(input)
            .bearer_auth(token);
        let resp = check(req.send().await?).await?;
        Ok(lenient_book(resp).await)
    }

    pub async fn delete_book(&self, id: &str, token: &str) -> Result<(), ApiError> {
        let req = self
            .client
            .delete(self.url(&["books", id]))
            .bearer_auth(token);
        check(req.send().await?).await?;
        Ok(())
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let req = self.client.post(self.url(&["auth", "login"])).json(credentials);
        let resp = check(req.send().await?).await?;
        Ok(resp.json::<AuthResponse>().await?)
    }

    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        let req = self.client.post(self.url(&["auth", "register"])).json(registration);
        let resp = check(req.send().await?).await?;
        Ok(resp.json::<AuthResponse>().await?)
    }
}

fn with_token(req: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(t) => req.bearer_auth(t),
        None => req,
    }
}

async fn check(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    // A body that is not the documented error shape still counts as a rejection.
    let body = resp.json::<ErrorBody>().await.unwrap_or_default();
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message: body.message,
    })
}

/// Mutation responses are informational for this client; an unexpected body
/// shape does not turn a successful save into a failure.
async fn lenient_book(resp: Response) -> Option<Book> {
    let bytes = resp.bytes().await.ok()?;
    serde_json::from_slice(&bytes).ok()
}
