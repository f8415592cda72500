//! Typed access to the catalog backend's REST contract.

pub mod client;
pub mod error;
pub mod manager;
pub mod models;

pub use client::BooksApi;
pub use error::ApiError;
pub use manager::ApiManager;
