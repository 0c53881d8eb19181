//! Port REST API client.
//!
//! A thin async client over the catalog API. Every operation performs exactly one
//! HTTP round trip and checks the `ok` flag of the response envelope; there is no
//! retry or caching layer.
//!
//! ## Module Structure
//!
//! - `config` - Connection settings
//! - `client` - `PortClient` and its per-resource operations
//! - `models` - Request and response envelopes
//! - `error` - Transport, application and decoding errors

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::PortClient;
pub use config::ClientConfig;
pub use error::{ApiErrorDetail, ClientError, Result};
pub use models::{SearchRequest, SearchResponse};
