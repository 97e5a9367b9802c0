//! HTTP API for PolyFAQ.
//!
//! Reads go through the [`ContentResolver`](crate::resolver::ContentResolver);
//! writes go through [`FaqService`](crate::faq::FaqService), which invalidates
//! the translation cache before responding.

pub mod error;
pub mod routes;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use server::{build_router, start_server, AppState};
