//! Local dashboard API.
//!
//! Exposes the diagnosis pipeline, session history, localized strings and
//! the expert form as JSON endpoints under `/api/`. A dashboard front end
//! renders the responses.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ServerError};
pub use types::ApiContext;
