//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware: request ID, trace, timeout, body limit)
//!     → handlers.rs (multipart intake / JSON decode)
//!         → upload.rs (per-request spool file)
//!         → planning stages
//!     → response.rs (errors → status + JSON body)
//!     → Send to client
//! ```

pub mod handlers;
pub mod response;
pub mod server;
pub mod upload;

pub use response::ApiError;
pub use server::{build_router, AppState, HttpServer};
