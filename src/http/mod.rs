//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace, timeout)
//!     → decode JSON body into the operation request
//!     → endpoint (transport logging → adapter → service chain)
//!     → response.rs (endpoint errors → HTTP status)
//!     → encode JSON response
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::HttpError;
pub use server::HttpServer;
