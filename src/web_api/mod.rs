//! WebAPI - REST API Endpoints
//!
//! ## Responsibilities
//!
//! - HTTP API routes
//! - Request validation
//! - Response formatting
//!
//! Every handler catches its own failures and answers with a structured
//! `{status:"error", message}` body; nothing propagates unhandled.

mod routes;

pub use routes::create_router;
