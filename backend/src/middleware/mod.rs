//! Actix middleware used by the HTTP server.

pub mod trace;

pub use trace::Trace;
