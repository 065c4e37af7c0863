//! Middleware for the hub's HTTP surface.

pub mod security;

pub use security::security_headers;
