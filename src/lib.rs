//! Bookstore application library
//!
//! Feature modules plus the bootstrap that wires them to the store and the
//! HTTP server.

pub mod app;
pub mod modules;

pub use app::{run, shutdown_signal};
