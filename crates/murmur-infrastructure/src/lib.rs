//! Infrastructure layer for murmur.
//!
//! This crate provides the concrete HTTP implementation of the chat backend
//! trait and its environment-driven configuration.

pub mod config;
pub mod http_backend;

pub use config::BackendConfig;
pub use http_backend::HttpChatBackend;
