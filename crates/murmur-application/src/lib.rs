//! Application layer for murmur.
//!
//! This crate provides the use case that coordinates the chat store and the
//! remote backend to keep the client-side conversation state in sync.

pub mod chat_usecase;

pub use chat_usecase::{ChatUseCase, derive_title};

#[cfg(test)]
mod chat_usecase_test;
