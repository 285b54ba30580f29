//! Core domain + application logic for the group-chat bot.
//!
//! This crate is intentionally transport-agnostic. The chat service lives
//! behind the messaging port (trait) implemented in the adapter crate, and
//! persistence goes through the user directory over `gcb-store`.

pub mod chat;
pub mod config;
pub mod domain;
pub mod errors;
pub mod faq;
pub mod logging;
pub mod messaging;
pub mod users;

pub use errors::{Error, Result};
