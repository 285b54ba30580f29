//! Chat-service adapter (SOFA over WebSocket).
//!
//! This crate implements the `gcb-core` MessagingPort over the chat
//! service's socket and turns inbound frames into core events.

pub mod codec;
pub mod router;

mod client;

pub use client::SofaClient;
