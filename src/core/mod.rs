//! Runtime state and domain rules: session identity, the wire format,
//! sanitization, configuration, and the restricted AI instruction handler.

pub mod ai;
pub mod app;
pub mod config;
pub mod message;
pub mod sanitize;
pub mod session;
