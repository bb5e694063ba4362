//! TermChat is a full-screen terminal chat client for a single shared
//! public MQTT topic.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns session state, the wire format, sanitization,
//!   configuration, and the restricted AI instruction handler.
//! - [`transport`] wraps the MQTT client and the reconnection supervisor,
//!   delivering everything to the loop as events.
//! - [`commands`] implements slash-command parsing and execution used by
//!   the chat loop.
//! - [`ui`] renders the terminal interface and runs the event loop that
//!   drives input, transport events, and display updates.
//!
//! The runtime entrypoint lives in the binary crate (`src/main.rs`) and
//! routes through [`cli::run`] into [`ui::chat_loop`].

pub mod cli;
pub mod commands;
pub mod core;
pub mod transport;
pub mod ui;
pub mod utils;
