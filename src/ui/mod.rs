//! Terminal interface: the event loop, frame renderer, and themes.

pub mod chat_loop;
pub mod renderer;
pub mod theme;
