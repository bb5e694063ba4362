#[cfg(test)]
use crate::core::app::App;
#[cfg(test)]
use crate::core::session::{LinkState, SessionState};
#[cfg(test)]
use crate::ui::theme::Theme;

/// A connected app with a fixed identity, ready for command and router
/// tests that never touch a real broker.
#[cfg(test)]
pub fn create_test_app() -> App {
    let mut session = SessionState::new("Tester");
    session.link = LinkState::Connected;
    App::new(session, Theme::dark())
}
