//! Application state shared by the command handlers, the message router,
//! and the renderer.

use std::collections::VecDeque;

use ratatui::text::{Line, Span};

use crate::core::ai::{self, AiInstruction, PendingInstruction};
use crate::core::message::{local_timestamp, LineKind, TranscriptLine, WireMessage};
use crate::core::sanitize::sanitize;
use crate::core::session::{LinkState, SessionState};
use crate::ui::theme::{named_color, Theme};

/// A composed chat line ready to publish: the serialized wire payload plus
/// the sanitized text to render locally once the publish succeeds.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub payload: String,
    pub display_text: String,
}

pub struct App {
    pub session: SessionState,
    pub transcript: VecDeque<TranscriptLine>,
    pub input: String,
    pub scroll_offset: u16,
    /// Highest valid scroll offset as of the last rendered frame, in wrapped
    /// terminal rows rather than transcript entries.
    pub last_max_scroll: u16,
    pub auto_scroll: bool,
    pub theme: Theme,
    pub pending_ai: Option<PendingInstruction>,
    pub exit_requested: bool,
}

impl App {
    pub fn new(session: SessionState, theme: Theme) -> Self {
        Self {
            session,
            transcript: VecDeque::new(),
            input: String::new(),
            scroll_offset: 0,
            last_max_scroll: 0,
            auto_scroll: true,
            theme,
            pending_ai: None,
            exit_requested: false,
        }
    }

    // --- transcript -----------------------------------------------------

    pub fn add_system_line(&mut self, text: impl Into<String>) {
        self.transcript
            .push_back(TranscriptLine::system(text, local_timestamp()));
    }

    pub fn add_error_line(&mut self, text: impl Into<String>) {
        self.transcript
            .push_back(TranscriptLine::error(text, local_timestamp()));
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
        self.scroll_offset = 0;
        self.auto_scroll = true;
    }

    // --- connection lifecycle -------------------------------------------

    /// First lines of the simulated handshake, shown before the initial
    /// connect attempt is scheduled.
    pub fn begin_handshake(&mut self) {
        self.add_system_line("ESTABLISHING SECURE UPLINK...");
        self.add_system_line("INITIATING HANDSHAKE...");
    }

    pub fn on_connect_started(&mut self) {
        self.session.link = LinkState::Connecting;
    }

    pub fn on_connected(&mut self, topic: &str) {
        self.session.link = LinkState::Connected;
        self.add_system_line("UPLINK ESTABLISHED.");
        self.add_system_line(format!("SUBSCRIBED TO CHANNEL: {topic}"));
        self.add_system_line(format!(
            "WELCOME, {}. TYPE /help FOR COMMANDS.",
            self.session.nickname
        ));
    }

    pub fn on_connect_failed(&mut self, detail: &str) {
        self.session.link = LinkState::Disconnected;
        self.add_error_line(format!("UPLINK FAILED: {detail}"));
    }

    pub fn on_connection_lost(&mut self, detail: &str) {
        self.session.link = LinkState::Disconnected;
        self.add_error_line(format!("CONNECTION LOST: {detail}"));
    }

    // --- message router -------------------------------------------------

    /// Outbound path: turn trimmed user text into a publishable message.
    /// Returns `None` (after emitting the appropriate line) when there is
    /// nothing to send.
    pub fn compose_outbound(&mut self, text: &str) -> Option<OutboundMessage> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        if !self.session.link.is_connected() {
            self.add_system_line("CONNECTION LOST. CANNOT TRANSMIT.");
            return None;
        }

        let display_text = sanitize(trimmed);
        let wire = WireMessage::new(
            self.session.nickname.clone(),
            display_text.clone(),
            local_timestamp(),
        );
        match wire.to_payload() {
            Ok(payload) => Some(OutboundMessage {
                payload,
                display_text,
            }),
            Err(e) => {
                self.add_error_line(format!("TRANSMIT FAILED: {e}"));
                None
            }
        }
    }

    /// Called once the publish succeeded: render the line locally and run
    /// the experience rule. XP is granted on send only, never on receipt.
    pub fn note_sent(&mut self, display_text: &str) {
        self.transcript.push_back(TranscriptLine::own(
            self.session.nickname.clone(),
            display_text,
            local_timestamp(),
        ));
        if let Some(new_level) = self.session.grant_experience() {
            self.add_system_line(format!("LEVEL UP! YOU ARE NOW LEVEL {new_level}."));
        }
    }

    pub fn note_send_failed(&mut self, detail: &str) {
        self.add_error_line(format!("TRANSMIT FAILED: {detail}"));
    }

    /// Inbound path: parse, filter self-echo, render. Malformed payloads
    /// are rendered verbatim as system lines instead of being dropped.
    pub fn handle_incoming(&mut self, payload: &str) {
        match WireMessage::parse(payload) {
            Some(msg) => {
                if msg.nick == self.session.nickname {
                    // Self-echo from the shared topic; already rendered on send.
                    return;
                }
                // Compliant peers escape at compose time; escaping again here
                // would turn their "&lt;" into "&amp;lt;".
                self.transcript.push_back(TranscriptLine::remote(
                    msg.nick,
                    msg.text,
                    local_timestamp(),
                ));
            }
            None => {
                self.add_system_line(sanitize(payload));
            }
        }
    }

    // --- restricted AI handler ------------------------------------------

    /// Validate a `/ai` instruction. A valid one arms (or replaces) the
    /// confirmation prompt; anything else gets the fixed safety message.
    pub fn handle_ai_instruction(&mut self, instruction: &str) {
        match ai::interpret(instruction) {
            Some(parsed) => {
                let pending = PendingInstruction {
                    instruction: parsed,
                };
                self.add_system_line(pending.prompt());
                self.pending_ai = Some(pending);
            }
            None => {
                self.add_system_line(ai::SAFETY_MESSAGE);
            }
        }
    }

    pub fn confirm_pending_ai(&mut self) {
        let Some(pending) = self.pending_ai.take() else {
            return;
        };
        match pending.instruction {
            AiInstruction::ChangeBackground { color } => match named_color(&color) {
                Some(resolved) => {
                    self.theme.background_color = resolved;
                    self.add_system_line(format!("BACKGROUND COLOR CHANGED TO {color}."));
                }
                None => {
                    self.add_error_line(format!("UNKNOWN COLOR: {color}. NOTHING CHANGED."));
                }
            },
        }
    }

    pub fn cancel_pending_ai(&mut self) {
        if self.pending_ai.take().is_some() {
            self.add_system_line("INSTRUCTION CANCELLED.");
        }
    }

    // --- rendering helpers ----------------------------------------------

    pub fn build_display_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.transcript.len());
        for entry in &self.transcript {
            let stamp = Span::styled(
                format!("[{}] ", entry.timestamp),
                self.theme.timestamp_style,
            );
            let line = match entry.kind {
                LineKind::Own => Line::from(vec![
                    stamp,
                    Span::styled(
                        format!("<{}> ", entry.sender.as_deref().unwrap_or("")),
                        self.theme.own_prefix_style,
                    ),
                    Span::styled(entry.text.clone(), self.theme.own_text_style),
                ]),
                LineKind::Remote => Line::from(vec![
                    stamp,
                    Span::styled(
                        format!("<{}> ", entry.sender.as_deref().unwrap_or("")),
                        self.theme.remote_prefix_style,
                    ),
                    Span::styled(entry.text.clone(), self.theme.remote_text_style),
                ]),
                LineKind::System => Line::from(vec![
                    stamp,
                    Span::styled(entry.text.clone(), self.theme.system_text_style),
                ]),
                LineKind::Error => Line::from(vec![
                    stamp,
                    Span::styled(entry.text.clone(), self.theme.error_text_style),
                ]),
            };
            lines.push(line);
        }
        lines
    }

    /// Reconcile the scroll position with the wrapped row count the renderer
    /// just measured. Auto-scroll pins the view to the newest row; otherwise
    /// the offset is clamped so the viewport never runs past the transcript.
    pub fn clamp_scroll(&mut self, max_offset: u16) {
        self.last_max_scroll = max_offset;
        if self.auto_scroll {
            self.scroll_offset = max_offset;
        } else {
            self.scroll_offset = self.scroll_offset.min(max_offset);
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(lines);
        self.auto_scroll = false;
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let max = self.last_max_scroll;
        self.scroll_offset = self.scroll_offset.saturating_add(lines).min(max);
        if self.scroll_offset >= max {
            self.auto_scroll = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::LineKind;
    use crate::utils::test_utils::create_test_app;

    fn rendered_count(app: &App, kind: LineKind) -> usize {
        app.transcript.iter().filter(|l| l.kind == kind).count()
    }

    #[test]
    fn outbound_requires_connection() {
        let mut app = create_test_app();
        app.session.link = LinkState::Disconnected;
        assert!(app.compose_outbound("hello").is_none());
        assert_eq!(
            app.transcript.back().map(|l| l.text.as_str()),
            Some("CONNECTION LOST. CANNOT TRANSMIT.")
        );
    }

    #[test]
    fn outbound_sanitizes_text() {
        let mut app = create_test_app();
        let out = app.compose_outbound("  <script>  ").unwrap();
        assert_eq!(out.display_text, "&lt;script&gt;");
        assert!(out.payload.contains("\"nick\":\"Tester\""));
    }

    #[test]
    fn empty_outbound_is_ignored() {
        let mut app = create_test_app();
        assert!(app.compose_outbound("   ").is_none());
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn self_echo_is_suppressed() {
        let mut app = create_test_app();
        let payload = r#"{"nick":"Tester","text":"hi","timestamp":"12:00:00"}"#;
        app.handle_incoming(payload);
        assert!(app.transcript.is_empty());
    }

    #[test]
    fn remote_message_renders_exactly_once() {
        let mut app = create_test_app();
        let payload = r#"{"nick":"Other","text":"labas","timestamp":"12:00:00"}"#;
        app.handle_incoming(payload);
        assert_eq!(rendered_count(&app, LineKind::Remote), 1);
        assert_eq!(app.transcript.len(), 1);
        let line = app.transcript.front().unwrap();
        assert_eq!(line.sender.as_deref(), Some("Other"));
        assert_eq!(line.text, "labas");
    }

    #[test]
    fn escaped_remote_text_is_not_escaped_again() {
        let mut app = create_test_app();
        let payload = r#"{"nick":"Other","text":"&lt;b&gt; &amp; done","timestamp":"12:00:00"}"#;
        app.handle_incoming(payload);
        let line = app.transcript.front().unwrap();
        assert_eq!(line.text, "&lt;b&gt; &amp; done");
    }

    #[test]
    fn malformed_payload_renders_raw_as_system() {
        let mut app = create_test_app();
        app.handle_incoming("garbage {not json");
        assert_eq!(app.transcript.len(), 1);
        let line = app.transcript.front().unwrap();
        assert_eq!(line.kind, LineKind::System);
        assert!(line.text.contains("garbage {not json"));
    }

    #[test]
    fn payload_missing_text_renders_raw() {
        let mut app = create_test_app();
        app.handle_incoming(r#"{"nick":"Other"}"#);
        assert_eq!(rendered_count(&app, LineKind::System), 1);
    }

    #[test]
    fn send_grants_experience_and_levels_up_once() {
        let mut app = create_test_app();
        for _ in 0..10 {
            app.note_sent("msg");
        }
        assert_eq!(app.session.level, 2);
        assert_eq!(app.session.experience, 0);
        let level_lines = app
            .transcript
            .iter()
            .filter(|l| l.text.starts_with("LEVEL UP!"))
            .count();
        assert_eq!(level_lines, 1);
    }

    #[test]
    fn valid_ai_instruction_arms_prompt() {
        let mut app = create_test_app();
        app.handle_ai_instruction("change background color to blue");
        assert!(app.pending_ai.is_some());
    }

    #[test]
    fn rejected_ai_instruction_emits_safety_message_without_prompt() {
        let mut app = create_test_app();
        app.handle_ai_instruction("delete all files");
        assert!(app.pending_ai.is_none());
        assert_eq!(
            app.transcript.back().map(|l| l.text.as_str()),
            Some(crate::core::ai::SAFETY_MESSAGE)
        );
    }

    #[test]
    fn confirming_applies_background_color() {
        let mut app = create_test_app();
        let before = app.theme.background_color;
        app.handle_ai_instruction("change background color to blue");
        app.confirm_pending_ai();
        assert!(app.pending_ai.is_none());
        assert_ne!(app.theme.background_color, before);
        assert!(app
            .transcript
            .back()
            .unwrap()
            .text
            .contains("BACKGROUND COLOR CHANGED TO blue"));
    }

    #[test]
    fn cancelling_applies_nothing() {
        let mut app = create_test_app();
        let before = app.theme.background_color;
        app.handle_ai_instruction("change background color to red");
        app.cancel_pending_ai();
        assert!(app.pending_ai.is_none());
        assert_eq!(app.theme.background_color, before);
    }

    #[test]
    fn newer_instruction_replaces_pending_prompt() {
        let mut app = create_test_app();
        app.handle_ai_instruction("change background color to red");
        app.handle_ai_instruction("change background color to blue");
        app.confirm_pending_ai();
        assert!(app
            .transcript
            .back()
            .unwrap()
            .text
            .contains("BACKGROUND COLOR CHANGED TO blue"));
    }

    #[test]
    fn unknown_color_word_is_rejected_at_apply_time() {
        let mut app = create_test_app();
        let before = app.theme.background_color;
        app.handle_ai_instruction("change background color to chartreuseish");
        app.confirm_pending_ai();
        assert_eq!(app.theme.background_color, before);
        assert_eq!(app.transcript.back().unwrap().kind, LineKind::Error);
    }

    #[test]
    fn scrolling_back_down_to_the_tail_resumes_auto_scroll() {
        let mut app = create_test_app();
        app.clamp_scroll(12);
        assert_eq!(app.scroll_offset, 12);

        app.scroll_up(5);
        assert!(!app.auto_scroll);
        app.clamp_scroll(12);
        assert_eq!(app.scroll_offset, 7);

        app.scroll_down(10);
        assert_eq!(app.scroll_offset, 12);
        assert!(app.auto_scroll);
    }

    #[test]
    fn connection_lost_marks_disconnected() {
        let mut app = create_test_app();
        app.on_connection_lost("broker went away");
        assert_eq!(app.session.link, LinkState::Disconnected);
        assert!(app
            .transcript
            .back()
            .unwrap()
            .text
            .contains("broker went away"));
    }
}
