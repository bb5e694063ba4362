//! Wire payload and transcript line types.

use serde::{Deserialize, Serialize};

/// The JSON object exchanged on the shared topic.
///
/// There is no schema versioning; anything that does not deserialize into
/// this shape with a non-empty `nick` and `text` is treated as unparseable
/// and rendered raw so malformed traffic stays visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMessage {
    pub nick: String,
    pub text: String,
    pub timestamp: String,
}

impl WireMessage {
    pub fn new(
        nick: impl Into<String>,
        text: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            nick: nick.into(),
            text: text.into(),
            timestamp: timestamp.into(),
        }
    }

    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Strict parse for rendering purposes: valid JSON of the right shape
    /// with both `nick` and `text` present and non-empty.
    pub fn parse(payload: &str) -> Option<Self> {
        #[derive(Deserialize)]
        struct RawWireMessage {
            nick: Option<String>,
            text: Option<String>,
            #[serde(default)]
            timestamp: Option<String>,
        }

        let raw: RawWireMessage = serde_json::from_str(payload).ok()?;
        let nick = raw.nick.filter(|n| !n.is_empty())?;
        let text = raw.text.filter(|t| !t.is_empty())?;
        Some(Self {
            nick,
            text,
            timestamp: raw.timestamp.unwrap_or_default(),
        })
    }
}

/// Origin of a transcript line, which picks its style at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Sent by this session and rendered locally on successful publish.
    Own,
    /// Arrived from another participant on the shared topic.
    Remote,
    /// App-authored status, welcome, and command output lines.
    System,
    /// Visible failures: transport errors, command validation errors.
    Error,
}

/// One rendered line of the append-only transcript.
#[derive(Debug, Clone)]
pub struct TranscriptLine {
    pub kind: LineKind,
    pub timestamp: String,
    pub sender: Option<String>,
    pub text: String,
}

impl TranscriptLine {
    pub fn own(sender: impl Into<String>, text: impl Into<String>, timestamp: String) -> Self {
        Self {
            kind: LineKind::Own,
            timestamp,
            sender: Some(sender.into()),
            text: text.into(),
        }
    }

    pub fn remote(sender: impl Into<String>, text: impl Into<String>, timestamp: String) -> Self {
        Self {
            kind: LineKind::Remote,
            timestamp,
            sender: Some(sender.into()),
            text: text.into(),
        }
    }

    pub fn system(text: impl Into<String>, timestamp: String) -> Self {
        Self {
            kind: LineKind::System,
            timestamp,
            sender: None,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>, timestamp: String) -> Self {
        Self {
            kind: LineKind::Error,
            timestamp,
            sender: None,
            text: text.into(),
        }
    }
}

/// Locale-style wall-clock timestamp used for both wire payloads and
/// transcript lines.
pub fn local_timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
