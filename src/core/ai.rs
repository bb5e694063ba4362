//! The restricted `/ai` instruction executor.
//!
//! Exactly one instruction shape is permitted: changing the background
//! color. The match is an anchored allow-list check on the literal phrase,
//! not a general parser; everything else is rejected outright. If more
//! instruction types are ever added, extend [`AiInstruction`] with new
//! variants rather than loosening the matcher.

/// Fixed response for any instruction outside the permitted set.
pub const SAFETY_MESSAGE: &str =
    "INSTRUCTION REJECTED. ONLY 'change background color to <color>' IS PERMITTED.";

const BACKGROUND_PREFIX: &str = "change background color to ";

/// A validated instruction, ready for confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiInstruction {
    ChangeBackground { color: String },
}

/// Validate a free-text instruction against the permitted pattern: the
/// literal phrase followed by a single alphabetic color word, anchored at
/// both ends, case-insensitive.
pub fn interpret(instruction: &str) -> Option<AiInstruction> {
    let lowered = instruction.trim().to_ascii_lowercase();
    let rest = lowered.strip_prefix(BACKGROUND_PREFIX)?;
    if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(AiInstruction::ChangeBackground {
        color: rest.to_string(),
    })
}

/// A confirmation prompt awaiting the user's decision. At most one exists
/// at a time; a newer `/ai` command replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInstruction {
    pub instruction: AiInstruction,
}

impl PendingInstruction {
    pub fn prompt(&self) -> String {
        match &self.instruction {
            AiInstruction::ChangeBackground { color } => {
                format!("CONFIRM: change background color to {color}? [y/n]")
            }
        }
    }
}
