//! Message text: anchor layout and URL-fragment parsing.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::LayoutSettings;

/// Two-character token separating the lines of a message.
pub const LINE_BREAK: &str = "\\N";

pub const DEFAULT_TEXT: &str = "HELLO WORLD";
pub const DEFAULT_COLORS: &str = "SSSSS GGGGG";

/// Fixed resting point of one non-space character, in simulation coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MessageAnchor {
    pub index: usize,
    pub character: char,
    pub position: Vec3,
}

/// Lays out one anchor per non-space character.
///
/// Lines are centered horizontally on the origin and the block is centered
/// vertically. Spaces advance the cursor without producing an anchor.
pub fn layout_message(text: &str, layout: &LayoutSettings) -> Vec<MessageAnchor> {
    let lines: Vec<&str> = text.split(LINE_BREAK).collect();
    let offset_y = lines.len() as f32 * layout.letter_height / 2.0;
    let depth = layout.origin.z;

    let mut anchors = Vec::new();
    let mut y = layout.origin.y;
    for line in lines {
        let offset_x = line.chars().count() as f32 * layout.letter_width / 2.0;
        let mut x = layout.origin.x;
        for character in line.chars() {
            if character != ' ' {
                anchors.push(MessageAnchor {
                    index: anchors.len(),
                    character,
                    position: Vec3::new(x - offset_x, depth, y + offset_y),
                });
            }
            x += layout.letter_width;
        }
        y -= layout.letter_height;
    }
    anchors
}

/// Surface finish of a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LetterFinish {
    #[default]
    Silver,
    Gold,
}

impl LetterFinish {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'S' => Some(LetterFinish::Silver),
            'G' => Some(LetterFinish::Gold),
            _ => None,
        }
    }
}

/// Text and per-character finish codes of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSpec {
    pub text: String,
    pub colors: String,
}

impl Default for MessageSpec {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            colors: DEFAULT_COLORS.to_string(),
        }
    }
}

impl MessageSpec {
    /// Parses `#text=...&colors=...`. Both values are upper-cased; a missing
    /// text falls back to the default message and its colors.
    pub fn from_fragment(fragment: &str) -> Self {
        let mut text = None;
        let mut colors = None;
        for part in fragment.trim_start_matches('#').split('&') {
            match part.split_once('=') {
                Some(("text", value)) if !value.is_empty() => text = Some(value.to_uppercase()),
                Some(("colors", value)) if !value.is_empty() => colors = Some(value.to_uppercase()),
                _ => {}
            }
        }

        match text {
            Some(text) => Self {
                text,
                colors: colors.unwrap_or_default(),
            },
            None => Self {
                colors: colors.unwrap_or_else(|| DEFAULT_COLORS.to_string()),
                ..Self::default()
            },
        }
    }

    /// Non-space letters in reading order with their finish. Line breaks
    /// count as one column for the color lookup; unknown or missing codes
    /// give silver.
    pub fn letters(&self) -> Vec<(char, LetterFinish)> {
        let flat = self.text.replace(LINE_BREAK, " ");
        let codes: Vec<char> = self.colors.chars().collect();
        flat.chars()
            .enumerate()
            .filter(|(_, character)| *character != ' ')
            .map(|(column, character)| {
                let finish = codes
                    .get(column)
                    .and_then(|code| LetterFinish::from_code(*code))
                    .unwrap_or_default();
                (character, finish)
            })
            .collect()
    }

    pub fn anchors(&self, layout: &LayoutSettings) -> Vec<MessageAnchor> {
        layout_message(&self.text, layout)
    }
}
