//! Console Line Model
//!
//! A single completed, classified line of shell output. Lines are immutable
//! once built; consumers only ever receive copies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a completed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    /// Regular output
    #[default]
    Normal,
    /// Error output (stderr, failed built-ins)
    Error,
    /// A path to an image file rather than text
    Image,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::Normal => write!(f, "normal"),
            LineKind::Error => write!(f, "error"),
            LineKind::Image => write!(f, "image"),
        }
    }
}

/// One immutable unit of classified output text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleLine {
    text: String,
    kind: LineKind,
}

impl ConsoleLine {
    /// Create a new line with the given classification
    pub fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    /// Create a Normal line
    pub fn normal(text: impl Into<String>) -> Self {
        Self::new(text, LineKind::Normal)
    }

    /// Create an Error line
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, LineKind::Error)
    }

    /// Create an Image line; the payload is a file path
    pub fn image(path: impl Into<String>) -> Self {
        Self::new(path, LineKind::Image)
    }

    /// Line text (or image path for Image lines)
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn is_error(&self) -> bool {
        self.kind == LineKind::Error
    }

    pub fn is_image(&self) -> bool {
        self.kind == LineKind::Image
    }

    /// Consume the line, returning its text
    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for ConsoleLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
