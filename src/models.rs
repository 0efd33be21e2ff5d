use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Where keystrokes go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFocus {
    Normal,
    Editing,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Headline {
    pub title: String,
    pub link: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SummaryMeta {
    pub sources: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SummaryPoint {
    #[serde(default)]
    pub title: String,
    pub summary: String,
}

/// A briefing over one set of headlines. Points with an empty title are
/// free-standing paragraphs.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Summary {
    pub meta: SummaryMeta,
    pub points: Vec<SummaryPoint>,
}

impl Summary {
    /// Plain text for the clipboard and the text printer.
    pub fn to_plain_text(&self) -> String {
        self.points
            .iter()
            .map(|p| {
                if p.title.is_empty() {
                    format!("• {}", p.summary)
                } else {
                    format!("• {}: {}", p.title, p.summary)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Brief,
    Why,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Brief => "Brief",
            Mode::Why => "Why this matters",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Brief => Mode::Why,
            Mode::Why => Mode::Brief,
        }
    }

    /// Subtitle shown above the briefing.
    pub fn blurb(self) -> &'static str {
        match self {
            Mode::Brief => "Here's what matters today, based on the latest reporting.",
            Mode::Why => "Here's why today's developments matter.",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryTarget {
    Search(String),
    Digest,
}

/// What the screen is currently showing: one search or the daily digest,
/// in a given mode. Re-running a descriptor reproduces the view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryDescriptor {
    pub target: QueryTarget,
    pub mode: Mode,
}

impl QueryDescriptor {
    pub fn search(text: &str, mode: Mode) -> Result<Self, FetchError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(FetchError::EmptyQuery);
        }
        Ok(Self { target: QueryTarget::Search(text.to_string()), mode })
    }

    pub fn digest(mode: Mode) -> Self {
        Self { target: QueryTarget::Digest, mode }
    }

    pub fn with_mode(&self, mode: Mode) -> Self {
        Self { target: self.target.clone(), mode }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub label: String,
    pub query: String,
}

pub const DIGEST_LABEL: &str = "Daily Digest";
