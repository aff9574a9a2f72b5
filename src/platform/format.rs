use std::sync::LazyLock;

use regex::Regex;

static HEIGHT_HINT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(\d{1,5})p?$").expect("height hint regex is valid"));

/// User-supplied quality target. Only youtube video honors it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QualityHint {
    Height(u32),
    FormatId(String),
}

impl QualityHint {
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        match HEIGHT_HINT_REGEX
            .captures(trimmed)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        {
            Some(0) => None,
            Some(height) => Some(Self::Height(height)),
            None => Some(Self::FormatId(trimmed.to_string())),
        }
    }
}

/// Stream selection handed to a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSelector {
    Best,
    BestAudio,
    AtMostHeight(u32),
    FormatId(String),
}

impl FormatSelector {
    /// Extractor selector expression. Height-bounded selections accept either
    /// separate video+audio streams or a single muxed stream.
    pub fn expression(&self) -> String {
        match self {
            Self::Best => "best".to_string(),
            Self::BestAudio => "bestaudio/best".to_string(),
            Self::AtMostHeight(h) => format!("bv*[height<={h}]+ba/b[height<={h}]/bv*+ba/best"),
            Self::FormatId(id) => format!("{id}+bestaudio/{id}/best"),
        }
    }
}
