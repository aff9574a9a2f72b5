use std::fmt::{self, Display};

use super::FormatSelector;

/// Fully specified instruction for a backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionPlan {
    /// Resolve a media stream through the backend.
    Stream { selector: FormatSelector, audio_only: bool },
    /// Answer from probed metadata: its thumbnail URL.
    Thumbnail,
    /// Answer from probed metadata: the first available subtitle track.
    Subtitles,
}

impl ResolutionPlan {
    pub fn stream(selector: FormatSelector) -> Self {
        Self::Stream {
            selector,
            audio_only: false,
        }
    }

    pub fn audio() -> Self {
        Self::Stream {
            selector: FormatSelector::BestAudio,
            audio_only: true,
        }
    }

    pub fn selector(&self) -> Option<&FormatSelector> {
        match self {
            Self::Stream { selector, .. } => Some(selector),
            Self::Thumbnail | Self::Subtitles => None,
        }
    }
}

impl Display for ResolutionPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream { selector, .. } => write!(f, "stream({})", selector.expression()),
            Self::Thumbnail => f.write_str("thumbnail"),
            Self::Subtitles => f.write_str("subtitles"),
        }
    }
}
