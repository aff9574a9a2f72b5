use crate::platform::{FormatSelector, MediaOption, Platform, QualityHint, ResolutionPlan};

use super::{Failure, ServiceResult};

type PlanBuilder = fn(Option<&QualityHint>) -> ServiceResult<ResolutionPlan>;

enum OptionMatch {
    Is(MediaOption),
    Any,
}

impl OptionMatch {
    fn matches(&self, option: MediaOption) -> bool {
        match self {
            Self::Is(expected) => *expected == option,
            Self::Any => true,
        }
    }
}

struct Rule {
    platform: Platform,
    option: OptionMatch,
    build: PlanBuilder,
}

/// First matching rule wins. A (platform, option) pair with no rule is an
/// invalid option.
static RULES: &[Rule] = &[
    Rule {
        platform: Platform::Youtube,
        option: OptionMatch::Is(MediaOption::Video),
        build: youtube_video,
    },
    Rule {
        platform: Platform::Youtube,
        option: OptionMatch::Is(MediaOption::Audio),
        build: best_audio,
    },
    Rule {
        platform: Platform::Youtube,
        option: OptionMatch::Is(MediaOption::Thumbnail),
        build: thumbnail,
    },
    Rule {
        platform: Platform::Youtube,
        option: OptionMatch::Is(MediaOption::Subtitles),
        build: subtitles,
    },
    Rule {
        platform: Platform::Youtube,
        option: OptionMatch::Is(MediaOption::Playlist),
        build: playlist,
    },
    Rule {
        platform: Platform::Instagram,
        option: OptionMatch::Is(MediaOption::Audio),
        build: best_audio,
    },
    Rule {
        platform: Platform::Instagram,
        option: OptionMatch::Any,
        build: best_post,
    },
    Rule {
        platform: Platform::Facebook,
        option: OptionMatch::Is(MediaOption::Audio),
        build: best_audio,
    },
    Rule {
        platform: Platform::Facebook,
        option: OptionMatch::Any,
        build: best_post,
    },
];

/// Builds the backend request for a platform/option pair. Pure; never
/// touches a backend.
pub fn plan(platform: Platform, option: MediaOption, hint: Option<&QualityHint>) -> ServiceResult<ResolutionPlan> {
    RULES
        .iter()
        .find(|rule| rule.platform == platform && rule.option.matches(option))
        .map(|rule| (rule.build)(hint))
        .unwrap_or_else(|| {
            Err(Failure::invalid_option(format!(
                "Option '{}' is not available for {}",
                option, platform
            )))
        })
}

fn youtube_video(hint: Option<&QualityHint>) -> ServiceResult<ResolutionPlan> {
    let selector = match hint {
        Some(QualityHint::Height(height)) => FormatSelector::AtMostHeight(*height),
        Some(QualityHint::FormatId(id)) => FormatSelector::FormatId(id.clone()),
        None => FormatSelector::Best,
    };
    Ok(ResolutionPlan::stream(selector))
}

fn best_audio(_: Option<&QualityHint>) -> ServiceResult<ResolutionPlan> {
    Ok(ResolutionPlan::audio())
}

fn best_post(_: Option<&QualityHint>) -> ServiceResult<ResolutionPlan> {
    Ok(ResolutionPlan::stream(FormatSelector::Best))
}

fn thumbnail(_: Option<&QualityHint>) -> ServiceResult<ResolutionPlan> {
    Ok(ResolutionPlan::Thumbnail)
}

fn subtitles(_: Option<&QualityHint>) -> ServiceResult<ResolutionPlan> {
    Ok(ResolutionPlan::Subtitles)
}

fn playlist(_: Option<&QualityHint>) -> ServiceResult<ResolutionPlan> {
    Err(Failure::unsupported("Playlists are not supported in direct-link delivery"))
}
