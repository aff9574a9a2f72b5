use std::{
    path::PathBuf,
    process::Stdio,
    time::Duration,
};

use serde_json::Value;

use super::{PlatformError, RawMetadata, RequestedStream, ResolvedMedia, StreamEntry, SubtitleLanguage, SubtitleTrack};

/// Optional cookie file handed to the extractor. Absence only narrows what
/// the backend can reach.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub cookies: Option<PathBuf>,
}

impl Credentials {
    pub fn none() -> Self {
        Self::default()
    }

    /// Keeps the cookie file only when it exists on this host.
    pub fn from_cookie_file(path: Option<PathBuf>) -> Self {
        let cookies = path.filter(|p| {
            let exists = p.is_file();
            if !exists {
                warn!("Cookie file {} not found, continuing without it", p.display());
            }
            exists
        });
        Self { cookies }
    }
}

#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
    timeout: Duration,
    credentials: Credentials,
}

impl YtDlp {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration, credentials: Credentials) -> Self {
        Self {
            binary: binary.into(),
            timeout,
            credentials,
        }
    }

    pub(crate) fn build_args(&self, url: &str, selector: Option<&str>) -> Vec<String> {
        let mut args = vec![
            "--dump-json".to_string(),
            "--no-warnings".to_string(),
            "--no-playlist".to_string(),
            "--socket-timeout".to_string(),
            self.timeout.as_secs().max(1).to_string(),
        ];

        if let Some(cookies) = &self.credentials.cookies {
            args.push("--cookies".to_string());
            args.push(cookies.display().to_string());
        }

        if let Some(selector) = selector {
            args.push("-f".to_string());
            args.push(selector.to_string());
        }

        args.push(url.to_string());
        args
    }

    /// Runs the extractor and returns its JSON document, or `None` when it
    /// printed nothing.
    pub async fn dump_json(&self, url: &str, selector: Option<&str>) -> Result<Option<Value>, PlatformError> {
        let args = self.build_args(url, selector);
        debug!("Running {} {:?}", self.binary.display(), args);

        let mut command = tokio::process::Command::new(&self.binary);
        command
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| PlatformError::Timeout(self.timeout.as_secs()))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PlatformError::Backend(stderr.trim().to_string()));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let Some(line) = stdout.lines().find(|l| !l.trim().is_empty()) else {
            return Ok(None);
        };

        let json = serde_json::from_str::<Value>(line)?;
        Ok(if json.is_null() { None } else { Some(json) })
    }
}

fn str_field(json: &Value, key: &str) -> Option<String> {
    json.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn has_codec(format: &Value, key: &str) -> bool {
    format
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|c| !c.is_empty() && c != "none")
}

pub fn parse_metadata(json: &Value) -> RawMetadata {
    RawMetadata {
        title: str_field(json, "title"),
        uploader: str_field(json, "uploader"),
        thumbnail: str_field(json, "thumbnail"),
        duration: json.get("duration").and_then(Value::as_f64),
        formats: parse_stream_entries(json),
        subtitles: parse_subtitles(json),
    }
}

/// Unique video heights, tallest first.
fn parse_stream_entries(json: &Value) -> Vec<StreamEntry> {
    let mut heights: Vec<u32> = json
        .get("formats")
        .and_then(Value::as_array)
        .map(|formats| {
            formats
                .iter()
                .filter(|f| has_codec(f, "vcodec"))
                .filter_map(|f| f.get("height").and_then(Value::as_u64))
                .filter_map(|h| u32::try_from(h).ok())
                .filter(|h| *h > 0)
                .collect()
        })
        .unwrap_or_default();

    heights.sort_unstable_by(|a, b| b.cmp(a));
    heights.dedup();

    heights
        .into_iter()
        .map(|height| StreamEntry {
            height,
            display: format!("{}p", height),
        })
        .collect()
}

fn parse_subtitles(json: &Value) -> Vec<SubtitleLanguage> {
    let Some(languages) = json.get("subtitles").and_then(Value::as_object) else {
        return Vec::new();
    };

    languages
        .iter()
        .map(|(language, tracks)| SubtitleLanguage {
            language: language.clone(),
            tracks: tracks
                .as_array()
                .map(|tracks| {
                    tracks
                        .iter()
                        .filter_map(|t| {
                            str_field(t, "url").map(|url| SubtitleTrack {
                                url,
                                ext: str_field(t, "ext"),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect()
}

pub fn parse_resolved(json: &Value) -> ResolvedMedia {
    let requested_formats = json
        .get("requested_formats")
        .and_then(Value::as_array)
        .map(|formats| {
            formats
                .iter()
                .filter_map(|f| {
                    str_field(f, "url").map(|url| RequestedStream {
                        url,
                        ext: str_field(f, "ext"),
                        has_video: has_codec(f, "vcodec"),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    ResolvedMedia {
        url: str_field(json, "url"),
        title: str_field(json, "title"),
        ext: str_field(json, "ext"),
        requested_formats,
    }
}
