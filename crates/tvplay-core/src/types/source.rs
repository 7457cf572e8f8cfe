//! Playback source descriptors.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// HTTP headers sent along with a media request.
pub type Headers = HashMap<String, String>;

/// A source that can be handed to an engine as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectSource {
    pub url: String,
    #[serde(default, alias = "header")]
    pub headers: Headers,
}

impl DirectSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Headers::new(),
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }
}

/// Alternate resolution endpoint offered alongside a result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlternateSource {
    /// Display name, surfaced when resolution through it succeeds.
    pub name: String,
    /// Endpoint the URL is appended to.
    pub endpoint: String,
}

/// Playback result returned by a content provider.
///
/// Deserializes from the provider JSON (`header`, `playUrl`, `parse`, `jx`).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlayResult {
    #[serde(default)]
    pub url: String,
    #[serde(default, rename = "header", alias = "headers")]
    pub headers: Headers,
    /// Provider asks for resolution; absent means yes.
    #[serde(default)]
    pub parse: Option<u8>,
    /// Provider asks for resolution through the user's parser list.
    #[serde(default)]
    pub jx: u8,
    /// Prefix prepended to `url` (or the parse endpoint when resolving).
    #[serde(default)]
    pub play_url: String,
    /// Provider-side line/flag name.
    #[serde(default)]
    pub flag: String,
    #[serde(default)]
    pub alternate: Option<AlternateSource>,
}

impl PlayResult {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Parse a result from provider JSON.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[must_use]
    pub fn with_parse(mut self, parse: u8) -> Self {
        self.parse = Some(parse);
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: Headers) -> Self {
        self.headers = headers;
        self
    }

    #[must_use]
    pub fn with_play_url(mut self, play_url: impl Into<String>) -> Self {
        self.play_url = play_url.into();
        self
    }

    /// Whether an indirect resolution step must run before loading.
    pub fn requires_resolution(&self) -> bool {
        self.parse.unwrap_or(1) == 1 || self.jx == 1
    }

    /// The URL handed to an engine when no resolution is needed.
    pub fn play_target(&self) -> String {
        format!("{}{}", self.play_url, self.url)
    }
}

/// A request to start playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayRequest {
    /// Direct source, loaded immediately.
    Direct(DirectSource),
    /// Provider result, possibly resolved first.
    Result {
        result: PlayResult,
        /// Resolve through the result's alternate source.
        use_alternate: bool,
    },
}

impl PlayRequest {
    pub fn url(&self) -> &str {
        match self {
            Self::Direct(source) => &source.url,
            Self::Result { result, .. } => &result.url,
        }
    }
}

impl From<DirectSource> for PlayRequest {
    fn from(source: DirectSource) -> Self {
        Self::Direct(source)
    }
}

impl From<PlayResult> for PlayRequest {
    fn from(result: PlayResult) -> Self {
        Self::Result {
            result,
            use_alternate: false,
        }
    }
}

/// How an adaptive engine should interpret a media URL.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceHint {
    /// Let the engine sniff the container.
    #[default]
    Auto,
    Hls,
    Dash,
    Progressive,
}

impl SourceHint {
    /// Infer a hint from the URL path extension.
    pub fn infer(url: &str) -> Self {
        let path = Url::parse(url).map_or_else(|_| url.to_lowercase(), |u| u.path().to_lowercase());

        if path.ends_with(".m3u8") || path.contains(".m3u8?") {
            Self::Hls
        } else if path.ends_with(".mpd") {
            Self::Dash
        } else {
            Self::Auto
        }
    }
}

/// Source assigned to an engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MediaSource {
    pub url: String,
    pub headers: Headers,
    pub hint: SourceHint,
}

impl MediaSource {
    pub fn new(url: impl Into<String>, headers: Headers) -> Self {
        let url = url.into();
        let hint = SourceHint::infer(&url);
        Self { url, headers, hint }
    }

    #[must_use]
    pub const fn with_hint(mut self, hint: SourceHint) -> Self {
        self.hint = hint;
        self
    }
}
