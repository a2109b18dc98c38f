use alloc::{format, string::String};
use core::time::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::*;

/// Failure of a generative collaborator call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Response carried no usable media")]
    Empty,
    #[error("Video generation needs an API key from a paid project")]
    EntitlementRequired,
    #[error("Gave up waiting for the video")]
    TimedOut,
    #[error("Speech could not be decoded")]
    Audio(#[from] Error),
}

impl GenerationError {
    pub const fn is_entitlement(&self) -> bool {
        matches!(self, Self::EntitlementRequired)
    }
}

/// Generated picture, kept as the base64 payload the service returned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHandle {
    pub mime: String,
    pub data_base64: String,
}

impl ImageHandle {
    pub fn new(mime: impl Into<String>, data_base64: impl Into<String>) -> Self {
        Self {
            mime: mime.into(),
            data_base64: data_base64.into(),
        }
    }

    /// `data:<mime>;base64,<data>`, usable directly as an image source.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data_base64)
    }

    pub fn from_data_url(url: &str) -> Option<Self> {
        let (mime, data) = url.strip_prefix("data:")?.split_once(";base64,")?;
        if mime.is_empty() {
            return None;
        }
        Some(Self::new(mime, data))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }
}

/// Remote generative service the screens delegate media creation to.
#[allow(async_fn_in_trait)]
pub trait Studio {
    /// Playable video produced by [`Studio::generate_video`].
    type Video;

    async fn generate_image(&self, prompt: &str) -> Result<ImageHandle, GenerationError>;

    async fn edit_image(
        &self,
        image: &ImageHandle,
        instruction: &str,
    ) -> Result<ImageHandle, GenerationError>;

    /// Mono 16-bit speech at [`SPEECH_SAMPLE_RATE`].
    async fn generate_speech(&self, text: &str) -> Result<PcmClip, GenerationError>;

    /// Long-running; implementations poll on a [`PollBackoff`] schedule.
    async fn generate_video(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Self::Video, GenerationError>;
}

/// Delays between polls of a long-running operation.
///
/// Starts at five seconds and grows by half each step up to twenty; ends once the next delay would
/// push the total wait past the budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollBackoff {
    next_ms: u64,
    elapsed_ms: u64,
}

impl PollBackoff {
    pub const FIRST_DELAY_MS: u64 = 5_000;
    pub const MAX_DELAY_MS: u64 = 20_000;
    pub const BUDGET_MS: u64 = 10 * 60 * 1_000;

    pub const fn new() -> Self {
        Self {
            next_ms: Self::FIRST_DELAY_MS,
            elapsed_ms: 0,
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}

impl Default for PollBackoff {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for PollBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Self::Item> {
        let delay = self.next_ms;
        if self.elapsed_ms + delay > Self::BUDGET_MS {
            return None;
        }
        self.elapsed_ms += delay;
        self.next_ms = (delay * 3 / 2).min(Self::MAX_DELAY_MS);
        Some(Duration::from_millis(delay))
    }
}
