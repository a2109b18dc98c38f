use crate::utils::sleep;
use base64::prelude::*;
use gloo::file::{Blob, ObjectUrl};
use gloo::net::http::{Request, Response};
use magicpals_core::{AspectRatio, GenerationError, ImageHandle, PcmClip, PollBackoff, Studio};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const IMAGE_MODEL: &str = "gemini-2.5-flash-image";
const SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";
const SPEECH_VOICE: &str = "Kore";
const VIDEO_MODEL: &str = "veo-3.1-fast-generate-preview";
const VIDEO_RESOLUTION: &str = "720p";

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
enum RequestPart<'a> {
    Text(&'a str),
    InlineData(InlineDataRef<'a>),
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct InlineDataRef<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: [&'static str; 1],
    speech_config: SpeechConfig,
}

impl GenerationConfig {
    fn speech(voice: &'static str) -> Self {
        Self {
            response_modalities: ["AUDIO"],
            speech_config: SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig { voice_name: voice },
                },
            },
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: &'static str,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GenerateContentResponse {
    /// First inline media part of the first candidate.
    fn into_inline_data(self) -> Result<InlineData, GenerationError> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| {
                content
                    .parts
                    .into_iter()
                    .find_map(|part| part.inline_data)
            })
            .ok_or(GenerationError::Empty)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct PredictVideoRequest<'a> {
    instances: [VideoInstance<'a>; 1],
    parameters: VideoParameters,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
struct VideoInstance<'a> {
    prompt: &'a str,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct VideoParameters {
    aspect_ratio: AspectRatio,
    resolution: &'static str,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct Operation {
    name: String,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<OperationError>,
    #[serde(default)]
    response: Option<VideoResponse>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
struct OperationError {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct VideoResponse {
    #[serde(default)]
    generate_video_response: GeneratedVideos,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
struct GeneratedVideos {
    #[serde(default)]
    generated_samples: Vec<GeneratedSample>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
struct GeneratedSample {
    video: VideoFile,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
struct VideoFile {
    uri: String,
}

impl Operation {
    /// Download link of a finished operation, `None` while it is still running.
    fn video_uri(self) -> Option<Result<String, GenerationError>> {
        if !self.done {
            return None;
        }
        if let Some(error) = self.error {
            return Some(Err(GenerationError::Request(error.message)));
        }
        Some(
            self.response
                .and_then(|response| {
                    response
                        .generate_video_response
                        .generated_samples
                        .into_iter()
                        .next()
                })
                .map(|sample| sample.video.uri)
                .ok_or(GenerationError::Empty),
        )
    }
}

fn request_error(err: impl Display) -> GenerationError {
    GenerationError::Request(err.to_string())
}

/// Status codes Veo answers with when the key's project cannot use it.
fn is_entitlement_status(status: u16) -> bool {
    matches!(status, 401 | 403 | 404)
}

/// [`Studio`] backed by the Gemini REST API.
///
/// Clones share the API key, so a key entered on one screen is used everywhere.
#[derive(Clone, Debug, Default)]
pub(crate) struct GeminiClient {
    api_key: Rc<RefCell<String>>,
}

impl PartialEq for GeminiClient {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.api_key, &other.api_key)
    }
}

impl GeminiClient {
    pub(crate) fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Rc::new(RefCell::new(api_key.into())),
        }
    }

    pub(crate) fn has_api_key(&self) -> bool {
        !self.api_key.borrow().is_empty()
    }

    /// Replaces the key for this session only.
    pub(crate) fn set_api_key(&self, api_key: impl Into<String>) {
        *self.api_key.borrow_mut() = api_key.into();
        log::debug!("api key replaced");
    }

    fn key(&self) -> String {
        self.api_key.borrow().clone()
    }

    async fn checked(response: Response) -> Result<Response, GenerationError> {
        if response.ok() {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        log::warn!("request failed with {}: {}", status, body);
        Err(GenerationError::Request(format!(
            "{} {}",
            status,
            response.status_text()
        )))
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<InlineData, GenerationError> {
        let url = format!("{API_BASE}/models/{model}:generateContent");
        log::debug!("POST {}", url);
        let response = Request::post(&url)
            .header("x-goog-api-key", &self.key())
            .json(request)
            .map_err(request_error)?
            .send()
            .await
            .map_err(request_error)?;
        Self::checked(response)
            .await?
            .json::<GenerateContentResponse>()
            .await
            .map_err(request_error)?
            .into_inline_data()
    }

    /// Sends a Veo request, mapping the statuses that mean "not allowed" to the entitlement error.
    async fn video_request(&self, request: Request) -> Result<Response, GenerationError> {
        let response = request.send().await.map_err(request_error)?;
        if is_entitlement_status(response.status()) {
            log::warn!("video generation refused with {}", response.status());
            return Err(GenerationError::EntitlementRequired);
        }
        Self::checked(response).await
    }

    async fn poll_video(&self, mut operation: Operation) -> Result<String, GenerationError> {
        let mut backoff = PollBackoff::new();
        loop {
            if let Some(uri) = operation.clone().video_uri() {
                return uri;
            }
            let Some(delay) = backoff.next() else {
                log::error!("video still running after {:?}", backoff.elapsed());
                return Err(GenerationError::TimedOut);
            };
            sleep(delay).await;

            let url = format!("{API_BASE}/{}", operation.name);
            log::debug!("polling {}", operation.name);
            let request = Request::get(&url)
                .header("x-goog-api-key", &self.key())
                .build()
                .map_err(request_error)?;
            operation = self
                .video_request(request)
                .await?
                .json()
                .await
                .map_err(request_error)?;
        }
    }
}

impl Studio for GeminiClient {
    type Video = ObjectUrl;

    async fn generate_image(&self, prompt: &str) -> Result<ImageHandle, GenerationError> {
        let request = GenerateContentRequest {
            contents: [Content {
                parts: vec![RequestPart::Text(prompt)],
            }],
            generation_config: None,
        };
        let data = self.generate_content(IMAGE_MODEL, &request).await?;
        Ok(ImageHandle::new(data.mime_type, data.data))
    }

    async fn edit_image(
        &self,
        image: &ImageHandle,
        instruction: &str,
    ) -> Result<ImageHandle, GenerationError> {
        let request = GenerateContentRequest {
            contents: [Content {
                parts: vec![
                    RequestPart::InlineData(InlineDataRef {
                        mime_type: "image/png",
                        data: &image.data_base64,
                    }),
                    RequestPart::Text(instruction),
                ],
            }],
            generation_config: None,
        };
        let data = self.generate_content(IMAGE_MODEL, &request).await?;
        Ok(ImageHandle::new(data.mime_type, data.data))
    }

    async fn generate_speech(&self, text: &str) -> Result<PcmClip, GenerationError> {
        let request = GenerateContentRequest {
            contents: [Content {
                parts: vec![RequestPart::Text(text)],
            }],
            generation_config: Some(GenerationConfig::speech(SPEECH_VOICE)),
        };
        let data = self.generate_content(SPEECH_MODEL, &request).await?;
        let bytes = BASE64_STANDARD.decode(data.data).map_err(request_error)?;
        Ok(PcmClip::from_le_bytes(&bytes)?)
    }

    async fn generate_video(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<ObjectUrl, GenerationError> {
        let url = format!("{API_BASE}/models/{VIDEO_MODEL}:predictLongRunning");
        log::debug!("POST {}", url);
        let request = Request::post(&url)
            .header("x-goog-api-key", &self.key())
            .json(&PredictVideoRequest {
                instances: [VideoInstance { prompt }],
                parameters: VideoParameters {
                    aspect_ratio,
                    resolution: VIDEO_RESOLUTION,
                },
            })
            .map_err(request_error)?;
        let operation: Operation = self
            .video_request(request)
            .await?
            .json()
            .await
            .map_err(request_error)?;
        log::info!("video operation {} started", operation.name);

        let uri = self.poll_video(operation).await?;
        let request = Request::get(&uri)
            .header("x-goog-api-key", &self.key())
            .build()
            .map_err(request_error)?;
        let bytes = self
            .video_request(request)
            .await?
            .binary()
            .await
            .map_err(request_error)?;
        log::info!("downloaded video ({} bytes)", bytes.len());

        let blob = Blob::new_with_options(bytes.as_slice(), Some("video/mp4"));
        Ok(ObjectUrl::from(blob))
    }
}
