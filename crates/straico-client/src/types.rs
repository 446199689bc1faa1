use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, StraicoError};

// -- Prompt completion --

/// Prompt completion request, fanned out to one or more models
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptCompletionRequest {
    /// Model identifiers (e.g. "openai/gpt-4o-mini")
    pub models: Vec<String>,
    /// Prompt text
    pub message: String,
    /// URLs of previously uploaded files to use as context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_urls: Option<Vec<String>>,
    /// `YouTube` video URLs to use as context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_urls: Option<Vec<String>>,
    /// Image URLs to use as context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    /// Any further parameters accepted by the service, sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PromptCompletionRequest {
    /// Create a request for the given models and prompt
    pub fn new<I, S>(models: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            models: models.into_iter().map(Into::into).collect(),
            message: message.into(),
            ..Self::default()
        }
    }

    /// Attach file URLs as context
    #[must_use]
    pub fn with_file_urls(mut self, urls: Vec<String>) -> Self {
        self.file_urls = Some(urls);
        self
    }

    /// Attach `YouTube` URLs as context
    #[must_use]
    pub fn with_youtube_urls(mut self, urls: Vec<String>) -> Self {
        self.youtube_urls = Some(urls);
        self
    }

    /// Attach image URLs as context
    #[must_use]
    pub fn with_images(mut self, urls: Vec<String>) -> Self {
        self.images = Some(urls);
        self
    }

    /// Check the invariants the type system cannot express
    pub(crate) fn validate(&self) -> Result<()> {
        if self.models.is_empty() {
            return Err(StraicoError::validation(
                r#"the "models" parameter (non-empty list) is required for prompt completion"#,
            ));
        }
        Ok(())
    }
}

impl TryFrom<Value> for PromptCompletionRequest {
    type Error = StraicoError;

    fn try_from(value: Value) -> Result<Self> {
        let Value::Object(params) = value else {
            return Err(StraicoError::validation(
                "prompt completion parameters must be a JSON object",
            ));
        };

        match params.get("models") {
            Some(Value::Array(models)) if !models.is_empty() => {
                if !models.iter().all(Value::is_string) {
                    return Err(StraicoError::validation(
                        r#"every entry of "models" must be a string"#,
                    ));
                }
            }
            _ => {
                return Err(StraicoError::validation(
                    r#"the "models" parameter (non-empty list) is required for prompt completion"#,
                ));
            }
        }

        if !params.get("message").is_some_and(Value::is_string) {
            return Err(StraicoError::validation(
                r#"the "message" parameter (string) is required for prompt completion"#,
            ));
        }

        for key in ["file_urls", "youtube_urls", "images"] {
            match params.get(key) {
                None | Some(Value::Array(_)) => {}
                Some(_) => {
                    return Err(StraicoError::validation(format!(
                        r#"the "{key}" parameter must be a list if provided"#
                    )));
                }
            }
        }

        serde_json::from_value(Value::Object(params)).map_err(|e| {
            StraicoError::validation(format!("invalid prompt completion parameters: {e}"))
        })
    }
}

// -- Image generation --

/// Aspect of generated images
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageSize {
    /// 1:1
    Square,
    /// Wider than tall
    Landscape,
    /// Taller than wide
    Portrait,
}

/// Image generation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    /// Image model identifier (e.g. "openai/dall-e-3")
    pub model: String,
    /// Text description of the desired image
    pub description: String,
    /// Image aspect; the service picks a per-model default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ImageSize>,
    /// Number of variations to generate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variations: Option<u32>,
    /// Any further parameters accepted by the service, sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageGenerationRequest {
    /// Create a request for the given model and description
    pub fn new(model: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    /// Set the image aspect
    #[must_use]
    pub const fn with_size(mut self, size: ImageSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Set the number of variations
    #[must_use]
    pub const fn with_variations(mut self, variations: u32) -> Self {
        self.variations = Some(variations);
        self
    }
}

impl TryFrom<Value> for ImageGenerationRequest {
    type Error = StraicoError;

    fn try_from(value: Value) -> Result<Self> {
        let Value::Object(params) = value else {
            return Err(StraicoError::validation(
                "image generation parameters must be a JSON object",
            ));
        };

        for key in ["model", "description"] {
            if !params.get(key).is_some_and(Value::is_string) {
                return Err(StraicoError::validation(format!(
                    r#"the "{key}" parameter (string) is required for image generation"#
                )));
            }
        }

        serde_json::from_value(Value::Object(params)).map_err(|e| {
            StraicoError::validation(format!("invalid image generation parameters: {e}"))
        })
    }
}
