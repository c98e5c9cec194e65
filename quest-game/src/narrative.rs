//! Best-effort generative collaborator: photo edits and the closing story.
//!
//! The quest never depends on this service. Failures collapse to a fixed
//! fallback string or "no image" and are only logged; nothing is retried.
use serde::{Deserialize, Serialize};

use crate::constants::{STORY_EMPTY_FALLBACK, STORY_ERROR_FALLBACK, STORY_WORD_LIMIT};

/// Base64 image bytes plus their MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePayload {
    pub mime_type: String,
    pub base64: String,
}

impl ImagePayload {
    #[must_use]
    pub fn new(mime_type: impl Into<String>, base64: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64: base64.into(),
        }
    }

    /// `data:` URL suitable for an `<img src>`.
    #[must_use]
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64)
    }
}

/// Capability boundary for the external text/image service.
pub trait StoryTeller {
    type Error: std::error::Error + 'static;

    /// Edit `image` according to `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails. `Ok(None)` means the
    /// service answered without an image.
    fn edit_image(&self, image: &ImagePayload, prompt: &str)
    -> Result<Option<ImagePayload>, Self::Error>;

    /// Write a short story from the collected memories.
    ///
    /// # Errors
    ///
    /// Returns an error if the service call fails.
    fn generate_story(&self, memories: &[String]) -> Result<String, Self::Error>;
}

/// Prompt text sent with the collected memories.
#[must_use]
pub fn story_prompt(memories: &[String]) -> String {
    format!(
        "We have completed a Valentine's Quest. Here are the notes and memories collected:\n{}\n\n\
         Write a short, whimsical, and deeply romantic story summarizing this journey. \
         Keep it under {STORY_WORD_LIMIT} words.",
        memories.join("\n")
    )
}

/// The generated story, or a fixed fallback when the service fails or answers blank.
pub fn story_or_fallback<T: StoryTeller>(teller: &T, memories: &[String]) -> String {
    match teller.generate_story(memories) {
        Ok(story) if story.trim().is_empty() => STORY_EMPTY_FALLBACK.to_string(),
        Ok(story) => story,
        Err(err) => {
            log::warn!("story generation failed: {err}");
            STORY_ERROR_FALLBACK.to_string()
        }
    }
}

pub fn edited_image_or_none<T: StoryTeller>(
    teller: &T,
    image: &ImagePayload,
    prompt: &str,
) -> Option<ImagePayload> {
    teller.edit_image(image, prompt).unwrap_or_else(|err| {
        log::warn!("image edit failed: {err}");
        None
    })
}

#[derive(Debug, thiserror::Error)]
#[error("no story service configured")]
pub struct OfflineError;

/// Stand-in used when no service is configured; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineStoryTeller;

impl StoryTeller for OfflineStoryTeller {
    type Error = OfflineError;

    fn edit_image(
        &self,
        _image: &ImagePayload,
        _prompt: &str,
    ) -> Result<Option<ImagePayload>, Self::Error> {
        Err(OfflineError)
    }

    fn generate_story(&self, _memories: &[String]) -> Result<String, Self::Error> {
        Err(OfflineError)
    }
}
