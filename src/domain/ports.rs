use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// A coordinate match returned by a location lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// One round trip to the chat endpoint; returns the text of the first choice.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}

#[async_trait]
pub trait LocationLookup: Send + Sync {
    /// `Ok(None)` when the service answered but found nothing.
    async fn locate(&self, location: &str) -> Result<Option<GeoMatch>>;
}
