//! Suggestion resolution pipeline
//!
//! Turns a free-text conversational request into a short list of
//! catalog-backed movie suggestions in two stages: elicit title+year
//! candidates from the LLM under a declared output schema, then resolve each
//! candidate independently against the catalog. Splitting the stages
//! isolates the one call with unstructured output from the deterministic
//! catalog lookups; one bad title never sinks the others.
use crate::{
    error::{AppError, AppResult},
    models::{CandidateSuggestion, ConversationMessage, ResolvedSuggestion},
    services::catalog::CatalogProvider,
};
use chrono::Utc;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::task::JoinSet;

const NO_SUGGESTIONS: &str =
    "Couldn't find any movie suggestions for that. Please try another query.";

/// Trait for the candidate-eliciting model
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SuggestionModel: Send + Sync {
    /// Asks the model for a small list of title+year candidates
    async fn elicit(
        &self,
        transcript: &[ConversationMessage],
    ) -> AppResult<Vec<CandidateSuggestion>>;
}

pub struct SuggestionPipeline {
    model: Arc<dyn SuggestionModel>,
    catalog: Arc<dyn CatalogProvider>,
}

impl SuggestionPipeline {
    pub fn new(model: Arc<dyn SuggestionModel>, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self { model, catalog }
    }

    /// Resolves a transcript into catalog-backed suggestions.
    ///
    /// Exactly two terminal outcomes: a non-empty ordered list, or an error.
    /// Candidates that fail to resolve are dropped silently; the surviving
    /// suggestions keep the model's order.
    pub async fn resolve_suggestions(
        &self,
        transcript: &[ConversationMessage],
    ) -> AppResult<Vec<ResolvedSuggestion>> {
        let candidates = self.model.elicit(transcript).await?;
        if candidates.is_empty() {
            return Err(AppError::Suggestions(NO_SUGGESTIONS.to_string()));
        }

        // Per-candidate lookups run concurrently; the JoinSet ties their
        // lifetime to this call, so an abandoned request aborts its children.
        let mut lookups = JoinSet::new();
        for (index, candidate) in candidates.into_iter().enumerate() {
            let catalog = Arc::clone(&self.catalog);
            lookups.spawn(async move {
                let hit = catalog
                    .search_year(&candidate.title, candidate.year)
                    .await
                    .into_iter()
                    .next();
                let resolved = hit.map(|movie| ResolvedSuggestion {
                    title: candidate.title,
                    year: candidate.year,
                    catalog_id: movie.id,
                    poster_path: movie.poster_path,
                    rating: movie.rating,
                });
                (index, resolved)
            });
        }

        let mut slots: Vec<Option<ResolvedSuggestion>> = vec![None; lookups.len()];
        while let Some(joined) = lookups.join_next().await {
            match joined {
                Ok((index, resolved)) => slots[index] = resolved,
                Err(e) => {
                    tracing::error!(error = %e, "Candidate resolution task failed");
                }
            }
        }

        let resolved: Vec<ResolvedSuggestion> = slots.into_iter().flatten().collect();

        tracing::info!(
            resolved = resolved.len(),
            "Suggestion resolution completed"
        );

        if resolved.is_empty() {
            return Err(AppError::Suggestions(NO_SUGGESTIONS.to_string()));
        }
        Ok(resolved)
    }
}

// ============================================================================
// LLM (Gemini) client
// ============================================================================

#[derive(Debug, Clone, Serialize, PartialEq)]
struct ModelTurn {
    role: &'static str,
    parts: Vec<ModelPart>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
struct ModelPart {
    text: String,
}

impl ModelTurn {
    fn user(text: String) -> Self {
        Self {
            role: "user",
            parts: vec![ModelPart { text }],
        }
    }

    fn model(text: String) -> Self {
        Self {
            role: "model",
            parts: vec![ModelPart { text }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Clone)]
pub struct GeminiModel {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl GeminiModel {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    fn system_prompt() -> String {
        format!(
            "You are a friendly and helpful movie suggestion chatbot. Based on the user's \
             request and the conversation history, suggest 3 movies. Prioritize Hindi movies \
             unless another language is specified. If no good Hindi matches are found, you can \
             suggest popular English-language movies. Today's date is {}. The user is in India. \
             For follow-up questions like \"suggest more\", provide 3 *different* movies based \
             on the original request's context. Only return a JSON array of objects, where each \
             object has \"title\" (string) and \"year\" (number) properties.",
            Utc::now().format("%B %-d, %Y")
        )
    }

    /// Declared output schema: array of objects with required title and year
    fn response_schema() -> serde_json::Value {
        json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "title": { "type": "STRING" },
                    "year": { "type": "NUMBER" },
                },
                "required": ["title", "year"],
            },
        })
    }

    /// Maps the transcript to model turns, flattening prior result cards to a
    /// text summary so the model has continuity without structured history.
    fn build_turns(transcript: &[ConversationMessage]) -> Vec<ModelTurn> {
        let mut turns = vec![
            ModelTurn::user(Self::system_prompt()),
            ModelTurn::model("Okay, I'm ready. How can I help?".to_string()),
        ];

        for message in transcript {
            turns.push(match message {
                ConversationMessage::User(text) => ModelTurn::user(text.clone()),
                ConversationMessage::AssistantText(text) => ModelTurn::model(text.clone()),
                ConversationMessage::AssistantResults(results) => {
                    let titles = results
                        .iter()
                        .map(|r| format!("{} ({})", r.title, r.year))
                        .collect::<Vec<_>>()
                        .join(", ");
                    ModelTurn::model(format!("I suggested these movies: {}", titles))
                }
            });
        }

        turns
    }
}

#[async_trait::async_trait]
impl SuggestionModel for GeminiModel {
    async fn elicit(
        &self,
        transcript: &[ConversationMessage],
    ) -> AppResult<Vec<CandidateSuggestion>> {
        let payload = json!({
            "contents": Self::build_turns(transcript),
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": Self::response_schema(),
            },
        });

        let response = self
            .http_client
            .post(&self.api_url)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                AppError::Suggestions(format!("Failed to get suggestions from the AI: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::Suggestions(
                "Failed to get suggestions from the AI.".to_string(),
            ));
        }

        let generated: GenerateResponse = response.json().await.map_err(|e| {
            AppError::SchemaViolation(format!("Invalid completion payload: {}", e))
        })?;

        let Some(text) = generated
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
        else {
            return Err(AppError::Suggestions(
                "I couldn't generate a response for that. Please try a different query."
                    .to_string(),
            ));
        };

        let candidates: Vec<CandidateSuggestion> = serde_json::from_str(text).map_err(|e| {
            AppError::SchemaViolation(format!("Model output failed declared schema: {}", e))
        })?;

        if candidates.is_empty() {
            return Err(AppError::Suggestions(NO_SUGGESTIONS.to_string()));
        }

        tracing::info!(candidates = candidates.len(), "Candidates elicited");
        Ok(candidates)
    }
}
