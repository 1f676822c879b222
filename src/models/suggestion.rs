use serde::{Deserialize, Serialize};

/// One turn of the chat transcript.
///
/// `AssistantResults` carries the structured suggestion cards a previous
/// pipeline run produced; it is flattened to a text summary before being
/// replayed to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", content = "content", rename_all = "kebab-case")]
pub enum ConversationMessage {
    User(String),
    AssistantText(String),
    AssistantResults(Vec<ResolvedSuggestion>),
}

/// A title+year pair proposed by the model, not yet verified against the catalog.
///
/// Both fields are required; a payload missing either does not parse.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateSuggestion {
    pub title: String,
    pub year: i32,
}

/// A candidate successfully matched to a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolvedSuggestion {
    pub title: String,
    pub year: i32,
    pub catalog_id: u64,
    pub poster_path: Option<String>,
    pub rating: f64,
}
