use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Movie catalog (TMDB) API key
    pub tmdb_api_key: String,

    /// Movie catalog API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Movie catalog image CDN base URL
    #[serde(default = "default_tmdb_image_url")]
    pub tmdb_image_url: String,

    /// Backend-as-a-service (Appwrite-compatible) endpoint, including /v1
    pub backend_endpoint: String,

    /// Backend project identifier
    pub backend_project_id: String,

    /// Database holding the user collections
    pub backend_database_id: String,

    /// Collection for watchlist entries
    #[serde(default = "default_watchlist_collection")]
    pub watchlist_collection_id: String,

    /// Collection for avatar documents (userId, profileImageId, profileImageUrl)
    #[serde(default = "default_user_profiles_collection")]
    pub user_profiles_collection_id: String,

    /// Collection for contact documents (userId, fullName, phone)
    #[serde(default = "default_profiles_collection")]
    pub profiles_collection_id: String,

    /// Storage bucket for avatar images
    #[serde(default = "default_avatar_bucket")]
    pub avatar_bucket_id: String,

    /// LLM completion API key
    pub gemini_api_key: String,

    /// LLM completion endpoint (model-specific generateContent URL)
    #[serde(default = "default_gemini_api_url")]
    pub gemini_api_url: String,

    /// Quiet period for the live-search debounce, in milliseconds
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_tmdb_image_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_watchlist_collection() -> String {
    "saved_movies".to_string()
}

fn default_user_profiles_collection() -> String {
    "user_profiles".to_string()
}

fn default_profiles_collection() -> String {
    "profiles".to_string()
}

fn default_avatar_bucket() -> String {
    "avatars".to_string()
}

fn default_gemini_api_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        .to_string()
}

fn default_search_debounce_ms() -> u64 {
    300
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
