//! Profile service
//!
//! Registration chains the account, session, storage, and document calls the
//! signup flow needs; profile fetch joins the two per-user documents.
use crate::{
    error::{AppError, AppResult},
    models::Identity,
    services::session::{SessionProvider, SessionSecret},
    services::storage::FileStorage,
    services::store::{DocumentStore, Filter},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

const MIN_PASSWORD_LEN: usize = 8;

/// Avatar image supplied at registration
#[derive(Debug, Clone)]
pub struct Avatar {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<Avatar>,
}

/// Combined profile view for the authenticated user
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub join_date: Option<String>,
    pub favorite_genre: String,
}

pub struct ProfileService {
    sessions: Arc<dyn SessionProvider>,
    store: Arc<dyn DocumentStore>,
    storage: Arc<dyn FileStorage>,
    user_profiles_collection: String,
    profiles_collection: String,
}

impl ProfileService {
    pub fn new(
        sessions: Arc<dyn SessionProvider>,
        store: Arc<dyn DocumentStore>,
        storage: Arc<dyn FileStorage>,
        user_profiles_collection: String,
        profiles_collection: String,
    ) -> Self {
        Self {
            sessions,
            store,
            storage,
            user_profiles_collection,
            profiles_collection,
        }
    }

    /// Registers a new user: account, session, optional avatar upload, and
    /// the two profile documents.
    pub async fn register(
        &self,
        request: RegistrationRequest,
    ) -> AppResult<(Identity, SessionSecret)> {
        if request.password.len() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(
                "Password must be at least 8 characters long.".to_string(),
            ));
        }

        let identity = self
            .sessions
            .create_account(&request.email, &request.password, &request.name)
            .await?;
        let session = self
            .sessions
            .create_session(&request.email, &request.password)
            .await?;

        let (image_id, image_url) = match request.avatar {
            Some(avatar) => {
                let file_id = self
                    .storage
                    .create_file(&avatar.file_name, avatar.bytes)
                    .await?;
                let url = self.storage.view_url(&file_id);
                (file_id, url)
            }
            None => (String::new(), String::new()),
        };

        self.store
            .create(
                &self.user_profiles_collection,
                json!({
                    "userId": identity.id,
                    "profileImageId": image_id,
                    "profileImageUrl": image_url,
                }),
            )
            .await?;

        self.store
            .create(
                &self.profiles_collection,
                json!({
                    "userId": identity.id,
                    "fullName": request.name,
                    "phone": request.phone,
                }),
            )
            .await?;

        tracing::info!(user_id = %identity.id, "Registration completed");
        Ok((identity, session))
    }

    /// Fetches the combined profile for the given identity
    pub async fn fetch_profile(&self, identity: &Identity) -> AppResult<UserProfile> {
        let filters = [Filter::equal("userId", identity.id.as_str())];

        let (avatar_page, contact_page) = tokio::join!(
            self.store.list(&self.user_profiles_collection, &filters),
            self.store.list(&self.profiles_collection, &filters),
        );
        let avatar_page = avatar_page?;
        let contact_page = contact_page?;

        let (Some(avatar_doc), Some(contact_doc)) =
            (avatar_page.documents.first(), contact_page.documents.first())
        else {
            return Err(AppError::NotFound(
                "User profile not found in database.".to_string(),
            ));
        };

        let avatar_url = avatar_doc["profileImageUrl"]
            .as_str()
            .filter(|url| !url.is_empty())
            .map(str::to_string);

        let name = contact_doc["fullName"]
            .as_str()
            .map(str::to_string)
            .or_else(|| identity.name.clone())
            .unwrap_or_default();

        Ok(UserProfile {
            name,
            avatar_url,
            phone: contact_doc["phone"].as_str().map(str::to_string),
            join_date: identity.created_at.clone(),
            favorite_genre: contact_doc["favoriteGenre"]
                .as_str()
                .filter(|genre| !genre.is_empty())
                .unwrap_or("Not set")
                .to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session::MockSessionProvider;
    use crate::services::storage::MockFileStorage;
    use crate::services::store::{DocumentPage, MockDocumentStore};
    use mockall::predicate::eq;

    fn identity() -> Identity {
        Identity {
            id: "user_1".to_string(),
            email: Some("a@b.c".to_string()),
            name: Some("Asha".to_string()),
            created_at: Some("2025-01-02T03:04:05.000+00:00".to_string()),
        }
    }

    fn session_secret() -> SessionSecret {
        SessionSecret {
            id: "sess_1".to_string(),
            secret: "s3cret".to_string(),
            user_id: "user_1".to_string(),
        }
    }

    fn request(password: &str, avatar: Option<Avatar>) -> RegistrationRequest {
        RegistrationRequest {
            name: "Asha".to_string(),
            phone: "+91-99999".to_string(),
            email: "a@b.c".to_string(),
            password: password.to_string(),
            avatar,
        }
    }

    fn service(
        sessions: MockSessionProvider,
        store: MockDocumentStore,
        storage: MockFileStorage,
    ) -> ProfileService {
        ProfileService::new(
            Arc::new(sessions),
            Arc::new(store),
            Arc::new(storage),
            "user_profiles".to_string(),
            "profiles".to_string(),
        )
    }

    #[tokio::test]
    async fn test_register_without_avatar() {
        let mut sessions = MockSessionProvider::new();
        sessions
            .expect_create_account()
            .with(eq("a@b.c"), eq("password123"), eq("Asha"))
            .once()
            .returning(|_, _, _| Ok(identity()));
        sessions
            .expect_create_session()
            .once()
            .returning(|_, _| Ok(session_secret()));

        let mut store = MockDocumentStore::new();
        store
            .expect_create()
            .withf(|collection, data| {
                collection == "user_profiles"
                    && data["userId"] == "user_1"
                    && data["profileImageUrl"] == ""
            })
            .once()
            .returning(|_, data| Ok(data));
        store
            .expect_create()
            .withf(|collection, data| {
                collection == "profiles" && data["fullName"] == "Asha" && data["phone"] == "+91-99999"
            })
            .once()
            .returning(|_, data| Ok(data));

        let mut storage = MockFileStorage::new();
        storage.expect_create_file().never();

        let (registered, session) = service(sessions, store, storage)
            .register(request("password123", None))
            .await
            .unwrap();
        assert_eq!(registered.id, "user_1");
        assert_eq!(session.secret, "s3cret");
    }

    #[tokio::test]
    async fn test_register_uploads_avatar() {
        let mut sessions = MockSessionProvider::new();
        sessions
            .expect_create_account()
            .returning(|_, _, _| Ok(identity()));
        sessions
            .expect_create_session()
            .returning(|_, _| Ok(session_secret()));

        let mut storage = MockFileStorage::new();
        storage
            .expect_create_file()
            .with(eq("avatar.jpg"), eq(vec![1u8, 2, 3]))
            .once()
            .returning(|_, _| Ok("file_1".to_string()));
        storage
            .expect_view_url()
            .with(eq("file_1"))
            .returning(|id| format!("https://backend.example/files/{}/view", id));

        let mut store = MockDocumentStore::new();
        store
            .expect_create()
            .withf(|collection, data| {
                collection != "user_profiles"
                    || (data["profileImageId"] == "file_1"
                        && data["profileImageUrl"]
                            == "https://backend.example/files/file_1/view")
            })
            .times(2)
            .returning(|_, data| Ok(data));

        let avatar = Avatar {
            file_name: "avatar.jpg".to_string(),
            bytes: vec![1, 2, 3],
        };
        service(sessions, store, storage)
            .register(request("password123", Some(avatar)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_register_rejects_short_password() {
        let mut sessions = MockSessionProvider::new();
        sessions.expect_create_account().never();

        let result = service(sessions, MockDocumentStore::new(), MockFileStorage::new())
            .register(request("short", None))
            .await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_fetch_profile_combines_documents() {
        let mut store = MockDocumentStore::new();
        store
            .expect_list()
            .with(eq("user_profiles"), mockall::predicate::always())
            .returning(|_, _| {
                Ok(DocumentPage {
                    total: 1,
                    documents: vec![serde_json::json!({
                        "userId": "user_1",
                        "profileImageUrl": "https://backend.example/files/file_1/view"
                    })],
                })
            });
        store
            .expect_list()
            .with(eq("profiles"), mockall::predicate::always())
            .returning(|_, _| {
                Ok(DocumentPage {
                    total: 1,
                    documents: vec![serde_json::json!({
                        "userId": "user_1",
                        "fullName": "Asha Rao",
                        "phone": "+91-99999"
                    })],
                })
            });

        let profile = service(MockSessionProvider::new(), store, MockFileStorage::new())
            .fetch_profile(&identity())
            .await
            .unwrap();
        assert_eq!(profile.name, "Asha Rao");
        assert_eq!(profile.favorite_genre, "Not set");
        assert_eq!(
            profile.avatar_url.as_deref(),
            Some("https://backend.example/files/file_1/view")
        );
    }

    #[tokio::test]
    async fn test_fetch_profile_missing_document() {
        let mut store = MockDocumentStore::new();
        store.expect_list().times(2).returning(|_, _| {
            Ok(DocumentPage {
                total: 0,
                documents: vec![],
            })
        });

        let result = service(MockSessionProvider::new(), store, MockFileStorage::new())
            .fetch_profile(&identity())
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
