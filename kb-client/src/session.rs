use crate::backend::HTTP_CLIENT;
use crate::config::Config;
use crate::errors::{EditorError, EditorResult};
use kb::basic_models::Profile;
use serde::Deserialize;
use tokio::sync::watch;

/// The authenticated principal, resolved once from the auth service and then
/// passed explicitly into whatever needs it. Profile fields are typed rather
/// than read out of a free-form metadata bag.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub profile: Profile,
}

/// Wire shape of the auth service's user object. Only the parts the client
/// reads; the metadata object maps straight onto [`Profile`].
#[derive(Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Profile,
}

/// Client for the auth service: resolves the current session and writes
/// profile changes back through typed accessors.
#[derive(Clone)]
pub struct AuthClient {
    base: String,
    anon_key: String,
    access_token: String,
}

impl AuthClient {
    pub fn new(config: &Config) -> Self {
        Self {
            base: config.backend_url.clone(),
            anon_key: config.anon_key.clone(),
            access_token: config.access_token.clone(),
        }
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.access_token))
    }

    /// Resolve the configured access token to a session. An invalid or
    /// expired token surfaces as a backend error with the service's message.
    pub async fn fetch_session(&self) -> EditorResult<Session> {
        let url = format!("{}/auth/v1/user", self.base);
        let response = self
            .authed(HTTP_CLIENT.get(&url))
            .send()
            .await
            .map_err(|e| EditorError::backend(e.to_string()))?;
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EditorError::backend(if message.is_empty() {
                "User not authenticated".to_string()
            } else {
                message
            }));
        }
        let user: AuthUser = response
            .json()
            .await
            .map_err(|e| EditorError::backend(e.to_string()))?;
        Ok(Session {
            user_id: user.id,
            email: user.email.unwrap_or_default(),
            profile: user.user_metadata,
        })
    }

    /// Store the profile fields on the auth principal. Only the fields that
    /// are `Some` are sent, so an unset field is left alone rather than
    /// erased.
    pub async fn update_profile(&self, profile: &Profile) -> EditorResult<()> {
        let url = format!("{}/auth/v1/user", self.base);
        let body = serde_json::json!({ "data": profile });
        let response = self
            .authed(HTTP_CLIENT.put(&url).json(&body))
            .send()
            .await
            .map_err(|e| EditorError::backend(e.to_string()))?;
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(EditorError::backend(if message.is_empty() {
                "Failed to update profile".to_string()
            } else {
                message
            }));
        }
        Ok(())
    }
}

/// Holds the current session behind a watch channel, giving every consumer
/// one subscription point for session changes instead of each of them
/// re-reading global state.
pub struct SessionStore {
    tx: watch::Sender<Option<Session>>,
}

impl SessionStore {
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Replace the session, notifying all subscribers. `None` means signed out.
    pub fn set(&self, session: Option<Session>) {
        // send_replace never fails even with no receivers.
        self.tx.send_replace(session);
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user_id: &str) -> Session {
        Session {
            user_id: user_id.into(),
            email: format!("{user_id}@example.com"),
            profile: Profile::default(),
        }
    }

    #[tokio::test]
    async fn subscribers_see_session_changes() {
        let store = SessionStore::new(None);
        let mut rx = store.subscribe();
        assert_eq!(store.current(), None);

        store.set(Some(session("u1")));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().unwrap().user_id, "u1");

        store.set(None);
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }

    #[test]
    fn auth_user_payload_maps_onto_typed_profile() {
        let raw = r#"{
            "id": "u1",
            "email": "u1@example.com",
            "user_metadata": {
                "username": "cook",
                "avatar_url": "https://example.com/a.png",
                "unrelated_key": true
            }
        }"#;
        let user: AuthUser = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id, "u1");
        assert_eq!(user.user_metadata.username.as_deref(), Some("cook"));
        assert_eq!(user.user_metadata.first_name, None);
    }
}
