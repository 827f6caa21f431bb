//! HTTP wrapper around the Hack or Snooze REST API.
//!
//! One private `request` helper does the transport work; every endpoint
//! method maps a path and payload onto it and pulls out the slice of the
//! JSON response the client actually uses. Non-2xx statuses become
//! `ApiError` variants, and the three the UI interrupts the user for carry
//! their notification text. No retries, no per-request timeout beyond the
//! one configured on the client.

use reqwest::blocking::Client;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::models::{Credentials, Story, StoryDraft, User, UserRecord};

/// Errors from talking to the story service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP 401: the password was wrong.
    #[error("authentication rejected (401)")]
    Auth,

    /// HTTP 404: the username does not exist.
    #[error("unknown username (404)")]
    UnknownUsername,

    /// HTTP 409: the username is already registered.
    #[error("username already taken (409)")]
    UsernameTaken,

    /// Any other non-2xx status. Logged, never alerted.
    #[error("request failed with status {0}")]
    Status(u16),

    /// Connection, timeout, or body-decoding failure.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The service confirmed a favorite whose story is missing from the
    /// local list, so there is nothing to bookmark.
    #[error("story {0} is not in the current story list")]
    StoryNotFound(String),

    /// An authenticated command ran without a logged-in user.
    #[error("not logged in")]
    NotLoggedIn,
}

impl ApiError {
    /// Alert text for the cases the UI interrupts the user for; everything
    /// else only reaches the log.
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            ApiError::Auth => Some("Incorrect Password. Please try again"),
            ApiError::UnknownUsername => Some("Incorrect Username. Please try again"),
            ApiError::UsernameTaken => {
                Some("That username is already taken. Please choose another.")
            }
            _ => None,
        }
    }

    fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 => ApiError::Auth,
            404 => ApiError::UnknownUsername,
            409 => ApiError::UsernameTaken,
            code => ApiError::Status(code),
        }
    }
}

/// Client for the story service. Cheap to clone, so each worker thread takes
/// its own copy.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Self {
        let http = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("hack-or-snooze-reader/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: config.api_url.clone(),
        }
    }

    /// GET /stories. The full shared list, no auth required.
    pub fn stories(&self) -> Result<Vec<Story>, ApiError> {
        let body: StoriesResponse = self.request(Method::GET, "/stories", None, None)?;
        Ok(body.stories)
    }

    /// POST /stories. Submits a story on behalf of the logged-in user.
    pub fn create_story(&self, token: &str, draft: &StoryDraft) -> Result<Story, ApiError> {
        let payload = json!({ "token": token, "story": draft });
        let body: StoryResponse = self.request(Method::POST, "/stories", None, Some(&payload))?;
        Ok(body.story)
    }

    /// POST /signup. Registers a new account and logs it in.
    pub fn signup(&self, username: &str, password: &str, name: &str) -> Result<User, ApiError> {
        let payload = json!({
            "user": { "username": username, "password": password, "name": name }
        });
        let body: AuthResponse = self.request(Method::POST, "/signup", None, Some(&payload))?;
        Ok(User::from_record(body.user, body.token))
    }

    /// POST /login.
    pub fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let payload = json!({
            "user": { "username": username, "password": password }
        });
        let body: AuthResponse = self.request(Method::POST, "/login", None, Some(&payload))?;
        Ok(User::from_record(body.user, body.token))
    }

    /// GET /users/{username} with the token as a query parameter. Used to
    /// restore a stored session, which is why the token comes in from the
    /// caller instead of a response body.
    pub fn user(&self, token: &str, username: &str) -> Result<User, ApiError> {
        let path = format!("/users/{}", urlencoding::encode(username));
        let body: UserResponse =
            self.request(Method::GET, &path, Some(&[("token", token)]), None)?;
        Ok(User::from_record(body.user, token.to_string()))
    }

    /// POST /users/{username}/favorites/{storyId}.
    pub fn add_favorite(&self, auth: &Credentials, story_id: &str) -> Result<(), ApiError> {
        let path = favorite_path(&auth.username, story_id);
        let payload = json!({ "token": auth.token });
        let _: serde_json::Value = self.request(Method::POST, &path, None, Some(&payload))?;
        Ok(())
    }

    /// DELETE /users/{username}/favorites/{storyId}.
    pub fn remove_favorite(&self, auth: &Credentials, story_id: &str) -> Result<(), ApiError> {
        let path = favorite_path(&auth.username, story_id);
        let payload = json!({ "token": auth.token });
        let _: serde_json::Value = self.request(Method::DELETE, &path, None, Some(&payload))?;
        Ok(())
    }

    /// DELETE /stories/{storyId}. The service only honors this for the
    /// token owner's own story.
    pub fn delete_story(&self, token: &str, story_id: &str) -> Result<(), ApiError> {
        let path = format!("/stories/{}", urlencoding::encode(story_id));
        let payload = json!({ "token": token });
        let _: serde_json::Value = self.request(Method::DELETE, &path, None, Some(&payload))?;
        Ok(())
    }

    /// Single transport path: issue the request, map non-2xx statuses to the
    /// error taxonomy, parse the JSON body.
    fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Option<&[(&str, &str)]>,
        body: Option<&serde_json::Value>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method.clone(), &url);
        if let Some(query) = query {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        let response = req.send()?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%method, path, status = status.as_u16(), "api request failed");
            return Err(ApiError::from_status(status));
        }

        Ok(response.json()?)
    }
}

fn favorite_path(username: &str, story_id: &str) -> String {
    format!(
        "/users/{}/favorites/{}",
        urlencoding::encode(username),
        urlencoding::encode(story_id)
    )
}

#[derive(Debug, Deserialize)]
struct StoriesResponse {
    stories: Vec<Story>,
}

#[derive(Debug, Deserialize)]
struct StoryResponse {
    story: Story,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    user: UserRecord,
    token: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: UserRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trimmed capture of a real /stories response; extra fields such as
    // `updatedAt` must be tolerated.
    const STORIES_JSON: &str = r#"{
        "stories": [
            {
                "author": "Matt Lane",
                "createdAt": "2018-11-14T10:12:45.001Z",
                "storyId": "5d1a61f8-43a8-479f-aeb1-e7086b2832a9",
                "title": "Best rainbow spaghetti",
                "updatedAt": "2018-11-14T10:12:45.001Z",
                "url": "https://www.example.com/spaghetti",
                "username": "mlane"
            },
            {
                "author": "Whiskey",
                "createdAt": "2018-11-14T11:00:00.000Z",
                "storyId": "e80eicf1-8b03-4bd9-a1c9-cb32aca8c239",
                "title": "Tips for napping",
                "updatedAt": "2018-11-14T11:00:00.000Z",
                "url": "https://www.example.com/naps",
                "username": "whiskey"
            }
        ]
    }"#;

    const AUTH_JSON: &str = r#"{
        "token": "t1",
        "user": {
            "createdAt": "2018-11-14T10:12:45.001Z",
            "favorites": [],
            "name": "Alice A",
            "stories": [
                {
                    "author": "Alice A",
                    "createdAt": "2018-11-14T10:12:45.001Z",
                    "storyId": "s-own",
                    "title": "My story",
                    "url": "https://alice.example/post",
                    "username": "alice"
                }
            ],
            "username": "alice"
        }
    }"#;

    #[test]
    fn statuses_map_to_the_named_errors() {
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED),
            ApiError::Auth
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::NOT_FOUND),
            ApiError::UnknownUsername
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::CONFLICT),
            ApiError::UsernameTaken
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Status(500)
        ));
    }

    #[test]
    fn only_the_three_named_errors_alert_the_user() {
        assert_eq!(
            ApiError::Auth.user_message(),
            Some("Incorrect Password. Please try again")
        );
        assert_eq!(
            ApiError::UnknownUsername.user_message(),
            Some("Incorrect Username. Please try again")
        );
        assert_eq!(
            ApiError::UsernameTaken.user_message(),
            Some("That username is already taken. Please choose another.")
        );
        assert_eq!(ApiError::Status(500).user_message(), None);
        assert_eq!(ApiError::StoryNotFound("x".into()).user_message(), None);
        assert_eq!(ApiError::NotLoggedIn.user_message(), None);
    }

    #[test]
    fn stories_response_keeps_api_order() {
        let body: StoriesResponse = serde_json::from_str(STORIES_JSON).unwrap();
        assert_eq!(body.stories.len(), 2);
        assert_eq!(body.stories[0].title, "Best rainbow spaghetti");
        assert_eq!(body.stories[0].username, "mlane");
        assert_eq!(body.stories[1].story_id, "e80eicf1-8b03-4bd9-a1c9-cb32aca8c239");
        assert_eq!(
            body.stories[0].host_name(),
            Some("www.example.com/spaghetti")
        );
    }

    #[test]
    fn auth_response_yields_a_user_holding_the_issued_token() {
        let body: AuthResponse = serde_json::from_str(AUTH_JSON).unwrap();
        let user = User::from_record(body.user, body.token);
        assert_eq!(user.token, "t1");
        assert_eq!(user.username, "alice");
        assert!(user.favorites.is_empty());
        assert_eq!(user.own_stories[0].story_id, "s-own");
    }

    #[test]
    fn favorite_path_encodes_both_segments() {
        assert_eq!(
            favorite_path("user name", "id/1"),
            "/users/user%20name/favorites/id%2F1"
        );
        assert_eq!(favorite_path("alice", "s1"), "/users/alice/favorites/s1");
    }

    #[test]
    fn story_draft_serializes_to_the_wire_fields() {
        let draft = StoryDraft {
            title: "Title".to_string(),
            author: "Author".to_string(),
            url: "https://example.com".to_string(),
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            value,
            json!({ "title": "Title", "author": "Author", "url": "https://example.com" })
        );
    }
}
