//! Session state and the commands that change it.
//!
//! Remote work runs on a worker thread as a [`Command`]; the worker only
//! talks to the service and sends back an [`Outcome`]. The UI thread then
//! folds the outcome into the [`Session`] with [`Session::apply`], so the
//! story list and the logged-in user are never touched off the main thread.

use crate::api::{ApiClient, ApiError};
use crate::models::{Credentials, Story, StoryDraft, StoryList, User};

/// The client's in-memory state: the shared story list plus whoever is
/// logged in. `user` is `None` while browsing anonymously.
#[derive(Debug, Default)]
pub struct Session {
    pub story_list: StoryList,
    pub user: Option<User>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    /// Token and username for authenticated commands, if logged in.
    pub fn credentials(&self) -> Option<Credentials> {
        self.user.as_ref().map(|user| user.credentials())
    }

    /// Drop the logged-in user. The story list stays; it is shared state,
    /// not part of the account.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(username = %user.username, "logged out");
        }
    }

    /// Fold a completed command back into the session. Only the UI thread
    /// calls this.
    pub fn apply(&mut self, outcome: Outcome) -> Result<(), ApiError> {
        match outcome {
            Outcome::StoriesLoaded(stories) => {
                self.story_list = StoryList::new(stories);
            }
            Outcome::StoryPosted(story) => {
                // Two separate insertions: the shared list and the author's
                // own list each get their own copy.
                if let Some(user) = self.user.as_mut() {
                    user.prepend_own_story(story.clone());
                }
                self.story_list.prepend(story);
            }
            Outcome::FavoriteAdded(story_id) => {
                let user = self.user.as_mut().ok_or(ApiError::NotLoggedIn)?;
                let story = self
                    .story_list
                    .find(&story_id)
                    .cloned()
                    .ok_or_else(|| ApiError::StoryNotFound(story_id.clone()))?;
                user.add_favorite(story);
            }
            Outcome::FavoriteRemoved(story_id) => {
                if let Some(user) = self.user.as_mut() {
                    // Absent ids are a no-op.
                    user.remove_favorite(&story_id);
                }
            }
            Outcome::StoryDeleted(story_id) => {
                self.story_list.remove(&story_id);
                if let Some(user) = self.user.as_mut() {
                    user.forget_story(&story_id);
                }
            }
            Outcome::LoggedIn(user) => {
                tracing::info!(username = %user.username, "logged in");
                self.user = Some(user);
            }
            Outcome::SessionRestored(user) => {
                if let Some(user) = &user {
                    tracing::info!(username = %user.username, "session restored");
                }
                self.user = user;
            }
            Outcome::Failed(err) => return Err(err),
        }
        Ok(())
    }
}

/// A unit of remote work handed to a worker thread.
#[derive(Debug)]
pub enum Command {
    LoadStories,
    SubmitStory(StoryDraft),
    AddFavorite(String),
    RemoveFavorite(String),
    DeleteStory(String),
    Login { username: String, password: String },
    Signup { username: String, password: String, name: String },
    RestoreSession { token: String, username: String },
}

impl Command {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadStories => "load_stories",
            Command::SubmitStory(_) => "submit_story",
            Command::AddFavorite(_) => "add_favorite",
            Command::RemoveFavorite(_) => "remove_favorite",
            Command::DeleteStory(_) => "delete_story",
            Command::Login { .. } => "login",
            Command::Signup { .. } => "signup",
            Command::RestoreSession { .. } => "restore_session",
        }
    }

    /// Execute the remote half of the command. Runs on a worker thread and
    /// must not touch the session; everything it needs travels in `self`
    /// and `auth`.
    pub fn run(self, api: &ApiClient, auth: Option<&Credentials>) -> Outcome {
        match self {
            // A dead stored token is not worth an error; the client just
            // starts logged out, like a fresh install.
            Command::RestoreSession { token, username } => match api.user(&token, &username) {
                Ok(user) => Outcome::SessionRestored(Some(user)),
                Err(err) => {
                    tracing::warn!(%username, error = %err, "stored session restore failed");
                    Outcome::SessionRestored(None)
                }
            },
            other => match other.run_inner(api, auth) {
                Ok(outcome) => outcome,
                Err(err) => Outcome::Failed(err),
            },
        }
    }

    fn run_inner(self, api: &ApiClient, auth: Option<&Credentials>) -> Result<Outcome, ApiError> {
        match self {
            Command::LoadStories => Ok(Outcome::StoriesLoaded(api.stories()?)),
            Command::SubmitStory(draft) => {
                let auth = auth.ok_or(ApiError::NotLoggedIn)?;
                Ok(Outcome::StoryPosted(api.create_story(&auth.token, &draft)?))
            }
            Command::AddFavorite(story_id) => {
                let auth = auth.ok_or(ApiError::NotLoggedIn)?;
                api.add_favorite(auth, &story_id)?;
                Ok(Outcome::FavoriteAdded(story_id))
            }
            Command::RemoveFavorite(story_id) => {
                let auth = auth.ok_or(ApiError::NotLoggedIn)?;
                api.remove_favorite(auth, &story_id)?;
                Ok(Outcome::FavoriteRemoved(story_id))
            }
            Command::DeleteStory(story_id) => {
                let auth = auth.ok_or(ApiError::NotLoggedIn)?;
                api.delete_story(&auth.token, &story_id)?;
                Ok(Outcome::StoryDeleted(story_id))
            }
            Command::Login { username, password } => {
                Ok(Outcome::LoggedIn(api.login(&username, &password)?))
            }
            Command::Signup { username, password, name } => {
                Ok(Outcome::LoggedIn(api.signup(&username, &password, &name)?))
            }
            Command::RestoreSession { .. } => unreachable!("handled in run"),
        }
    }
}

/// Result of a completed command, sent back over the worker channel.
#[derive(Debug)]
pub enum Outcome {
    StoriesLoaded(Vec<Story>),
    StoryPosted(Story),
    FavoriteAdded(String),
    FavoriteRemoved(String),
    StoryDeleted(String),
    LoggedIn(User),
    SessionRestored(Option<User>),
    Failed(ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::time::Duration;

    // Nothing listens on port 1, so every request fails at the transport.
    fn unreachable_api() -> ApiClient {
        let config = Config {
            api_url: "http://127.0.0.1:1".to_string(),
            http_timeout: Duration::from_secs(5),
        };
        ApiClient::new(&config)
    }

    fn story(id: &str, username: &str) -> Story {
        Story {
            story_id: id.to_string(),
            title: format!("Story {id}"),
            author: "Author".to_string(),
            url: format!("https://example.com/{id}"),
            username: username.to_string(),
            created_at: "2020-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    fn user(name: &str) -> User {
        User {
            username: name.to_string(),
            name: name.to_string(),
            created_at: "2020-01-01T00:00:00Z".parse().unwrap(),
            favorites: Vec::new(),
            own_stories: Vec::new(),
            token: "tok".to_string(),
        }
    }

    fn logged_in_session() -> Session {
        let mut session = Session::default();
        session.story_list = StoryList::new(vec![story("s1", "alice"), story("s2", "bob")]);
        session.user = Some(user("alice"));
        session
    }

    #[test]
    fn loaded_stories_replace_the_list() {
        let mut session = logged_in_session();
        session
            .apply(Outcome::StoriesLoaded(vec![story("s9", "carol")]))
            .unwrap();
        assert_eq!(session.story_list.len(), 1);
        assert!(session.story_list.find("s9").is_some());
        assert!(session.story_list.find("s1").is_none());
    }

    #[test]
    fn posted_story_leads_both_lists() {
        let mut session = logged_in_session();
        session
            .apply(Outcome::StoryPosted(story("s3", "alice")))
            .unwrap();

        let first = session.story_list.iter().next().unwrap();
        assert_eq!(first.story_id, "s3");
        let user = session.user.as_ref().unwrap();
        assert_eq!(user.own_stories[0].story_id, "s3");
        assert_eq!(session.story_list.len(), 3);
    }

    #[test]
    fn posted_story_without_login_still_updates_the_shared_list() {
        let mut session = Session::default();
        session.story_list = StoryList::new(vec![story("s1", "alice")]);
        session
            .apply(Outcome::StoryPosted(story("s3", "alice")))
            .unwrap();
        assert_eq!(session.story_list.len(), 2);
    }

    #[test]
    fn blank_draft_still_goes_to_the_wire() {
        let api = unreachable_api();
        let auth = Credentials {
            token: "tok".to_string(),
            username: "alice".to_string(),
        };
        let draft = StoryDraft {
            title: String::new(),
            author: String::new(),
            url: String::new(),
        };

        // Empty fields are the service's problem; the client sends them and
        // the attempt fails at the transport, not at some local check.
        assert!(matches!(
            Command::SubmitStory(draft).run(&api, Some(&auth)),
            Outcome::Failed(ApiError::Transport(_))
        ));
    }

    #[test]
    fn favorite_add_then_remove_round_trips() {
        let mut session = logged_in_session();
        session
            .apply(Outcome::FavoriteAdded("s2".to_string()))
            .unwrap();
        assert!(session.user.as_ref().unwrap().is_favorite("s2"));

        session
            .apply(Outcome::FavoriteRemoved("s2".to_string()))
            .unwrap();
        assert!(!session.user.as_ref().unwrap().is_favorite("s2"));
    }

    #[test]
    fn favorite_add_requires_the_story_to_be_listed() {
        let mut session = logged_in_session();
        let err = session
            .apply(Outcome::FavoriteAdded("missing".to_string()))
            .unwrap_err();
        assert!(matches!(err, ApiError::StoryNotFound(id) if id == "missing"));
        assert!(session.user.as_ref().unwrap().favorites.is_empty());
    }

    #[test]
    fn favorite_remove_of_absent_id_keeps_other_favorites() {
        let mut session = logged_in_session();
        session
            .apply(Outcome::FavoriteAdded("s1".to_string()))
            .unwrap();
        session
            .apply(Outcome::FavoriteRemoved("never-favorited".to_string()))
            .unwrap();
        assert!(session.user.as_ref().unwrap().is_favorite("s1"));
    }

    #[test]
    fn deleted_story_disappears_everywhere() {
        let mut session = logged_in_session();
        session
            .apply(Outcome::StoryPosted(story("s3", "alice")))
            .unwrap();
        session
            .apply(Outcome::FavoriteAdded("s3".to_string()))
            .unwrap();

        session
            .apply(Outcome::StoryDeleted("s3".to_string()))
            .unwrap();

        assert!(session.story_list.find("s3").is_none());
        let user = session.user.as_ref().unwrap();
        assert!(!user.is_favorite("s3"));
        assert!(user.own_stories.iter().all(|s| s.story_id != "s3"));
    }

    #[test]
    fn failed_restore_leaves_the_session_anonymous() {
        let mut session = Session::default();
        session.apply(Outcome::SessionRestored(None)).unwrap();
        assert!(!session.is_logged_in());
    }

    #[test]
    fn restore_against_a_dead_service_comes_back_anonymous() {
        let api = unreachable_api();
        let restore = Command::RestoreSession {
            token: "tok".to_string(),
            username: "alice".to_string(),
        };
        assert!(matches!(
            restore.run(&api, None),
            Outcome::SessionRestored(None)
        ));

        // Any other command reports the same failure instead of hiding it.
        assert!(matches!(
            Command::LoadStories.run(&api, None),
            Outcome::Failed(ApiError::Transport(_))
        ));
    }

    #[test]
    fn restored_user_is_installed() {
        let mut session = Session::default();
        session
            .apply(Outcome::SessionRestored(Some(user("alice"))))
            .unwrap();
        assert!(session.is_logged_in());
        assert_eq!(session.credentials().unwrap().username, "alice");
    }

    #[test]
    fn logout_keeps_the_story_list() {
        let mut session = logged_in_session();
        session.logout();
        assert!(!session.is_logged_in());
        assert!(session.credentials().is_none());
        assert_eq!(session.story_list.len(), 2);
    }

    #[test]
    fn failed_outcome_surfaces_the_error() {
        let mut session = Session::default();
        let err = session.apply(Outcome::Failed(ApiError::Status(500))).unwrap_err();
        assert!(matches!(err, ApiError::Status(500)));
    }
}
