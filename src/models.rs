use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One submitted story. Field names follow the wire format (`storyId`,
/// `createdAt`), so the same struct is parsed straight out of API responses.
///
/// The client never invents a `story_id`; it is assigned by the service and
/// treated as the story's identity everywhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub story_id: String,
    pub title: String,
    pub author: String,
    pub url: String,
    /// Username of the submitter, not the article author.
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Story {
    /// Everything after the first `://` of the url, path and all
    /// (`https://example.com/a` gives `example.com/a`). `None` when the url
    /// carries no scheme delimiter; the UI skips the host chip in that case.
    pub fn host_name(&self) -> Option<&str> {
        self.url.split_once("://").map(|(_, rest)| rest)
    }
}

/// A story submission as composed in the submit form.
#[derive(Debug, Clone, Serialize)]
pub struct StoryDraft {
    pub title: String,
    pub author: String,
    pub url: String,
}

/// The shared, ordered collection of stories every visitor sees.
///
/// Order is whatever the service returned last, with newly submitted stories
/// prepended so the list stays most-recent-first. Uniqueness of `story_id`
/// is the server's concern; nothing here enforces it.
#[derive(Debug, Clone, Default)]
pub struct StoryList {
    stories: Vec<Story>,
}

impl StoryList {
    pub fn new(stories: Vec<Story>) -> Self {
        Self { stories }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Story> {
        self.stories.iter()
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }

    /// First story with this id, if the list currently holds it.
    pub fn find(&self, story_id: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.story_id == story_id)
    }

    pub fn prepend(&mut self, story: Story) {
        self.stories.insert(0, story);
    }

    /// Remove the first story with this id, returning it if it was present.
    pub fn remove(&mut self, story_id: &str) -> Option<Story> {
        let idx = self.stories.iter().position(|s| s.story_id == story_id)?;
        Some(self.stories.remove(idx))
    }
}

/// Wire shape of a user as embedded in signup/login/profile responses. The
/// service calls the authored list `stories`; locally it becomes
/// `own_stories`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub username: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub favorites: Vec<Story>,
    #[serde(default)]
    pub stories: Vec<Story>,
}

/// Token + username pair a mutating API call needs. Cloned out of the
/// session so background workers never borrow the `User`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub token: String,
    pub username: String,
}

/// The authenticated session's identity, its favorites, and its authored
/// stories. Only ever represents the current user.
#[derive(Debug, Clone)]
pub struct User {
    pub username: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// User-specific bookmarks; independent copies keyed by `story_id`.
    pub favorites: Vec<Story>,
    /// Stories this user submitted, most recent first.
    pub own_stories: Vec<Story>,
    /// Opaque credential required by every mutating call.
    pub token: String,
}

impl User {
    /// Build the session user from a wire record plus the issued (or stored)
    /// token.
    pub fn from_record(record: UserRecord, token: String) -> Self {
        Self {
            username: record.username,
            name: record.name,
            created_at: record.created_at,
            favorites: record.favorites,
            own_stories: record.stories,
            token,
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            token: self.token.clone(),
            username: self.username.clone(),
        }
    }

    pub fn is_favorite(&self, story_id: &str) -> bool {
        self.favorites.iter().any(|s| s.story_id == story_id)
    }

    pub fn add_favorite(&mut self, story: Story) {
        self.favorites.push(story);
    }

    /// Remove the first favorite with this id. An id that is not favorited
    /// removes nothing.
    pub fn remove_favorite(&mut self, story_id: &str) -> bool {
        match self.favorites.iter().position(|s| s.story_id == story_id) {
            Some(idx) => {
                self.favorites.remove(idx);
                true
            }
            None => false,
        }
    }

    /// A freshly submitted story goes to the front of the authored list,
    /// mirroring its position in the shared list.
    pub fn prepend_own_story(&mut self, story: Story) {
        self.own_stories.insert(0, story);
    }

    /// Drop a deleted story from the authored list and, if bookmarked, from
    /// the favorites as well.
    pub fn forget_story(&mut self, story_id: &str) {
        if let Some(idx) = self.own_stories.iter().position(|s| s.story_id == story_id) {
            self.own_stories.remove(idx);
        }
        self.remove_favorite(story_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str, url: &str) -> Story {
        Story {
            story_id: id.to_string(),
            title: format!("story {}", id),
            author: "Test Author".to_string(),
            url: url.to_string(),
            username: "poster".to_string(),
            created_at: "2024-01-15T10:12:45.001Z".parse().unwrap(),
        }
    }

    fn record(favorites: Vec<Story>, stories: Vec<Story>) -> UserRecord {
        UserRecord {
            username: "alice".to_string(),
            name: "Alice".to_string(),
            created_at: "2023-06-01T00:00:00.000Z".parse().unwrap(),
            favorites,
            stories,
        }
    }

    #[test]
    fn host_name_keeps_everything_after_the_scheme() {
        assert_eq!(
            story("s1", "https://example.com/a").host_name(),
            Some("example.com/a")
        );
        assert_eq!(
            story("s2", "http://news.example.org").host_name(),
            Some("news.example.org")
        );
        // Only the first delimiter splits.
        assert_eq!(
            story("s3", "https://example.com/x://y").host_name(),
            Some("example.com/x://y")
        );
    }

    #[test]
    fn host_name_without_scheme_is_none() {
        assert_eq!(story("s1", "example.com/a").host_name(), None);
        assert_eq!(story("s2", "").host_name(), None);
    }

    #[test]
    fn story_list_keeps_response_order() {
        let list = StoryList::new(vec![story("a", "https://a"), story("b", "https://b")]);
        assert_eq!(list.len(), 2);
        let ids: Vec<_> = list.iter().map(|s| s.story_id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn prepend_puts_the_new_story_first() {
        let mut list = StoryList::new(vec![story("old", "https://a")]);
        list.prepend(story("new", "https://b"));
        assert_eq!(list.iter().next().unwrap().story_id, "new");
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn find_and_remove_by_id() {
        let mut list = StoryList::new(vec![story("a", "https://a"), story("b", "https://b")]);
        assert!(list.find("b").is_some());
        assert!(list.find("zzz").is_none());

        let removed = list.remove("a").unwrap();
        assert_eq!(removed.story_id, "a");
        assert_eq!(list.len(), 1);
        assert!(list.remove("a").is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn user_record_stories_become_own_stories() {
        let user = User::from_record(
            record(vec![story("fav", "https://f")], vec![story("mine", "https://m")]),
            "tok-1".to_string(),
        );
        assert_eq!(user.token, "tok-1");
        assert_eq!(user.favorites.len(), 1);
        assert_eq!(user.own_stories.len(), 1);
        assert_eq!(user.own_stories[0].story_id, "mine");
        assert!(user.is_favorite("fav"));
        assert!(!user.is_favorite("mine"));
    }

    #[test]
    fn remove_favorite_on_absent_id_keeps_unrelated_entries() {
        let mut user =
            User::from_record(record(vec![story("fav", "https://f")], vec![]), "t".into());
        assert!(!user.remove_favorite("other"));
        assert_eq!(user.favorites.len(), 1);
        assert!(user.remove_favorite("fav"));
        assert!(user.favorites.is_empty());
    }

    #[test]
    fn forget_story_clears_both_collections() {
        let mut user = User::from_record(
            record(
                vec![story("s1", "https://a"), story("keep", "https://k")],
                vec![story("s1", "https://a")],
            ),
            "t".into(),
        );
        user.forget_story("s1");
        assert!(user.own_stories.is_empty());
        assert!(!user.is_favorite("s1"));
        assert!(user.is_favorite("keep"));
    }

    #[test]
    fn credentials_copy_token_and_username() {
        let user = User::from_record(record(vec![], vec![]), "tok-9".into());
        let creds = user.credentials();
        assert_eq!(creds.token, "tok-9");
        assert_eq!(creds.username, "alice");
    }
}
