use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::post::{BlogPost, PostId};

/// Snapshot of a post taken on request of an editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftVersion {
    pub post_id: PostId,
    pub user: String,
    pub title: String,
    pub description: String,
    pub content: String,
    /// Starts at 1 for every post
    pub version_number: u32,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct DraftHistory {
    versions: Vec<DraftVersion>,
}

impl DraftHistory {
    /// Stores a snapshot of the post under the next version number and
    /// returns a copy of it.
    pub fn create(&mut self, post: &BlogPost, user: &str, notes: &str, now: DateTime<Utc>) -> DraftVersion {
        let version_number = self.latest(&post.id).map_or(1, |v| v.version_number + 1);

        let draft = DraftVersion {
            post_id: post.id,
            user: user.to_string(),
            title: post.title.clone(),
            description: post.description.clone(),
            content: post.content.clone(),
            version_number,
            notes: notes.to_string(),
            created_at: now,
        };
        self.versions.push(draft.clone());
        draft
    }

    pub fn latest(&self, post_id: &PostId) -> Option<&DraftVersion> {
        self.versions.iter()
            .filter(|v| &v.post_id == post_id)
            .max_by_key(|v| v.version_number)
    }

    pub fn get(&self, post_id: &PostId, version_number: u32) -> Option<&DraftVersion> {
        self.versions.iter()
            .find(|v| &v.post_id == post_id && v.version_number == version_number)
    }

    /// Newest first
    pub fn versions(&self, post_id: &PostId) -> Vec<&DraftVersion> {
        let mut versions: Vec<&DraftVersion> = self.versions.iter()
            .filter(|v| &v.post_id == post_id)
            .collect();
        versions.sort_by(|a, b| b.version_number.cmp(&a.version_number));
        versions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutoSave {
    pub post_id: PostId,
    pub user: String,
    pub title: String,
    pub description: String,
    pub content: String,
    pub last_modified: DateTime<Utc>,
}

/// Editor autosaves, one per post and user. Saving again overwrites.
#[derive(Debug, Default)]
pub struct AutoSaves {
    saves: HashMap<(PostId, String), AutoSave>,
}

impl AutoSaves {
    pub fn save(&mut self,
                post_id: &PostId,
                user: &str,
                title: &str,
                description: &str,
                content: &str,
                now: DateTime<Utc>) -> &AutoSave {
        let save = self.saves.entry((*post_id, user.to_string()))
            .or_insert_with(|| AutoSave {
                post_id: *post_id,
                user: user.to_string(),
                title: String::new(),
                description: String::new(),
                content: String::new(),
                last_modified: now,
            });

        save.title = title.to_string();
        save.description = description.to_string();
        save.content = content.to_string();
        save.last_modified = now;
        save
    }

    pub fn get(&self, post_id: &PostId, user: &str) -> Option<&AutoSave> {
        self.saves.get(&(*post_id, user.to_string()))
    }

    /// Drops the autosave once the post itself has been stored.
    pub fn discard(&mut self, post_id: &PostId, user: &str) -> Option<AutoSave> {
        self.saves.remove(&(*post_id, user.to_string()))
    }

    pub fn len(&self) -> usize {
        self.saves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saves.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_draft_versions_increase_per_post() {
        let mut history = DraftHistory::default();
        let mut first = BlogPost::new("First post", "", "<p>v1</p>", now());
        let second = BlogPost::new("Second post", "", "<p>other</p>", now());

        assert_eq!(history.create(&first, "editor", "initial", now()).version_number, 1);
        first.content = "<p>v2</p>".to_string();
        assert_eq!(history.create(&first, "editor", "", now()).version_number, 2);
        assert_eq!(history.create(&second, "editor", "", now()).version_number, 1);

        let versions: Vec<u32> = history.versions(&first.id).iter().map(|v| v.version_number).collect();
        assert_eq!(versions, [2, 1]);
        assert_eq!(history.get(&first.id, 1).map(|v| v.content.as_str()), Some("<p>v1</p>"));
        assert_eq!(history.latest(&first.id).map(|v| v.content.as_str()), Some("<p>v2</p>"));
        assert!(history.get(&first.id, 3).is_none());
        assert_eq!(history.versions(&second.id).len(), 1);
    }

    #[test]
    fn test_restore_round_trip() {
        let mut history = DraftHistory::default();
        let mut post = BlogPost::new("Original", "desc", "<p>original</p>", now());
        let draft = history.create(&post, "editor", "", now());

        post.title = "Changed".to_string();
        post.content = "<p>changed</p>".to_string();
        post.restore_from_draft(&draft);
        assert_eq!(post.title, "Original");
        assert_eq!(post.content, "<p>original</p>");
    }

    #[test]
    fn test_one_autosave_per_post_and_user() {
        let mut saves = AutoSaves::default();
        let post = BlogPost::new("Post", "", "", now());
        let later = now() + Duration::minutes(1);

        saves.save(&post.id, "alice", "T1", "D1", "<p>1</p>", now());
        let save = saves.save(&post.id, "alice", "T2", "D2", "<p>2</p>", later);
        assert_eq!(save.content, "<p>2</p>");
        assert_eq!(save.last_modified, later);
        saves.save(&post.id, "bob", "T", "D", "<p>b</p>", now());

        assert_eq!(saves.len(), 2);
        assert_eq!(saves.get(&post.id, "alice").map(|s| s.title.as_str()), Some("T2"));
        assert!(saves.discard(&post.id, "alice").is_some());
        assert!(saves.get(&post.id, "alice").is_none());
        assert_eq!(saves.len(), 1);
    }
}
