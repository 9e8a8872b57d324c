use std::collections::HashSet;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::net::IpAddr;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

use crate::post::{BlogPost, PostId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    #[default]
    Like,
    Heart,
    Clap,
}

impl Display for ReactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReactionKind::Like => "like",
            ReactionKind::Heart => "heart",
            ReactionKind::Clap => "clap",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ReactionKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "like" => Ok(ReactionKind::Like),
            "heart" => Ok(ReactionKind::Heart),
            "clap" => Ok(ReactionKind::Clap),
            other => Err(anyhow!("Unknown reaction type: {}", other)),
        }
    }
}

/// Reactions left by visitors, at most one of each kind per address.
#[derive(Debug, Default)]
pub struct Reactions {
    given: HashSet<(PostId, IpAddr, ReactionKind)>,
}

impl Reactions {
    /// Adds the reaction, or removes it when the address already gave it.
    /// Every kind counts towards the post likes. Returns whether the
    /// reaction is present afterwards.
    pub fn toggle(&mut self, post: &mut BlogPost, address: IpAddr, kind: ReactionKind) -> bool {
        let key = (post.id, address, kind);
        if self.given.remove(&key) {
            post.likes = post.likes.saturating_sub(1);
            false
        } else {
            self.given.insert(key);
            post.likes = post.likes.saturating_add(1);
            true
        }
    }

    pub fn has_reacted(&self, post_id: &PostId, address: IpAddr, kind: ReactionKind) -> bool {
        self.given.contains(&(*post_id, address, kind))
    }

    pub fn count(&self, post_id: &PostId, kind: ReactionKind) -> usize {
        self.given.iter()
            .filter(|(id, _, k)| id == post_id && *k == kind)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn address(last: u8) -> IpAddr {
        IpAddr::from([192, 168, 0, last])
    }

    #[test]
    fn test_toggle() {
        let mut reactions = Reactions::default();
        let mut post = BlogPost::new("Post", "", "", Utc::now());

        assert!(reactions.toggle(&mut post, address(1), ReactionKind::Like));
        assert!(reactions.toggle(&mut post, address(1), ReactionKind::Clap));
        assert!(reactions.toggle(&mut post, address(2), ReactionKind::Like));
        assert_eq!(post.likes, 3);
        assert_eq!(reactions.count(&post.id, ReactionKind::Like), 2);

        assert!(!reactions.toggle(&mut post, address(1), ReactionKind::Like));
        assert_eq!(post.likes, 2);
        assert!(!reactions.has_reacted(&post.id, address(1), ReactionKind::Like));
        assert!(reactions.has_reacted(&post.id, address(1), ReactionKind::Clap));
    }

    #[test]
    fn test_likes_never_negative() {
        let mut reactions = Reactions::default();
        let mut post = BlogPost::new("Post", "", "", Utc::now());
        assert!(reactions.toggle(&mut post, address(1), ReactionKind::Heart));
        post.likes = 0;
        assert!(!reactions.toggle(&mut post, address(1), ReactionKind::Heart));
        assert_eq!(post.likes, 0);
    }

    #[test]
    fn test_likes_saturate() {
        let mut reactions = Reactions::default();
        let mut post = BlogPost::new("Post", "", "", Utc::now());
        post.likes = u32::MAX;
        assert!(reactions.toggle(&mut post, address(1), ReactionKind::Like));
        assert_eq!(post.likes, u32::MAX);
    }

    #[test]
    fn test_reaction_kind_names() {
        assert_eq!("Heart".parse::<ReactionKind>().unwrap(), ReactionKind::Heart);
        assert!("wow".parse::<ReactionKind>().is_err());
        assert_eq!(ReactionKind::Clap.to_string(), "clap");
        assert_eq!(serde_json::to_string(&ReactionKind::Like).unwrap(), "\"like\"");
    }
}
