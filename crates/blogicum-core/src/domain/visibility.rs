//! Who may see which post, and when.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Category, Post};

/// A post is public once it is published, its date has passed, and it sits in
/// a published category. Posts without a category are never public.
pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published && post.pub_date <= now && category.is_some_and(|c| c.is_published)
}

/// Authors always see their own posts.
pub fn is_visible_to(
    post: &Post,
    category: Option<&Category>,
    viewer: Option<Uuid>,
    now: DateTime<Utc>,
) -> bool {
    viewer.is_some_and(|id| post.is_authored_by(id)) || is_publicly_visible(post, category, now)
}

/// Filter for post listings.
///
/// Repositories order results by `pub_date`, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    /// When set, only posts publicly visible at this instant are returned.
    pub visible_at: Option<DateTime<Utc>>,
}

impl PostQuery {
    /// Every post visible to the public at `now`.
    pub fn public(now: DateTime<Utc>) -> Self {
        Self {
            visible_at: Some(now),
            ..Self::default()
        }
    }

    /// Every post by `author_id`, hidden or not.
    pub fn by_author(author_id: Uuid) -> Self {
        Self {
            author_id: Some(author_id),
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn and_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    /// In-process evaluation of the filter, used by the in-memory store.
    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        if self.author_id.is_some_and(|id| post.author_id != id) {
            return false;
        }
        if self.category_id.is_some_and(|id| post.category_id != Some(id)) {
            return false;
        }
        match self.visible_at {
            Some(now) => is_publicly_visible(post, category, now),
            None => true,
        }
    }
}
