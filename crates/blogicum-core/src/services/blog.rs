//! Posts, comments and the listings that show them.

use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    Category, Comment, CommentDraft, CommentView, Location, Page, PageRequest, Post, PostDetail,
    PostDraft, PostQuery, PostSummary, User, ValidationErrors, is_visible_to,
};
use crate::error::DomainError;

use super::Repositories;

type Result<T> = std::result::Result<T, DomainError>;

/// Blog use cases: listings, post and comment CRUD with author checks.
pub struct BlogService {
    repos: Repositories,
    per_page: u64,
}

// Per-request memo so a listing does not fetch the same author twice.
#[derive(Default)]
struct Lookup {
    authors: HashMap<Uuid, String>,
    categories: HashMap<Uuid, Option<Category>>,
    locations: HashMap<Uuid, Option<Location>>,
}

impl BlogService {
    pub fn new(repos: Repositories, per_page: u64) -> Self {
        Self {
            repos,
            per_page: per_page.max(1),
        }
    }

    /// Publicly visible posts, newest first.
    pub async fn index(&self, page: u64) -> Result<Page<PostSummary>> {
        self.listing(&PostQuery::public(Utc::now()), page).await
    }

    /// Publicly visible posts of a published category.
    pub async fn category_posts(&self, slug: &str, page: u64) -> Result<(Category, Page<PostSummary>)> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| DomainError::not_found("category", slug))?;

        let query = PostQuery::public(Utc::now()).in_category(category.id);
        let posts = self.listing(&query, page).await?;
        Ok((category, posts))
    }

    /// A user's posts. The owner sees everything, others only public posts.
    pub async fn profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        page: u64,
    ) -> Result<(User, Page<PostSummary>)> {
        let user = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))?;

        let query = if viewer == Some(user.id) {
            PostQuery::by_author(user.id)
        } else {
            PostQuery::public(Utc::now()).and_author(user.id)
        };
        let posts = self.listing(&query, page).await?;
        Ok((user, posts))
    }

    /// A single post with its comments.
    ///
    /// Hidden posts are reported as missing to anyone but their author.
    pub async fn post_detail(&self, post_id: Uuid, viewer: Option<Uuid>) -> Result<PostDetail> {
        let post = self.visible_post(post_id, viewer).await?;
        let comments = self.repos.comments.list_for_post(post_id).await?;

        let mut lookup = Lookup::default();
        let summary = self
            .summarize(post, comments.len() as u64, &mut lookup)
            .await?;

        let mut views = Vec::with_capacity(comments.len());
        for comment in comments {
            let author = self.author_name(comment.author_id, &mut lookup).await?;
            views.push(CommentView { comment, author });
        }

        Ok(PostDetail {
            summary,
            comments: views,
        })
    }

    pub async fn post_for_edit(&self, post_id: Uuid, viewer: Uuid) -> Result<Post> {
        self.owned_post(post_id, viewer).await
    }

    pub async fn create_post(&self, author_id: Uuid, draft: PostDraft) -> Result<Post> {
        draft.validate()?;
        self.check_references(&draft).await?;

        let post = self.repos.posts.create(Post::new(author_id, draft)).await?;
        tracing::info!(post_id = %post.id, author_id = %author_id, "Post created");
        Ok(post)
    }

    pub async fn update_post(&self, post_id: Uuid, viewer: Uuid, draft: PostDraft) -> Result<Post> {
        let mut post = self.owned_post(post_id, viewer).await?;
        draft.validate()?;
        self.check_references(&draft).await?;

        post.apply(draft);
        let post = self.repos.posts.update(post).await?;
        tracing::info!(post_id = %post.id, "Post updated");
        Ok(post)
    }

    pub async fn delete_post(&self, post_id: Uuid, viewer: Uuid) -> Result<()> {
        let post = self.owned_post(post_id, viewer).await?;
        self.repos.posts.delete(post.id).await?;
        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    /// Comment on a post the commenter can see.
    pub async fn add_comment(&self, post_id: Uuid, author_id: Uuid, draft: CommentDraft) -> Result<Comment> {
        self.visible_post(post_id, Some(author_id)).await?;
        draft.validate()?;

        let comment = self
            .repos
            .comments
            .create(Comment::new(post_id, author_id, draft))
            .await?;
        tracing::info!(post_id = %post_id, comment_id = %comment.id, "Comment added");
        Ok(comment)
    }

    pub async fn comment_for_edit(&self, post_id: Uuid, comment_id: Uuid, viewer: Uuid) -> Result<Comment> {
        self.owned_comment(post_id, comment_id, viewer).await
    }

    pub async fn update_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        viewer: Uuid,
        draft: CommentDraft,
    ) -> Result<Comment> {
        let mut comment = self.owned_comment(post_id, comment_id, viewer).await?;
        draft.validate()?;

        comment.text = draft.text;
        Ok(self.repos.comments.update(comment).await?)
    }

    pub async fn delete_comment(&self, post_id: Uuid, comment_id: Uuid, viewer: Uuid) -> Result<()> {
        let comment = self.owned_comment(post_id, comment_id, viewer).await?;
        self.repos.comments.delete(comment.id).await?;
        tracing::info!(post_id = %post_id, comment_id = %comment_id, "Comment deleted");
        Ok(())
    }

    /// Choices for the category and location selects of the post form.
    pub async fn publishing_options(&self) -> Result<(Vec<Category>, Vec<Location>)> {
        let categories = self.repos.categories.list_published().await?;
        let locations = self.repos.locations.list_published().await?;
        Ok((categories, locations))
    }

    async fn listing(&self, query: &PostQuery, page: u64) -> Result<Page<PostSummary>> {
        let mut posts = self
            .repos
            .posts
            .list(query, PageRequest::new(page, self.per_page))
            .await?;
        if !posts.exists() {
            return Err(DomainError::not_found("page", page));
        }

        let items = std::mem::take(&mut posts.items);
        let ids: Vec<Uuid> = items.iter().map(|p| p.id).collect();
        let counts = self.repos.comments.count_for_posts(&ids).await?;

        let mut lookup = Lookup::default();
        let mut summaries = Vec::with_capacity(items.len());
        for post in items {
            let count = counts.get(&post.id).copied().unwrap_or(0);
            summaries.push(self.summarize(post, count, &mut lookup).await?);
        }

        Ok(posts.with_items(summaries))
    }

    async fn summarize(&self, post: Post, comment_count: u64, lookup: &mut Lookup) -> Result<PostSummary> {
        let author = self.author_name(post.author_id, lookup).await?;
        let category = match post.category_id {
            Some(id) => self.category(id, lookup).await?,
            None => None,
        };
        let location = match post.location_id {
            Some(id) => self.location(id, lookup).await?,
            None => None,
        };

        Ok(PostSummary {
            post,
            author,
            category,
            location,
            comment_count,
        })
    }

    async fn author_name(&self, id: Uuid, lookup: &mut Lookup) -> Result<String> {
        if let Some(name) = lookup.authors.get(&id) {
            return Ok(name.clone());
        }
        let name = self
            .repos
            .users
            .find_by_id(id)
            .await?
            .map(|u| u.username)
            .unwrap_or_default();
        lookup.authors.insert(id, name.clone());
        Ok(name)
    }

    async fn category(&self, id: Uuid, lookup: &mut Lookup) -> Result<Option<Category>> {
        if let Some(category) = lookup.categories.get(&id) {
            return Ok(category.clone());
        }
        let category = self.repos.categories.find_by_id(id).await?;
        lookup.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn location(&self, id: Uuid, lookup: &mut Lookup) -> Result<Option<Location>> {
        if let Some(location) = lookup.locations.get(&id) {
            return Ok(location.clone());
        }
        let location = self.repos.locations.find_by_id(id).await?;
        lookup.locations.insert(id, location.clone());
        Ok(location)
    }

    async fn find_post(&self, post_id: Uuid) -> Result<Post> {
        self.repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_id))
    }

    async fn visible_post(&self, post_id: Uuid, viewer: Option<Uuid>) -> Result<Post> {
        let post = self.find_post(post_id).await?;
        let category = match post.category_id {
            Some(id) => self.repos.categories.find_by_id(id).await?,
            None => None,
        };

        if is_visible_to(&post, category.as_ref(), viewer, Utc::now()) {
            Ok(post)
        } else {
            Err(DomainError::not_found("post", post_id))
        }
    }

    async fn owned_post(&self, post_id: Uuid, viewer: Uuid) -> Result<Post> {
        let post = self.find_post(post_id).await?;
        if !post.is_authored_by(viewer) {
            tracing::warn!(post_id = %post_id, user_id = %viewer, "Rejected change to another user's post");
            return Err(DomainError::Forbidden("post"));
        }
        Ok(post)
    }

    async fn owned_comment(&self, post_id: Uuid, comment_id: Uuid, viewer: Uuid) -> Result<Comment> {
        self.find_post(post_id).await?;
        let comment = self
            .repos
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| DomainError::not_found("comment", comment_id))?;

        if !comment.is_authored_by(viewer) {
            tracing::warn!(comment_id = %comment_id, user_id = %viewer, "Rejected change to another user's comment");
            return Err(DomainError::Forbidden("comment"));
        }
        Ok(comment)
    }

    async fn check_references(&self, draft: &PostDraft) -> Result<()> {
        let mut errors = ValidationErrors::new();
        if let Some(id) = draft.category_id {
            if self.repos.categories.find_by_id(id).await?.is_none() {
                errors.add("category", "Select a valid choice.");
            }
        }
        if let Some(id) = draft.location_id {
            if self.repos.locations.find_by_id(id).await?.is_none() {
                errors.add("location", "Select a valid choice.");
            }
        }
        Ok(errors.into_result()?)
    }
}
