//! In-memory repositories - used when no database is configured, and in tests.
//!
//! Mirrors the relational schema closely enough for the services: unique
//! usernames and slugs, cascading comment deletion, nulled references when a
//! category or location goes away. Data is lost on process restart.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blogicum_core::domain::{Category, Comment, Location, Page, PageRequest, Post, PostQuery, User};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PostRepository,
    UserRepository,
};
use blogicum_core::services::Repositories;


/// A row type stored in [`InMemoryDatabase`].
#[async_trait]
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    fn table(db: &InMemoryDatabase) -> &Table<Self>;

    /// Whether two distinct rows violate a unique constraint.
    fn conflicts_with(&self, _other: &Self) -> bool {
        false
    }

    /// Referential actions run after a row is deleted.
    async fn on_delete(_db: &InMemoryDatabase, _id: Uuid) {}
}

/// One table: rows keyed by primary key behind an async lock.
pub struct Table<T> {
    rows: RwLock<HashMap<Uuid, T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Clone> Table<T> {
    async fn get(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    async fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.rows.read().await.values().find(|r| predicate(r)).cloned()
    }

    async fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows
            .read()
            .await
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }
}

/// The whole in-memory store.
#[derive(Default)]
pub struct InMemoryDatabase {
    users: Table<User>,
    posts: Table<Post>,
    comments: Table<Comment>,
    categories: Table<Category>,
    locations: Table<Location>,
}

impl InMemoryDatabase {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Repositories sharing this store.
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: Arc::new(InMemoryRepository::<User>::new(self.clone())),
            posts: Arc::new(InMemoryRepository::<Post>::new(self.clone())),
            comments: Arc::new(InMemoryRepository::<Comment>::new(self.clone())),
            categories: Arc::new(InMemoryRepository::<Category>::new(self.clone())),
            locations: Arc::new(InMemoryRepository::<Location>::new(self.clone())),
        }
    }

    /// Insert or replace a row directly, bypassing constraint checks.
    pub async fn put<T: Record>(&self, record: T) {
        T::table(self).rows.write().await.insert(record.id(), record);
    }
}

/// Generic in-memory repository over one table.
pub struct InMemoryRepository<T> {
    db: Arc<InMemoryDatabase>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new(db: Arc<InMemoryDatabase>) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    fn table(&self) -> &Table<T> {
        T::table(&self.db)
    }
}

fn check_unique<T: Record>(rows: &HashMap<Uuid, T>, entity: &T) -> Result<(), RepoError> {
    let clash = rows
        .values()
        .any(|other| other.id() != entity.id() && entity.conflicts_with(other));
    if clash {
        return Err(RepoError::Constraint("Entity already exists".to_string()));
    }
    Ok(())
}

#[async_trait]
impl<T: Record> BaseRepository<T, Uuid> for InMemoryRepository<T> {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<T>, RepoError> {
        Ok(self.table().get(id).await)
    }

    async fn create(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.table().rows.write().await;
        if rows.contains_key(&entity.id()) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }
        check_unique(&rows, &entity)?;
        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepoError> {
        let mut rows = self.table().rows.write().await;
        if !rows.contains_key(&entity.id()) {
            return Err(RepoError::NotFound);
        }
        check_unique(&rows, &entity)?;
        rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let removed = self.table().rows.write().await.remove(&id);
        if removed.is_none() {
            return Err(RepoError::NotFound);
        }
        T::on_delete(&self.db, id).await;
        Ok(())
    }
}

#[async_trait]
impl Record for User {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(db: &InMemoryDatabase) -> &Table<Self> {
        &db.users
    }

    fn conflicts_with(&self, other: &Self) -> bool {
        self.username == other.username
    }

    async fn on_delete(db: &InMemoryDatabase, id: Uuid) {
        let removed: Vec<Uuid> = {
            let mut posts = db.posts.rows.write().await;
            let ids = posts
                .values()
                .filter(|p| p.author_id == id)
                .map(|p| p.id)
                .collect::<Vec<_>>();
            for post_id in &ids {
                posts.remove(post_id);
            }
            ids
        };
        db.comments
            .rows
            .write()
            .await
            .retain(|_, c| c.author_id != id && !removed.contains(&c.post_id));
    }
}

#[async_trait]
impl Record for Post {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(db: &InMemoryDatabase) -> &Table<Self> {
        &db.posts
    }

    async fn on_delete(db: &InMemoryDatabase, id: Uuid) {
        db.comments
            .rows
            .write()
            .await
            .retain(|_, c| c.post_id != id);
    }
}

#[async_trait]
impl Record for Comment {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(db: &InMemoryDatabase) -> &Table<Self> {
        &db.comments
    }
}

#[async_trait]
impl Record for Category {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(db: &InMemoryDatabase) -> &Table<Self> {
        &db.categories
    }

    fn conflicts_with(&self, other: &Self) -> bool {
        self.slug == other.slug
    }

    async fn on_delete(db: &InMemoryDatabase, id: Uuid) {
        for post in db.posts.rows.write().await.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
    }
}

#[async_trait]
impl Record for Location {
    fn id(&self) -> Uuid {
        self.id
    }

    fn table(db: &InMemoryDatabase) -> &Table<Self> {
        &db.locations
    }

    async fn on_delete(db: &InMemoryDatabase, id: Uuid) {
        for post in db.posts.rows.write().await.values_mut() {
            if post.location_id == Some(id) {
                post.location_id = None;
            }
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self.table().find(|u| u.username == username).await)
    }
}

#[async_trait]
impl PostRepository for InMemoryRepository<Post> {
    async fn list(&self, query: &PostQuery, page: PageRequest) -> Result<Page<Post>, RepoError> {
        let categories: HashMap<Uuid, Category> = self
            .db
            .categories
            .rows
            .read()
            .await
            .clone();

        let mut posts = self
            .table()
            .filter(|post| {
                let category = post.category_id.and_then(|id| categories.get(&id));
                query.matches(post, category)
            })
            .await;
        posts.sort_by(|a, b| {
            b.pub_date
                .cmp(&a.pub_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        Ok(Page::from_vec(posts, page))
    }
}

#[async_trait]
impl CommentRepository for InMemoryRepository<Comment> {
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments = self.table().filter(|c| c.post_id == post_id).await;
        comments.sort_by_key(|c| c.created_at);
        Ok(comments)
    }

    async fn count_for_posts(&self, post_ids: &[Uuid]) -> Result<HashMap<Uuid, u64>, RepoError> {
        let mut counts = HashMap::new();
        for comment in self.table().rows.read().await.values() {
            if post_ids.contains(&comment.post_id) {
                *counts.entry(comment.post_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryRepository<Category> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        Ok(self.table().find(|c| c.slug == slug).await)
    }

    async fn list_published(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories = self.table().filter(|c| c.is_published).await;
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }
}

#[async_trait]
impl LocationRepository for InMemoryRepository<Location> {
    async fn list_published(&self) -> Result<Vec<Location>, RepoError> {
        let mut locations = self.table().filter(|l| l.is_published).await;
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }
}
