use std::collections::BTreeMap;

use chrono::{TimeDelta, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
use uuid::Uuid;

use blogicum_core::domain::{Category, PageRequest, Post, PostDraft, PostQuery, User};
use blogicum_core::error::RepoError;
use blogicum_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, PostRepository, UserRepository,
};

use crate::database::entity::{category, post, user};
use crate::database::postgres_repo::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
    PostgresUserRepository,
};

fn post_model(id: Uuid, author_id: Uuid) -> post::Model {
    let now = Utc::now();
    post::Model {
        id,
        author_id,
        category_id: None,
        location_id: None,
        title: "Test Post".to_owned(),
        text: "Content".to_owned(),
        pub_date: (now - TimeDelta::hours(1)).into(),
        is_published: true,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([("num_items", Value::from(n))])
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(post_id, author_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
    assert!(post.category_id.is_none());
}

#[tokio::test]
async fn test_create_post_returns_inserted_row() {
    let author_id = Uuid::new_v4();
    let draft = PostDraft {
        title: "Test Post".into(),
        text: "Content".into(),
        pub_date: Utc::now(),
        category_id: None,
        location_id: None,
        is_published: true,
    };
    let new_post = Post::new(author_id, draft);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post_model(new_post.id, author_id)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let saved: Post = repo.create(new_post.clone()).await.unwrap();

    assert_eq!(saved.id, new_post.id);
    assert_eq!(saved.author_id, author_id);
}

#[tokio::test]
async fn test_find_user_by_username() {
    let now = Utc::now();
    let user_id = Uuid::new_v4();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![user::Model {
            id: user_id,
            username: "alice".to_owned(),
            first_name: "Alice".to_owned(),
            last_name: String::new(),
            email: "alice@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            created_at: now.into(),
            updated_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresUserRepository::new(db);
    let found: User = repo.find_by_username("alice").await.unwrap().unwrap();

    assert_eq!(found.id, user_id);
    assert_eq!(found.first_name, "Alice");
}

#[tokio::test]
async fn test_find_category_by_slug_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<category::Model>::new()])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);
    let found: Option<Category> = repo.find_by_slug("nowhere").await.unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_public_listing_filters_on_post_and_category() {
    let author_id = Uuid::new_v4();
    let first = post_model(Uuid::new_v4(), author_id);
    let second = post_model(Uuid::new_v4(), author_id);

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![count_row(2)]])
        .append_query_results(vec![vec![first.clone(), second.clone()]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let page = repo
        .list(&PostQuery::public(Utc::now()), PageRequest::new(1, 10))
        .await
        .unwrap();

    assert_eq!(page.total_items, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, first.id);
    assert_eq!(page.items[1].id, second.id);

    let log = repo.db.into_transaction_log();
    assert_eq!(log.len(), 2);
    let sql = &log[1].statements()[0].sql;
    assert!(sql.contains(r#"INNER JOIN "categories""#), "{sql}");
    assert!(sql.contains(r#""posts"."is_published" = "#), "{sql}");
    assert!(sql.contains(r#""posts"."pub_date" <= "#), "{sql}");
    assert!(sql.contains(r#""categories"."is_published" = "#), "{sql}");
    assert!(sql.contains(r#"ORDER BY "posts"."pub_date" DESC"#), "{sql}");
}

#[tokio::test]
async fn test_listing_past_last_page_only_counts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![count_row(3)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let page = repo
        .list(&PostQuery::public(Utc::now()), PageRequest::new(u64::MAX, 10))
        .await
        .unwrap();

    assert!(!page.exists());
    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 3);

    let log = repo.db.into_transaction_log();
    assert_eq!(log.len(), 1);
    assert!(log[0].statements()[0].sql.contains("COUNT(*)"));
}

#[tokio::test]
async fn test_count_comments_for_posts() {
    let busy = Uuid::new_v4();
    let quiet = Uuid::new_v4();

    // Tuple columns are read by position; keys sort as (post_id, count).
    let row = |post_id: Uuid, n: i64| {
        BTreeMap::from([("a_post_id", Value::from(post_id)), ("b_count", Value::from(n))])
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![row(busy, 4), row(quiet, 1)]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let counts = repo
        .count_for_posts(&[busy, quiet, Uuid::new_v4()])
        .await
        .unwrap();

    assert_eq!(counts.len(), 2);
    assert_eq!(counts[&busy], 4);
    assert_eq!(counts[&quiet], 1);

    let log = repo.db.into_transaction_log();
    let sql = &log[0].statements()[0].sql;
    assert!(sql.contains("COUNT("), "{sql}");
    assert!(sql.contains(r#"GROUP BY "comments"."post_id""#), "{sql}");
}

#[tokio::test]
async fn test_count_comments_without_posts_skips_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresCommentRepository::new(db);

    let counts = repo.count_for_posts(&[]).await.unwrap();

    assert!(counts.is_empty());
    assert!(repo.db.into_transaction_log().is_empty());
}
