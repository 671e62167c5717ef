//! Runs the store against a real PostgreSQL database.
//!
//! Set `DATABASE_URL=postgres://...` to enable; without it every test returns early.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use blogforge::auth::Credentials;
use blogforge::error::AppError;
use blogforge::models::{NewComment, NewPost, Post};
use blogforge::routes;
use blogforge::state::AppState;
use blogforge::store::{ContentStore, FavoritesLedger, PgStore};
use dotenv::dotenv;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

async fn connect() -> Option<(Arc<PgStore>, PgPool)> {
    dotenv().ok();
    let database_url = std::env::var("DATABASE_URL")
        .ok()
        .filter(|url| url.starts_with("postgres"))?;
    let store = PgStore::connect(&database_url, 2)
        .await
        .expect("Failed to connect to test DB");
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test DB");
    Some((Arc::new(store), pool))
}

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@x.com", prefix, Uuid::new_v4().simple())
}

async fn new_post(store: &PgStore, author: &str, title: &str) -> Post {
    store
        .create_post(NewPost {
            title: title.to_string(),
            content: "Body".to_string(),
            email: author.to_string(),
        })
        .await
        .unwrap()
}

async fn count(pool: &PgPool, table: &str, post_id: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE post_id = $1", table))
        .bind(post_id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[actix_rt::test]
async fn test_duplicate_signup_in_postgres() {
    let Some((store, _pool)) = connect().await else {
        eprintln!("DATABASE_URL not set to postgres, skipping");
        return;
    };
    let credentials = Credentials::new(store.clone(), 4);
    let email = unique_email("dup");

    let created = credentials.create(None, None, &email, "pw").await.unwrap();
    let again = credentials.create(None, None, &email, "other").await;
    assert!(matches!(again, Err(AppError::DuplicateEmail)));

    let user = credentials.authenticate(&email, "pw").await.unwrap();
    assert_eq!(user.id, created.id);
    assert_eq!(user.created_at, created.created_at);
    assert!(matches!(
        credentials.authenticate(&email, "other").await,
        Err(AppError::InvalidCredentials)
    ));
}

#[actix_rt::test]
async fn test_comment_appears_on_its_post() {
    let Some((store, _pool)) = connect().await else {
        eprintln!("DATABASE_URL not set to postgres, skipping");
        return;
    };
    let author = unique_email("author");
    let post = new_post(&store, &author, "Hi").await;
    assert_eq!(post.post_id.len(), 7);
    assert!(!post.saved);

    let first = store
        .add_comment(NewComment {
            post_id: post.post_id.clone(),
            email: author.clone(),
            text: "Nice".to_string(),
        })
        .await
        .unwrap();
    let second = store
        .add_comment(NewComment {
            post_id: post.post_id.clone(),
            email: author.clone(),
            text: "Again".to_string(),
        })
        .await
        .unwrap();

    let (fetched, comments) = store.get_post(&post.post_id).await.unwrap().unwrap();
    assert_eq!(fetched.title, "Hi");
    assert_eq!(comments, vec![first.clone(), second]);

    let listed = store.list_posts().await.unwrap();
    let listed = listed
        .into_iter()
        .find(|p| p.post_id == post.post_id)
        .expect("new post is listed");
    assert_eq!(listed.comments[0], first);

    let orphan = store
        .add_comment(NewComment {
            post_id: "zzzzzzz".to_string(),
            email: author,
            text: "Lost".to_string(),
        })
        .await;
    assert!(matches!(orphan, Err(AppError::NotFound(_))));
}

#[actix_rt::test]
async fn test_delete_cascades_in_postgres() {
    let Some((store, pool)) = connect().await else {
        eprintln!("DATABASE_URL not set to postgres, skipping");
        return;
    };
    let author = unique_email("author");
    let reader = unique_email("reader");
    let post = new_post(&store, &author, "Doomed").await;
    store
        .add_comment(NewComment {
            post_id: post.post_id.clone(),
            email: reader.clone(),
            text: "Bye".to_string(),
        })
        .await
        .unwrap();
    store
        .save_favorite(&reader, &author, &post.post_id)
        .await
        .unwrap();

    store.delete_post(&post.post_id).await.unwrap();

    assert!(store.get_post(&post.post_id).await.unwrap().is_none());
    assert_eq!(count(&pool, "comments", &post.post_id).await, 0);
    assert_eq!(count(&pool, "favorites", &post.post_id).await, 0);
    assert!(store.list_favorites(&reader).await.unwrap().is_empty());

    store.delete_post(&post.post_id).await.unwrap();
}

#[actix_rt::test]
async fn test_favorites_in_postgres() {
    let Some((store, pool)) = connect().await else {
        eprintln!("DATABASE_URL not set to postgres, skipping");
        return;
    };
    let author = unique_email("author");
    let reader = unique_email("reader");
    let older = new_post(&store, &author, "Older").await;
    let newer = new_post(&store, &author, "Newer").await;

    store
        .save_favorite(&reader, &author, &newer.post_id)
        .await
        .unwrap();
    store
        .save_favorite(&reader, &author, &older.post_id)
        .await
        .unwrap();
    store
        .save_favorite(&reader, &author, &newer.post_id)
        .await
        .unwrap();
    assert_eq!(count(&pool, "favorites", &newer.post_id).await, 1);

    let saved: Vec<String> = store
        .list_favorites(&reader)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.post_id)
        .collect();
    assert_eq!(saved, vec![newer.post_id.clone(), older.post_id.clone()]);

    let unknown = store.save_favorite(&reader, &author, "zzzzzzz").await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));

    store
        .remove_favorite(&reader, &newer.post_id)
        .await
        .unwrap();
    let again = store.remove_favorite(&reader, &newer.post_id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
    assert_eq!(store.list_favorites(&reader).await.unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_review_date_matches_stored_comment() {
    let Some((store, _pool)) = connect().await else {
        eprintln!("DATABASE_URL not set to postgres, skipping");
        return;
    };
    let state = web::Data::new(AppState::new(store, "postgres-test-secret", 4));
    let app = test::init_service(App::new().app_data(state).configure(routes::config)).await;
    let email = unique_email("scenario");

    let req = test::TestRequest::post()
        .uri("/signup")
        .set_json(json!({ "email": email, "password": "pw" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let token = body["token"].as_str().unwrap().to_string();
    let auth = ("Authorization", format!("Bearer {}", token));

    let req = test::TestRequest::post()
        .uri("/addpost")
        .insert_header(auth.clone())
        .set_json(json!({ "title": "Hi", "content": "Body" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let post_id = body["data"]["postId"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/addreviews")
        .insert_header(auth)
        .set_json(json!({ "postId": post_id, "text": "Nice" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;

    let req = test::TestRequest::get()
        .uri(&format!("/blog/{}", post_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["comments"][0]["text"], "Nice");
    assert_eq!(body["comments"][0]["email"], email.as_str());
    assert_eq!(body["comments"][0]["date"], created["data"]["date"]);
}
