use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use cinema::{AppState, catalog::Catalog, config::Config, db, entities::catalog::user, routes};
use http_body_util::BodyExt;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::{Value, json};
use tower::ServiceExt;

fn config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        box_office_database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        token_ttl_hours: 1,
        seed_data: false,
    }
}

fn router(config: &Config, db: DatabaseConnection) -> Router {
    routes::router(Arc::new(AppState::new(config, Catalog::new(db))))
}

async fn app() -> Router {
    let config = config();
    let db = db::connect_catalog(&config.database_url).await.unwrap();
    router(&config, db)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

async fn login(app: &Router) -> String {
    let creds = json!({ "username": "alice", "password": "s3cret" });
    let (status, _) = send(app, "POST", "/register", None, Some(creds.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(app, "POST", "/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

fn movie(title: &str, genre: &str, date: &str, rating: f64, director: &str) -> Value {
    json!({
        "title": title,
        "genre": genre,
        "release_date": date,
        "rating": rating,
        "director": director,
    })
}

#[tokio::test]
async fn register_login_and_manage_movies() {
    let app = app().await;
    let token = login(&app).await;

    let (status, created) = send(
        &app,
        "POST",
        "/movies",
        Some(&token),
        Some(movie("Inception", "Sci-Fi", "2010-07-16", 8.8, "Christopher Nolan")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Inception");
    assert_eq!(created["release_date"], "2010-07-16");
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/movies/{id}"),
        Some(&token),
        Some(movie("Inception", "Sci-Fi", "2010-07-16", 9.0, "Christopher Nolan")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["rating"], 9.0);

    let (status, listed) = send(&app, "GET", "/movies", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, "DELETE", &format!("/movies/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Movie deleted" }));

    let (status, body) = send(&app, "DELETE", &format!("/movies/{id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Movie not found" }));
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() {
    let app = app().await;
    let body = movie("Heat", "Crime", "1995-12-15", 8.3, "Michael Mann");

    let (status, err) = send(&app, "POST", "/movies", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err["error"], "Authorization header required");

    let (status, _) = send(&app, "POST", "/movies", Some("not-a-jwt"), Some(body)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "GET", "/movies", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "DELETE", "/movies/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = app().await;
    login(&app).await;

    let creds = json!({ "username": "alice", "password": "wrong" });
    let (status, body) = send(&app, "POST", "/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = app().await;
    login(&app).await;

    let creds = json!({ "username": "alice", "password": "other" });
    let (status, body) = send(&app, "POST", "/register", None, Some(creds)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn public_listing_filters_and_sorts() {
    let app = app().await;
    let token = login(&app).await;

    for body in [
        movie("Inception", "Sci-Fi", "2010-07-16", 8.8, "Christopher Nolan"),
        movie("The Dark Knight", "Action", "2008-07-18", 9.0, "Christopher Nolan"),
        movie("Forrest Gump", "Drama", "1994-07-06", 8.8, "Robert Zemeckis"),
    ] {
        let (status, _) = send(&app, "POST", "/movies", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) =
        send(&app, "GET", "/movies/public?director=Nolan&sort=release_date&order=desc", None, None)
            .await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> =
        body.as_array().unwrap().iter().map(|m| m["title"].as_str().unwrap()).collect();
    assert_eq!(titles, ["Inception", "The Dark Knight"]);

    let (_, body) = send(&app, "GET", "/movies/public?genre=Drama", None, None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, "GET", "/movies/public?sort=password", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn invalid_movie_payloads_are_bad_requests() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/movies",
        Some(&token),
        Some(movie("Heat", "Crime", "15.12.1995", 8.3, "Michael Mann")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid date format. Use YYYY-MM-DD");

    let (status, _) =
        send(&app, "POST", "/movies", Some(&token), Some(json!({ "title": "Heat" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "PUT",
        "/movies/42",
        Some(&token),
        Some(movie("Heat", "Crime", "1995-12-15", 8.3, "Michael Mann")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_movie_id_is_a_json_bad_request() {
    let app = app().await;
    let token = login(&app).await;

    let (status, body) = send(&app, "DELETE", "/movies/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        "PUT",
        "/movies/abc",
        Some(&token),
        Some(movie("Heat", "Crime", "1995-12-15", 8.3, "Michael Mann")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_query_is_a_json_bad_request() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/movies/public?title=a&title=b", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn seeded_demo_user_can_log_in() {
    let config = config();
    let db = db::connect_catalog(&config.database_url).await.unwrap();
    db::seed_catalog(&db).await.unwrap();
    db::seed_catalog(&db).await.unwrap();
    assert_eq!(user::Entity::find().count(&db).await.unwrap(), 1);

    let app = router(&config, db);
    let creds = json!({ "username": "testuser", "password": "password" });
    let (status, body) = send(&app, "POST", "/login", None, Some(creds)).await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap();
    let (status, _) = send(&app, "GET", "/movies", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
}
