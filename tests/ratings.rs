mod common;

use axum::http::StatusCode;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::json;

use common::{register_and_login, send_json, test_app};
use reelrate::entities::{movie, rating};

#[tokio::test]
async fn create_rating_and_movie_cascade() {
    let (app, db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    let payload = json!({
        "tmdb_id": 100,
        "score": 8,
        "movie_data": {
            "title": "New Movie",
            "poster_path": "/img.jpg",
            "release_date": "2023-01-01",
            "overview": "A test movie"
        }
    });

    let (status, body) = send_json(&app, "POST", "/reviews/ratings", Some(&token), Some(payload)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Rating created successfully");
    assert_eq!(body["score"], 8);

    let movies = movie::Entity::find().all(&db).await.unwrap();
    assert_eq!(movies.len(), 1);
    assert_eq!(movies[0].title, "New Movie");
    assert_eq!(movies[0].release_date.as_deref(), Some("2023-01-01"));

    let ratings = rating::Entity::find().all(&db).await.unwrap();
    assert_eq!(ratings.len(), 1);
    assert_eq!(ratings[0].movie_id, movies[0].id);
}

#[tokio::test]
async fn create_links_existing_movie_without_duplicating_it() {
    let (app, db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    movie::ActiveModel {
        tmdb_id: Set(200),
        title: Set("Existing Movie".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let payload = json!({
        "tmdb_id": 200,
        "score": 9,
        "movie_data": { "title": "Title", "release_date": "2020-01-01" }
    });
    let (status, _) = send_json(&app, "POST", "/reviews/ratings", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 1);
    let rating = rating::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(rating.score, 9);
}

#[tokio::test]
async fn second_user_rating_same_movie_adds_no_movie() {
    let (app, db) = test_app().await;
    let token1 = register_and_login(&app, "user1@test.com").await;
    let token2 = register_and_login(&app, "user2@test.com").await;

    let movie_data = json!({ "title": "Matrix", "release_date": "1999-03-31" });
    send_json(
        &app,
        "POST",
        "/reviews/ratings",
        Some(&token1),
        Some(json!({ "tmdb_id": 555, "score": 10, "movie_data": movie_data.clone() })),
    )
    .await;
    let (status, _) = send_json(
        &app,
        "POST",
        "/reviews/ratings",
        Some(&token2),
        Some(json!({ "tmdb_id": 555, "score": 5, "movie_data": movie_data })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(rating::Entity::find().count(&db).await.unwrap(), 2);
}

#[tokio::test]
async fn users_ratings_are_independent() {
    let (app, _db) = test_app().await;
    let token1 = register_and_login(&app, "user1@test.com").await;
    let token2 = register_and_login(&app, "user2@test.com").await;

    let movie_data = json!({ "title": "Matrix", "release_date": "1999-03-31" });
    send_json(
        &app,
        "POST",
        "/reviews/ratings",
        Some(&token1),
        Some(json!({ "tmdb_id": 555, "score": 10, "movie_data": movie_data.clone() })),
    )
    .await;
    send_json(
        &app,
        "POST",
        "/reviews/ratings",
        Some(&token2),
        Some(json!({ "tmdb_id": 555, "score": 5, "movie_data": movie_data })),
    )
    .await;

    let (_, list1) = send_json(&app, "GET", "/reviews/ratings", Some(&token1), None).await;
    let list1 = list1.as_array().unwrap();
    assert_eq!(list1.len(), 1);
    assert_eq!(list1[0]["movie"]["rating"], 10);

    let (_, list2) = send_json(&app, "GET", "/reviews/ratings", Some(&token2), None).await;
    let list2 = list2.as_array().unwrap();
    assert_eq!(list2.len(), 1);
    assert_eq!(list2[0]["movie"]["rating"], 5);
}

#[tokio::test]
async fn user_cannot_delete_others_rating() {
    let (app, db) = test_app().await;
    let token1 = register_and_login(&app, "user1@test.com").await;
    let token2 = register_and_login(&app, "user2@test.com").await;

    send_json(
        &app,
        "POST",
        "/reviews/ratings",
        Some(&token1),
        Some(json!({ "tmdb_id": 666, "score": 10, "movie_data": { "title": "Devil Movie" } })),
    )
    .await;

    let (status, body) =
        send_json(&app, "DELETE", "/reviews/ratings/666", Some(&token2), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Rating not found");
    assert_eq!(rating::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn create_missing_required_fields() {
    let (app, _db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    let (status, body) =
        send_json(&app, "POST", "/reviews/ratings", Some(&token), Some(json!({ "score": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing tmdb_id or score");

    let (status, _) =
        send_json(&app, "POST", "/reviews/ratings", Some(&token), Some(json!({ "tmdb_id": 123 })))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_unknown_movie_without_metadata() {
    let (app, db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/reviews/ratings",
        Some(&token),
        Some(json!({ "tmdb_id": 999, "score": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("no data provided"));
    assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn create_rejects_bad_date_format_without_partial_movie() {
    let (app, db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/reviews/ratings",
        Some(&token),
        Some(json!({
            "tmdb_id": 777,
            "score": 5,
            "movie_data": { "title": "Bad Date Movie", "release_date": "01-01-2022" }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Release date is not in the default pattern.");
    // The whole create is one transaction, so the movie row must not survive
    // the rejected request.
    assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_rating_is_a_conflict() {
    let (app, db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    let payload = json!({ "tmdb_id": 888, "score": 5, "movie_data": { "title": "Repeat Movie" } });
    let (status, _) =
        send_json(&app, "POST", "/reviews/ratings", Some(&token), Some(payload.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send_json(&app, "POST", "/reviews/ratings", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Rating already exists"));

    assert_eq!(rating::Entity::find().count(&db).await.unwrap(), 1);
    assert_eq!(movie::Entity::find().count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn update_rating_score() {
    let (app, db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    send_json(
        &app,
        "POST",
        "/reviews/ratings",
        Some(&token),
        Some(json!({ "tmdb_id": 101, "score": 2, "movie_data": { "title": "Bad Movie" } })),
    )
    .await;

    let (status, body) = send_json(
        &app,
        "PUT",
        "/reviews/ratings/101",
        Some(&token),
        Some(json!({ "score": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["new_score"], 5);

    let rating = rating::Entity::find().one(&db).await.unwrap().unwrap();
    assert_eq!(rating.score, 5);
}

#[tokio::test]
async fn update_non_existent_movie() {
    let (app, _db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    let (status, body) = send_json(
        &app,
        "PUT",
        "/reviews/ratings/999999",
        Some(&token),
        Some(json!({ "score": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Movie not found");
}

#[tokio::test]
async fn update_missing_score_field() {
    let (app, _db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    let (status, body) = send_json(
        &app,
        "PUT",
        "/reviews/ratings/123",
        Some(&token),
        Some(json!({ "wrong_key": 10 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "New score is required");
}

#[tokio::test]
async fn update_movie_exists_but_rating_does_not() {
    let (app, db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    movie::ActiveModel {
        tmdb_id: Set(300),
        title: Set("Unrated Movie".to_string()),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let (status, body) = send_json(
        &app,
        "PUT",
        "/reviews/ratings/300",
        Some(&token),
        Some(json!({ "score": 5 })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Rating not found");
}

#[tokio::test]
async fn delete_movie_not_found() {
    let (app, _db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    let (status, body) =
        send_json(&app, "DELETE", "/reviews/ratings/999999", Some(&token), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Movie not found");
}

#[tokio::test]
async fn list_renders_null_release_date() {
    let (app, _db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    send_json(
        &app,
        "POST",
        "/reviews/ratings",
        Some(&token),
        Some(json!({
            "tmdb_id": 400,
            "score": 8,
            "movie_data": { "title": "Old Movie", "release_date": null, "poster_path": "path.jpg" }
        })),
    )
    .await;

    let (status, body) = send_json(&app, "GET", "/reviews/ratings", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let entry = body
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["movie"]["tmdb_id"] == 400)
        .unwrap();
    assert!(entry["movie"]["release_date"].is_null());
}

#[tokio::test]
async fn delete_rating_success_keeps_movie() {
    let (app, db) = test_app().await;
    let token = register_and_login(&app, "user1@test.com").await;

    send_json(
        &app,
        "POST",
        "/reviews/ratings",
        Some(&token),
        Some(json!({ "tmdb_id": 500, "score": 8, "movie_data": { "title": "Delete Me" } })),
    )
    .await;

    let (status, body) = send_json(&app, "DELETE", "/reviews/ratings/500", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Rating deleted successfully");

    let movie = movie::Entity::find()
        .filter(movie::Column::TmdbId.eq(500))
        .one(&db)
        .await
        .unwrap();
    assert!(movie.is_some());
    assert_eq!(rating::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn ratings_routes_require_auth() {
    let (app, _db) = test_app().await;

    let (status, _) = send_json(&app, "GET", "/reviews/ratings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(
        &app,
        "POST",
        "/reviews/ratings",
        None,
        Some(json!({ "tmdb_id": 1, "score": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
