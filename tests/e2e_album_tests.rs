//! End-to-end tests for the albums resource, nested under musicians.

mod common;

use chrono::Datelike;
use common::{
    TestClient, TestServer, ALBUM_NAME, ALBUM_SLUG, ALBUM_YEAR, MUSICIAN_SLUG,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn list_exposes_owner_and_song_count() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.list_albums(MUSICIAN_SLUG).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    let albums = body.as_array().unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(
        albums[0],
        json!({
            "name": ALBUM_NAME,
            "slug": ALBUM_SLUG,
            "musician": MUSICIAN_SLUG,
            "total_songs": 1,
            "year_of_release": ALBUM_YEAR,
        })
    );
}

#[tokio::test]
async fn album_is_not_reachable_under_the_wrong_musician() {
    let server = TestServer::spawn().await;
    let client = TestClient::authenticated_admin(server.base_url.clone()).await;

    client.create_musician("Queen", "queen").await;

    // the album exists, but not under this musician
    let response = client.get_album("queen", ALBUM_SLUG).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.list_albums("no-such-musician").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn created_album_gets_its_musician_from_the_path() {
    let server = TestServer::spawn().await;
    let client = TestClient::authenticated_admin(server.base_url.clone()).await;

    // a client-supplied musician field is ignored
    let response = client
        .post_json(
            &format!("/v1/musicians/{}/albums/", MUSICIAN_SLUG),
            &json!({
                "name": "Second Album",
                "slug": "second-album",
                "year_of_release": 2003,
                "musician": "someone-else",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["musician"], MUSICIAN_SLUG);
    assert_eq!(body["total_songs"], 0);
}

#[tokio::test]
async fn year_of_release_must_not_be_in_the_future() {
    let server = TestServer::spawn().await;
    let client = TestClient::authenticated_admin(server.base_url.clone()).await;

    let next_year = chrono::Utc::now().year() + 1;
    let response = client
        .create_album(MUSICIAN_SLUG, "From the Future", "from-the-future", next_year)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let this_year = chrono::Utc::now().year();
    let response = client
        .create_album(MUSICIAN_SLUG, "From Today", "from-today", this_year)
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn duplicate_album_slug_is_a_validation_error() {
    let server = TestServer::spawn().await;
    let client = TestClient::authenticated_admin(server.base_url.clone()).await;

    let response = client
        .create_album(MUSICIAN_SLUG, "Copy", ALBUM_SLUG, 2001)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_updates_the_year() {
    let server = TestServer::spawn().await;
    let client = TestClient::authenticated_admin(server.base_url.clone()).await;

    let response = client
        .patch_json(
            &format!("/v1/musicians/{}/albums/{}/", MUSICIAN_SLUG, ALBUM_SLUG),
            &json!({"year_of_release": 1999}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["year_of_release"], 1999);
    assert_eq!(body["name"], ALBUM_NAME);
}

#[tokio::test]
async fn put_requires_the_full_payload() {
    let server = TestServer::spawn().await;
    let client = TestClient::authenticated_admin(server.base_url.clone()).await;

    let response = client
        .put_json(
            &format!("/v1/musicians/{}/albums/{}/", MUSICIAN_SLUG, ALBUM_SLUG),
            &json!({"name": "Only a Name"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .put_json(
            &format!("/v1/musicians/{}/albums/{}/", MUSICIAN_SLUG, ALBUM_SLUG),
            &json!({"name": "Full Payload", "slug": ALBUM_SLUG, "year_of_release": 2002}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn deleting_an_album_takes_its_songs_along() {
    let server = TestServer::spawn().await;
    let client = TestClient::authenticated_admin(server.base_url.clone()).await;

    let response = client.delete_album(MUSICIAN_SLUG, ALBUM_SLUG).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = client.list_songs(MUSICIAN_SLUG, ALBUM_SLUG).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
