//! HTTP client for end-to-end tests
//!
//! Wraps reqwest with methods for every catalog-server endpoint. When API
//! routes or request formats change, update only this file.

use super::constants::*;
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client carrying an optional bearer access token
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
    /// Access token attached to every request when present
    pub token: Option<String>,
}

impl TestClient {
    /// Creates a new unauthenticated client
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self {
            client,
            base_url,
            token: None,
        }
    }

    /// Creates a client holding an administrator access token
    ///
    /// # Panics
    ///
    /// Panics if authentication fails (indicates test infrastructure problem).
    pub async fn authenticated_admin(base_url: String) -> Self {
        let mut client = Self::new(base_url);
        let response = client.login(ADMIN_USER, ADMIN_PASS).await;
        assert_eq!(
            response.status(),
            StatusCode::OK,
            "Admin authentication failed"
        );
        let body: Value = response.json().await.expect("Login response was not JSON");
        let token = body["access"]
            .as_str()
            .expect("Login response had no access token")
            .to_string();
        client.token = Some(token);
        client
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// POST /v1/login/
    pub async fn login(&self, username: &str, password: &str) -> Response {
        self.client
            .post(format!("{}/v1/login/", self.base_url))
            .json(&json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .expect("Login request failed")
    }

    // ========================================================================
    // Generic request helpers
    // ========================================================================

    pub async fn get(&self, path: &str) -> Response {
        self.send(self.client.get(format!("{}{}", self.base_url, path)))
            .await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.send(
            self.client
                .post(format!("{}{}", self.base_url, path))
                .json(body),
        )
        .await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> Response {
        self.send(
            self.client
                .put(format!("{}{}", self.base_url, path))
                .json(body),
        )
        .await
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> Response {
        self.send(
            self.client
                .patch(format!("{}{}", self.base_url, path))
                .json(body),
        )
        .await
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.send(self.client.delete(format!("{}{}", self.base_url, path)))
            .await
    }

    async fn send(&self, mut request: reqwest::RequestBuilder) -> Response {
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Request failed")
    }

    // ========================================================================
    // Musicians
    // ========================================================================

    pub async fn list_musicians(&self) -> Response {
        self.get("/v1/musicians/").await
    }

    pub async fn search_musicians(&self, query: &str) -> Response {
        self.get(&format!("/v1/musicians/?search={}", query)).await
    }

    pub async fn get_musician(&self, slug: &str) -> Response {
        self.get(&format!("/v1/musicians/{}/", slug)).await
    }

    pub async fn create_musician(&self, name: &str, slug: &str) -> Response {
        self.post_json("/v1/musicians/", &json!({"name": name, "slug": slug}))
            .await
    }

    pub async fn delete_musician(&self, slug: &str) -> Response {
        self.delete(&format!("/v1/musicians/{}/", slug)).await
    }

    // ========================================================================
    // Albums
    // ========================================================================

    pub async fn list_albums(&self, musician: &str) -> Response {
        self.get(&format!("/v1/musicians/{}/albums/", musician))
            .await
    }

    pub async fn get_album(&self, musician: &str, album: &str) -> Response {
        self.get(&format!("/v1/musicians/{}/albums/{}/", musician, album))
            .await
    }

    pub async fn create_album(&self, musician: &str, name: &str, slug: &str, year: i32) -> Response {
        self.post_json(
            &format!("/v1/musicians/{}/albums/", musician),
            &json!({"name": name, "slug": slug, "year_of_release": year}),
        )
        .await
    }

    pub async fn delete_album(&self, musician: &str, album: &str) -> Response {
        self.delete(&format!("/v1/musicians/{}/albums/{}/", musician, album))
            .await
    }

    // ========================================================================
    // Songs
    // ========================================================================

    pub async fn list_songs(&self, musician: &str, album: &str) -> Response {
        self.get(&format!("/v1/musicians/{}/albums/{}/songs/", musician, album))
            .await
    }

    pub async fn get_song(&self, musician: &str, album: &str, song: &str) -> Response {
        self.get(&format!(
            "/v1/musicians/{}/albums/{}/songs/{}/",
            musician, album, song
        ))
        .await
    }

    pub async fn create_song(
        &self,
        musician: &str,
        album: &str,
        name: &str,
        slug: &str,
        number: u32,
    ) -> Response {
        self.post_json(
            &format!("/v1/musicians/{}/albums/{}/songs/", musician, album),
            &json!({"name": name, "slug": slug, "number_in_album": number}),
        )
        .await
    }

    pub async fn delete_song(&self, musician: &str, album: &str, song: &str) -> Response {
        self.delete(&format!(
            "/v1/musicians/{}/albums/{}/songs/{}/",
            musician, album, song
        ))
        .await
    }
}
