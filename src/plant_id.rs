//! Client for the Plant.id identification API.
//!
//! One request per upload, no retries. Callers get the raw JSON body and hand it
//! to [`crate::normalize`].

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::models::IdentificationRequest;

pub const PLANT_ID_ENDPOINT: &str = "https://plant.id/api/v3/identification";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);

const MODIFIERS: &[&str] = &["crops_fast", "similar_images"];
const PLANT_DETAILS: &[&str] = &["common_names", "url", "wiki_description", "taxonomy"];

#[derive(Error, Debug)]
pub enum PlantIdError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Plant.id returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl PlantIdError {
    pub fn is_timeout(&self) -> bool {
        match self {
            PlantIdError::Request(e) | PlantIdError::Decode(e) => e.is_timeout(),
            PlantIdError::Status { .. } => false,
        }
    }
}

#[derive(Clone)]
pub struct PlantIdClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl std::fmt::Debug for PlantIdClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantIdClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl PlantIdClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, PlantIdError> {
        Self::with_endpoint(api_key, PLANT_ID_ENDPOINT, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_endpoint(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PlantIdError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PlantIdError::Request)?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        })
    }

    /// Send one image to Plant.id and return the parsed response body.
    pub async fn identify(&self, image: &[u8]) -> Result<Value, PlantIdError> {
        let payload = build_request(image);

        tracing::debug!(
            "Sending {} byte image to {}",
            image.len(),
            self.endpoint
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header("Api-Key", &self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(PlantIdError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlantIdError::Status { status, body });
        }

        response.json::<Value>().await.map_err(PlantIdError::Decode)
    }
}

fn build_request(image: &[u8]) -> IdentificationRequest<'static> {
    IdentificationRequest {
        images: vec![STANDARD.encode(image)],
        similar_images: true,
        modifiers: MODIFIERS,
        plant_details: PLANT_DETAILS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::spawn_upstream;
    use axum::{http::HeaderMap, routing::post, Json, Router};
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(build_request(b"leaf")).unwrap();
        assert_eq!(
            body,
            json!({
                "images": ["bGVhZg=="],
                "similar_images": true,
                "modifiers": ["crops_fast", "similar_images"],
                "plant_details": ["common_names", "url", "wiki_description", "taxonomy"]
            })
        );
    }

    #[tokio::test]
    async fn test_identify_sends_key_and_returns_body() {
        let router = Router::new().route(
            "/api/v3/identification",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers.get("api-key").unwrap(), "test-key");
                assert_eq!(body["images"], json!(["bGVhZg=="]));
                Json(json!({ "result": { "classification": { "suggestions": [] } } }))
            }),
        );
        let endpoint = spawn_upstream(router).await;

        let client = PlantIdClient::with_endpoint("test-key", endpoint, REQUEST_TIMEOUT).unwrap();
        let body = client.identify(b"leaf").await.unwrap();
        assert_eq!(body["result"]["classification"]["suggestions"], json!([]));
    }

    #[tokio::test]
    async fn test_identify_fails_on_error_status() {
        let router = Router::new().route(
            "/api/v3/identification",
            post(|| async { (StatusCode::UNAUTHORIZED, "invalid api key") }),
        );
        let endpoint = spawn_upstream(router).await;

        let client = PlantIdClient::with_endpoint("bad-key", endpoint, REQUEST_TIMEOUT).unwrap();
        let err = client.identify(b"leaf").await.unwrap_err();
        match err {
            PlantIdError::Status { status, body } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_identify_fails_when_unreachable() {
        // Bind then drop to get a port nothing listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = PlantIdClient::with_endpoint(
            "key",
            format!("http://{}/api/v3/identification", addr),
            REQUEST_TIMEOUT,
        )
        .unwrap();
        let err = client.identify(b"leaf").await.unwrap_err();
        assert!(matches!(err, PlantIdError::Request(_)));
        assert!(!err.is_timeout());
    }

    #[tokio::test]
    async fn test_identify_times_out() {
        let router = Router::new().route(
            "/api/v3/identification",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({}))
            }),
        );
        let endpoint = spawn_upstream(router).await;

        let client =
            PlantIdClient::with_endpoint("key", endpoint, Duration::from_millis(200)).unwrap();
        let err = client.identify(b"leaf").await.unwrap_err();
        assert!(err.is_timeout(), "expected timeout, got {err}");
    }

    #[tokio::test]
    async fn test_identify_fails_on_non_json_body() {
        let router = Router::new().route(
            "/api/v3/identification",
            post(|| async { "<html>maintenance</html>" }),
        );
        let endpoint = spawn_upstream(router).await;

        let client = PlantIdClient::with_endpoint("key", endpoint, REQUEST_TIMEOUT).unwrap();
        let err = client.identify(b"leaf").await.unwrap_err();
        assert!(matches!(err, PlantIdError::Decode(_)));
        assert!(!err.is_timeout());
    }
}
