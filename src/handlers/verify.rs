//! Challenge proof submission.
//!
//! Every submission is accepted and the challenge id echoed back. No proof
//! checking happens here yet.

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
    Json,
};

use crate::models::VerifyResponse;

const CHALLENGE_FIELD: &str = "challengeId";

pub fn acknowledge(challenge: Option<String>) -> VerifyResponse {
    VerifyResponse {
        ok: true,
        challenge,
    }
}

pub async fn verify_challenge(request: Request) -> Json<VerifyResponse> {
    let challenge = read_challenge_id(request).await;
    tracing::info!("Accepted challenge submission: {:?}", challenge);
    Json(acknowledge(challenge))
}

/// `challengeId` from a multipart or urlencoded form. Anything unreadable is `None`.
async fn read_challenge_id(request: Request) -> Option<String> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::from_request(request, &()).await.ok()?;
        while let Ok(Some(field)) = multipart.next_field().await {
            if field.name() == Some(CHALLENGE_FIELD) {
                return field.text().await.ok();
            }
        }
        None
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let body = Bytes::from_request(request, &()).await.ok()?;
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(&body).ok()?;
        pairs
            .into_iter()
            .find(|(key, _)| key == CHALLENGE_FIELD)
            .map(|(_, value)| value)
    } else {
        None
    }
}
