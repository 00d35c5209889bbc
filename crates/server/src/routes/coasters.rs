use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use models::Coaster;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::errors::ApiError;
use crate::state::AppState;

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Decode a write body. The content type must be exactly `application/json`,
/// parameters included, and is checked before the payload is parsed.
fn decode_json<T: DeserializeOwned>(headers: &HeaderMap, body: &Bytes) -> Result<T, ApiError> {
    let received = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if received != JSON_CONTENT_TYPE {
        debug!(%received, "rejecting write with unexpected content type");
        return Err(ApiError::UnsupportedMediaType {
            expected: JSON_CONTENT_TYPE,
            received: received.to_string(),
        });
    }
    serde_json::from_slice(body).map_err(|e| {
        debug!(error = %e, "rejecting malformed json body");
        ApiError::BadRequest(e.to_string())
    })
}

/// Serialize `value` as a JSON response. Encoding failures become a 500.
fn json_response<T: Serialize>(value: &T) -> Result<Response, ApiError> {
    let bytes = serde_json::to_vec(value).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes).into_response())
}

pub async fn list_coasters(State(state): State<AppState>) -> Result<Response, ApiError> {
    // The snapshot is taken under the store lock; encoding happens after it is released.
    let coasters = state.store.list().await;
    json_response(&coasters)
}

/// Echoes the stored record so the caller learns the generated id.
pub async fn create_coaster(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let candidate: Coaster = decode_json(&headers, &body)?;
    let created = state.store.create(candidate).await;
    info!(id = %created.id, name = %created.name, "coaster created");
    json_response(&created)
}

pub async fn get_coaster(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let coaster = state.store.get(&id).await?;
    json_response(&coaster)
}

pub async fn update_coaster(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    // Unknown ids are reported before the body is looked at.
    state.store.get(&id).await?;
    let replacement: Coaster = decode_json(&headers, &body)?;
    state.store.update(&id, replacement).await?;
    info!(%id, "coaster updated");
    Ok(StatusCode::OK)
}

pub async fn delete_coaster(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&id).await?;
    info!(%id, "coaster deleted");
    Ok(StatusCode::OK)
}

/// Answers every method with a redirect to a randomly chosen coaster.
pub async fn random_coaster(State(state): State<AppState>) -> Result<Response, ApiError> {
    let id = state.store.pick_random().await?;
    let location = format!("/coasters/{id}");
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(ct: Option<&'static str>) -> HeaderMap {
        let mut h = HeaderMap::new();
        if let Some(ct) = ct {
            h.insert(header::CONTENT_TYPE, HeaderValue::from_static(ct));
        }
        h
    }

    #[test]
    fn decode_requires_exact_content_type() {
        let body = Bytes::from_static(br#"{"name":"Taron"}"#);

        let err = decode_json::<Coaster>(&headers_with(Some("application/json; charset=utf-8")), &body).unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedMediaType { .. }));

        let err = decode_json::<Coaster>(&headers_with(None), &body).unwrap_err();
        assert_eq!(err.to_string(), "Need content-type 'application/json' but got ''");

        let c = decode_json::<Coaster>(&headers_with(Some("application/json")), &body).unwrap();
        assert_eq!(c.name, "Taron");
    }

    #[test]
    fn decode_reports_parse_errors_as_bad_request() {
        let body = Bytes::from_static(br#"{"name":"#);
        let err = decode_json::<Coaster>(&headers_with(Some("application/json")), &body).unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert!(msg.contains("EOF"), "unexpected message: {msg}"),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }
}
