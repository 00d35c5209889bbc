use axum::{extract::State, response::Html};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use tracing::warn;

use crate::errors::ApiError;
use crate::state::AppState;

pub const PORTAL_HTML: &str = "<html><h1>Super secret admin portal</h1></html>";

/// Admin portal behind HTTP Basic auth. A missing or undecodable header is
/// treated the same as wrong credentials.
pub async fn admin_portal(
    State(state): State<AppState>,
    auth: Option<TypedHeader<Authorization<Basic>>>,
) -> Result<Html<&'static str>, ApiError> {
    let Some(TypedHeader(Authorization(basic))) = auth else {
        warn!("admin portal requested without basic credentials");
        return Err(ApiError::Unauthorized);
    };
    if !state.admin.verify(basic.username(), basic.password()) {
        warn!("admin portal login rejected");
        return Err(ApiError::Unauthorized);
    }
    Ok(Html(PORTAL_HTML))
}
