//! services/api/src/web/middleware.rs
//!
//! Request middleware that identifies the learner.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Middleware that extracts the learner id from the `x-user-id` header.
///
/// One id corresponds to one browser profile of the client. If valid, the id
/// is inserted into request extensions for handlers to use; if missing or
/// malformed, returns 400 Bad Request.
pub async fn require_user(mut req: Request, next: Next) -> Result<Response, (StatusCode, String)> {
    // 1. Extract the header
    let user_id_str = req
        .headers()
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .ok_or((
            StatusCode::BAD_REQUEST,
            "x-user-id header is required".to_string(),
        ))?;

    // 2. Parse it as a UUID
    let user_id = Uuid::parse_str(user_id_str).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "Invalid x-user-id format".to_string(),
        )
    })?;

    // 3. Insert the learner id into request extensions
    req.extensions_mut().insert(user_id);

    // 4. Continue to the handler
    Ok(next.run(req).await)
}
