//! `POST /api/waitlist`: mailing-list signup.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Maximum accepted request body.
pub const MAX_BODY_BYTES: usize = 16 * 1024;

#[derive(Debug, Default, Deserialize)]
struct SignupRequest {
    #[serde(default)]
    email: String,
}

#[derive(Debug, Serialize)]
struct SignupError {
    error: &'static str,
}

#[derive(Debug, Serialize)]
struct SignupOk {
    success: bool,
}

fn bad_request(error: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, Json(SignupError { error })).into_response()
}

/// Add the posted email address to the waitlist.
///
/// The body limit is enforced by the route; oversized bodies never reach
/// this handler and are rendered by the error responder.
pub async fn join(State(state): State<AppState>, body: Bytes) -> Response {
    // A literal `null` body decodes to an empty signup.
    let request: SignupRequest = match serde_json::from_slice::<Option<SignupRequest>>(&body) {
        Ok(request) => request.unwrap_or_default(),
        Err(err) => {
            tracing::debug!(error = %err, "invalid waitlist request");
            return bad_request("Invalid API request");
        }
    };

    let email = request.email.trim();
    if email.is_empty() {
        return bad_request("Please enter a valid email address.");
    }

    if let Err(err) = state
        .waitlist
        .add_to_list(&state.config.mailmodo_list_name, email)
        .await
    {
        tracing::error!(error = %err, "adding email to waitlist failed");
        return bad_request(
            "Storing email in waitlist failed. Please enter a valid email address.",
        );
    }

    Json(SignupOk { success: true }).into_response()
}
