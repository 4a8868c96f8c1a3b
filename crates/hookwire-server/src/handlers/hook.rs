//! Hook dispatch endpoint

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use hookwire_hooks::{HookLookup, RequestContext};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Body returned for ids with no matching hook
pub const HOOK_NOT_FOUND: &str = "Hook not found.";

/// Handle a request addressed to one hook
///
/// Responds as soon as the id is matched. The trigger rule and the command run
/// later on a detached task, so the response never reflects them.
pub async fn handle_hook(
    State(state): State<AppState>,
    Path(id): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(hook) = state.table.lookup(&id) else {
        debug!(hook_id = %id, "No hook with this id");
        return (StatusCode::NOT_FOUND, HOOK_NOT_FOUND).into_response();
    };

    info!(hook_id = %hook.id, "Incoming request matched hook");

    let context = RequestContext::from_parts(
        headers.iter().map(|(name, value)| {
            (
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        }),
        query.as_deref(),
        body.to_vec(),
    );

    let status = StatusCode::from_u16(hook.response_status()).unwrap_or_else(|_| {
        warn!(
            hook_id = %hook.id,
            code = hook.response_status(),
            "Invalid success status code, using 200"
        );
        StatusCode::OK
    });
    let message = hook.response_message.clone();

    state.dispatch(hook, context);

    (status, message).into_response()
}
