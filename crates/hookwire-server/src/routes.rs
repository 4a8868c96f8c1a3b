//! Route definitions

use axum::{extract::DefaultBodyLimit, middleware, routing::any, Router};

use crate::{handlers::hook, middleware::logging_middleware, state::AppState};

/// Route pattern for hooks under `prefix`
///
/// An empty prefix serves hooks at `/{id}`.
pub fn hook_route(prefix: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        "/{id}".to_string()
    } else {
        format!("/{}/{{id}}", prefix)
    }
}

/// Build the router serving hooks under `prefix` for any method
///
/// Request bodies are read in full with no size limit.
pub fn build_router(state: AppState, prefix: &str) -> Router {
    Router::new()
        .route(&hook_route(prefix), any(hook::handle_hook))
        .layer(DefaultBodyLimit::disable())
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hook_route() {
        assert_eq!(hook_route("hooks"), "/hooks/{id}");
        assert_eq!(hook_route("/api/hooks/"), "/api/hooks/{id}");
        assert_eq!(hook_route(""), "/{id}");
    }
}
