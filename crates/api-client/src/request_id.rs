//! Request id shared between an inbound request and its provider calls.
//!
//! The server wraps each request in [`scope`]; every provider call made
//! inside it sends that id as `X-Request-ID`. Calls outside a scope get a
//! fresh id.

use std::future::Future;

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Run `fut` with `id` as the request id of its provider calls.
pub async fn scope<F: Future>(id: String, fut: F) -> F::Output {
    REQUEST_ID.scope(id, fut).await
}

/// Request id of the enclosing [`scope`], if any.
#[must_use]
pub fn current() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}
