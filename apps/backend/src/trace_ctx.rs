//! Task-local trace id for the request being served.
//!
//! `RequestTrace` scopes the id around the downstream future so error
//! rendering and database error mapping can stamp it without threading
//! the request through every call.

use tokio::task_local;

const UNKNOWN: &str = "unknown";

task_local! {
    static TRACE_ID: String;
}

/// The trace id of the current request, or `"unknown"` outside a request scope.
pub fn trace_id() -> String {
    current().unwrap_or_else(|| UNKNOWN.to_string())
}

/// The trace id of the current request, if one is in scope.
pub fn current() -> Option<String> {
    TRACE_ID.try_with(|id| id.clone()).ok()
}

/// Run `future` with `trace_id` as the task-local trace id.
pub async fn with_trace_id<F, R>(trace_id: String, future: F) -> R
where
    F: std::future::Future<Output = R>,
{
    TRACE_ID.scope(trace_id, future).await
}
