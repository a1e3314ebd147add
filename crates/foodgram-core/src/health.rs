use axum::http::StatusCode;

/// Handler for `GET /healthz`: the process is up and serving requests.
///
/// Readiness depends on each service's backing stores and is defined per service.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
