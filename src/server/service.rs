use http::header::{HeaderValue, CONTENT_TYPE};
use http::{Request, Response, StatusCode};
use tracing::error;

use crate::router::RouteTable;

fn plain(status: StatusCode, text: &str) -> Response<Vec<u8>> {
    let mut response = Response::new(text.as_bytes().to_vec());
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    response
}

/// 404 answer for requests no route matches.
#[must_use]
pub fn not_found() -> Response<Vec<u8>> {
    plain(StatusCode::NOT_FOUND, "Not Found")
}

/// Generic 500 answer. Never carries the error's message or chain.
#[must_use]
pub fn internal_error() -> Response<Vec<u8>> {
    plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// Outermost entry point: dispatch a request and never fail.
///
/// Errors that escape the middleware chain (no error-handling middleware
/// caught them) are logged here and answered with a bare 500.
pub async fn serve(table: &RouteTable, request: Request<Vec<u8>>) -> Response<Vec<u8>> {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    match table.dispatch(request).await {
        Ok(response) => response,
        Err(e) => {
            error!(
                method = %method,
                path = %path,
                error = %format!("{e:#}"),
                "Unhandled error in request chain"
            );
            internal_error()
        }
    }
}
