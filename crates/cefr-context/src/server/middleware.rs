//! Request context and middleware for the context REST API
//!
//! Every request gets a UUID that is attached to its tracing span, made
//! available to handlers through request extensions and echoed back in the
//! `x-request-id` response header.

use axum::{
  extract::Request,
  http::{HeaderName, HeaderValue, Method, Uri},
  middleware::Next,
  response::Response,
};
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request metadata shared with handlers
#[derive(Debug, Clone)]
pub struct RequestContext {
  /// Unique ID for this request
  pub request_id: Uuid,
  pub method: Method,
  pub uri: Uri,
}

impl RequestContext {
  pub fn new(method: Method, uri: Uri) -> Self {
    Self { request_id: Uuid::new_v4(), method, uri }
  }

  fn span(&self) -> tracing::Span {
    tracing::info_span!(
      "request",
      request_id = %self.request_id,
      method = %self.method,
      path = %self.uri.path(),
    )
  }
}

/// Middleware to inject RequestContext into all requests
pub async fn request_context_middleware(mut request: Request, next: Next) -> Response {
  let context = RequestContext::new(request.method().clone(), request.uri().clone());
  let span = context.span();
  let request_id = context.request_id;

  request.extensions_mut().insert(context);

  async move {
    let start_time = Instant::now();
    tracing::info!("Request started");

    let mut response = next.run(request).await;

    let duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(status = response.status().as_u16(), duration_ms, "Request completed");

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
      response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
  }
  .instrument(span)
  .await
}
