//! One structured log line per request, tagged with a per-process request number.

use std::future::{ready, Ready};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error as ActixError;
use futures::future::LocalBoxFuture;
use tracing::{error, info, warn};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

static NEXT_REQUEST: AtomicU64 = AtomicU64::new(1);

pub struct RequestLog;

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = RequestLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddleware { service }))
    }
}

pub struct RequestLogMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let request_id = NEXT_REQUEST.fetch_add(1, Ordering::Relaxed);
        let method = req.method().to_string();
        let path = req.path().to_string();

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut result = fut.await;

            let status = match &result {
                Ok(res) => res.status(),
                Err(err) => err.as_response_error().status_code(),
            };
            let duration_us = start.elapsed().as_micros() as u64;
            let status_code = status.as_u16();

            if status.is_server_error() {
                error!(request_id, http.method = %method, url.path = %path, http.status_code = status_code, duration_us, "request_completed");
            } else if status.is_client_error() {
                warn!(request_id, http.method = %method, url.path = %path, http.status_code = status_code, duration_us, "request_completed");
            } else {
                info!(request_id, http.method = %method, url.path = %path, http.status_code = status_code, duration_us, "request_completed");
            }

            if let Ok(res) = result.as_mut() {
                res.headers_mut().insert(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    HeaderValue::from(request_id),
                );
            }
            result
        })
    }
}
