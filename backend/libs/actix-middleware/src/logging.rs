//! Logging middleware
//!
//! One `tracing` event per completed request with method, path, status and
//! latency. Server errors log at `error`, client errors at `warn`, requests
//! slower than the threshold at `warn`, everything else at `info`.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::{Duration, Instant};

/// Middleware that logs HTTP requests and responses
#[derive(Clone)]
pub struct Logging {
    slow_threshold: Duration,
}

impl Logging {
    pub fn new(slow_threshold: Duration) -> Self {
        Self { slow_threshold }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl<S, B> Transform<S, ServiceRequest> for Logging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggingService {
            service,
            slow_threshold: self.slow_threshold,
        }))
    }
}

pub struct LoggingService<S> {
    service: S,
    slow_threshold: Duration,
}

impl<S, B> Service<ServiceRequest> for LoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();
        let slow_threshold = self.slow_threshold;

        let fut = self.service.call(req);

        Box::pin(async move {
            let result = fut.await;
            let elapsed = start.elapsed();
            let duration_ms = elapsed.as_millis() as u64;

            let status = match &result {
                Ok(res) => res.status(),
                Err(e) => e.as_response_error().status_code(),
            };

            if status.is_server_error() {
                tracing::error!(method = %method, path = %path, status = status.as_u16(), duration_ms, "HTTP request failed");
            } else if status.is_client_error() {
                tracing::warn!(method = %method, path = %path, status = status.as_u16(), duration_ms, "HTTP request rejected");
            } else if elapsed > slow_threshold {
                tracing::warn!(method = %method, path = %path, status = status.as_u16(), duration_ms, "Slow HTTP request");
            } else {
                tracing::info!(method = %method, path = %path, status = status.as_u16(), duration_ms, "HTTP request completed");
            }

            result
        })
    }
}
