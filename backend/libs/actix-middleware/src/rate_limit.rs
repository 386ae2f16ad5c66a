use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpResponse, ResponseError,
};
use futures::future::{ready, Ready};
use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::keyed::DashMapStateStore,
    Quota, RateLimiter,
};
use serde::Deserialize;
use std::future::Future;
use std::num::NonZeroU32;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

/// Request budget per client IP: `max_requests` per `window_seconds`
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window_seconds: 900, // 15 minutes
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Too many requests, please try again later")]
pub struct RateLimitExceeded {
    retry_after: Duration,
}

impl ResponseError for RateLimitExceeded {
    fn status_code(&self) -> StatusCode {
        StatusCode::TOO_MANY_REQUESTS
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::TooManyRequests()
            .insert_header(("Retry-After", self.retry_after.as_secs().max(1).to_string()))
            .json(serde_json::json!({
                "error": self.to_string(),
                "status": 429,
            }))
    }
}

impl RateLimitConfig {
    /// Burst of `max_requests`, refilled evenly over the window.
    fn quota(&self) -> Quota {
        let burst = NonZeroU32::new(self.max_requests).unwrap_or(NonZeroU32::MIN);
        let window = Duration::from_secs(self.window_seconds);
        Quota::with_period(window / burst.get())
            .unwrap_or_else(|| Quota::per_second(burst))
            .allow_burst(burst)
    }
}

/// Keyed limiter shared by every worker of one server
#[derive(Clone)]
struct ClientLimiter<C: Clock = DefaultClock> {
    limiter: Arc<RateLimiter<String, DashMapStateStore<String>, C, NoOpMiddleware<C::Instant>>>,
    clock: C,
}

impl<C: Clock> ClientLimiter<C> {
    const PRUNE_THRESHOLD: usize = 10_000;

    fn with_clock(config: &RateLimitConfig, clock: C) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::dashmap_with_clock(config.quota(), &clock)),
            clock,
        }
    }

    /// Count a hit for `key`; `Err(retry_after)` when its budget is spent.
    fn check(&self, key: &str) -> Result<(), Duration> {
        if self.limiter.len() > Self::PRUNE_THRESHOLD {
            self.limiter.retain_recent();
        }
        self.limiter
            .check_key(&key.to_string())
            .map_err(|not_until| not_until.wait_time_from(self.clock.now()))
    }
}

#[derive(Clone)]
pub struct RateLimitMiddleware {
    limiter: ClientLimiter,
}

impl RateLimitMiddleware {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            limiter: ClientLimiter::with_clock(&config, DefaultClock::default()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    limiter: ClientLimiter,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let ip = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();
        let key = format!("ip:{}", ip);

        let verdict = self.limiter.check(&key);

        Box::pin(async move {
            if let Err(retry_after) = verdict {
                tracing::warn!(key = %key, "Rate limit exceeded");
                return Err(RateLimitExceeded { retry_after }.into());
            }
            service.call(req).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test as actix_test, web, App};
    use governor::clock::FakeRelativeClock;

    #[test]
    fn test_rate_limit_config_default() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 100);
        assert_eq!(config.window_seconds, 900);
    }

    #[test]
    fn budget_blocks_after_limit_and_refills() {
        let clock = FakeRelativeClock::default();
        let config = RateLimitConfig {
            max_requests: 2,
            window_seconds: 10,
        };
        let limiter = ClientLimiter::with_clock(&config, clock.clone());

        assert!(limiter.check("ip:1.2.3.4").is_ok());
        assert!(limiter.check("ip:1.2.3.4").is_ok());
        let retry = limiter.check("ip:1.2.3.4").unwrap_err();
        assert!(retry > Duration::ZERO);
        assert!(retry <= Duration::from_secs(10));

        // other clients have their own budget
        assert!(limiter.check("ip:5.6.7.8").is_ok());

        clock.advance(Duration::from_secs(11));
        assert!(limiter.check("ip:1.2.3.4").is_ok());
    }

    #[test]
    fn zero_limits_still_build_a_quota() {
        let config = RateLimitConfig {
            max_requests: 0,
            window_seconds: 0,
        };
        let limiter = ClientLimiter::with_clock(&config, FakeRelativeClock::default());
        assert!(limiter.check("ip:1.2.3.4").is_ok());
        assert!(limiter.check("ip:1.2.3.4").is_err());
    }

    #[actix_web::test]
    async fn third_request_is_rejected_with_429() {
        let app = actix_test::init_service(
            App::new()
                .wrap(RateLimitMiddleware::new(RateLimitConfig {
                    max_requests: 2,
                    window_seconds: 60,
                }))
                .route("/test", web::get().to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;

        for _ in 0..2 {
            let req = actix_test::TestRequest::get().uri("/test").to_request();
            assert!(actix_test::call_service(&app, req).await.status().is_success());
        }

        let req = actix_test::TestRequest::get().uri("/test").to_request();
        let err = actix_test::try_call_service(&app, req).await.err().unwrap();
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }
}
