//! Rate limiting middleware.

use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use blog_shared::ErrorResponse;
use futures::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::observability::RequestId;
use blog_core::ports::RateLimiter;

/// Rate limiting middleware factory, keyed by client address.
pub struct RateLimitMiddleware {
    limiter: Arc<dyn RateLimiter>,
}

impl RateLimitMiddleware {
    pub fn new(limiter: Arc<dyn RateLimiter>) -> Self {
        Self { limiter }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
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
    limiter: Arc<dyn RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let limiter = self.limiter.clone();

        let key = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        let request_id = req.extensions().get::<RequestId>().map(|id| id.0.clone());

        Box::pin(async move {
            match limiter.check(&key).await {
                Ok(result) if !result.allowed => {
                    let retry_after = result.reset_after.as_secs().max(1);
                    tracing::warn!(client = %key, retry_after, "Rate limit exceeded");

                    let mut error = ErrorResponse::new(429, "Too Many Requests").with_detail(
                        format!("Rate limit exceeded. Try again in {} seconds.", retry_after),
                    );
                    if let Some(id) = request_id {
                        error = error.with_request_id(id);
                    }
                    let response = HttpResponse::TooManyRequests()
                        .insert_header(("X-RateLimit-Remaining", "0"))
                        .insert_header(("Retry-After", retry_after.to_string()))
                        .json(error);

                    Ok(req.into_response(response).map_into_right_body())
                }
                Ok(_) => service.call(req).await.map(|res| res.map_into_left_body()),
                Err(e) => {
                    tracing::error!("Rate limiter error, failing open: {}", e);
                    service.call(req).await.map(|res| res.map_into_left_body())
                }
            }
        })
    }
}
