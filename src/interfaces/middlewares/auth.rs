use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ResponseError,
    web, Error,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{constants::API_KEY_HEADER, errors::ApiError, AppState};

/// Shared-secret gate. Every route except the public ones requires the
/// configured secret in the API key header; missing and wrong keys get
/// the same response so callers cannot tell which case they hit.
pub struct ApiKeyMiddleware;

impl<S> Transform<S, ServiceRequest> for ApiKeyMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(ApiKeyMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct ApiKeyMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for ApiKeyMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public_route(req.path(), req.method().as_str()) {
                return service.call(req).await;
            }

            let authorized = match req.app_data::<web::Data<AppState>>() {
                Some(state) => {
                    let presented = req
                        .headers()
                        .get(API_KEY_HEADER)
                        .and_then(|value| value.to_str().ok());
                    presented == Some(state.config.api_secret.as_str())
                }
                None => {
                    tracing::error!("AppState missing in middleware");
                    let response =
                        ApiError::Internal("application state not configured".into())
                            .error_response();
                    return Ok(req.into_response(response));
                }
            };

            if !authorized {
                tracing::warn!(path = req.path(), "API key missing or incorrect");
                return Ok(req.into_response(ApiError::Unauthorized.error_response()));
            }

            service.call(req).await
        })
    }
}

fn is_public_route(path: &str, method: &str) -> bool {
    if method == "OPTIONS" {
        return true;
    }

    matches!((path, method), ("/health", "GET") | ("/", "GET"))
}
