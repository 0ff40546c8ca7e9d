use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::ResponseError,
    web, Error,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{errors::ApiError, AppState};

/// Host header allow-list, the guard against Host header attacks. Runs
/// before authentication; a `*` entry disables the check.
pub struct HostFilter;

impl<S> Transform<S, ServiceRequest> for HostFilter
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = HostFilterService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(HostFilterService {
            service: Rc::new(service),
        })
    }
}

pub struct HostFilterService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for HostFilterService<S>
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
            let allowed_hosts = match req.app_data::<web::Data<AppState>>() {
                Some(state) => state.config.hosts(),
                None => {
                    tracing::error!("AppState missing in middleware");
                    let response =
                        ApiError::Internal("application state not configured".into())
                            .error_response();
                    return Ok(req.into_response(response));
                }
            };

            let host = req
                .connection_info()
                .host()
                .split(':')
                .next()
                .unwrap_or("")
                .to_string();

            let allowed = allowed_hosts
                .iter()
                .any(|entry| entry == "*" || entry == &host);

            if !allowed {
                tracing::warn!(%host, "request rejected by host allow-list");
                return Ok(req.into_response(ApiError::InvalidHost.error_response()));
            }

            service.call(req).await
        })
    }
}
