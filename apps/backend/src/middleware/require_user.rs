//! Authentication gate for protected scopes.
//!
//! Resolves the bearer token to an active user before the handler's
//! extractors run, stores it in request extensions for [`CurrentUser`], and
//! answers 401 on any failure. Path and body errors on protected routes are
//! only reported to authenticated callers.

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ready, LocalBoxFuture, Ready};

use crate::extractors::current_user::{authenticate, CurrentUser};

pub struct RequireUser;

impl<S, B> Transform<S, ServiceRequest> for RequireUser
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireUserMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireUserMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireUserMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireUserMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let http_req = req.request().clone();
            let user: CurrentUser = match authenticate(&http_req).await {
                Ok(user) => user,
                Err(err) => return Ok(req.error_response(err).map_into_right_body()),
            };
            drop(http_req);

            req.extensions_mut().insert(user);
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
